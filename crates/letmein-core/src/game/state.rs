//! The game state machine.
//!
//! [`GameState::handle`] is the only way state changes. It takes one
//! [`GameEvent`] and returns a [`Transition`]: what to render and which
//! effects to run. No I/O happens here.

use std::time::Duration;

use super::event::{Effect, GameEvent, Ticket};
use super::render::{
    ConnectionStatus, Control, InputField, RenderCommand, TranscriptEntry,
};
use crate::api::{
    GameStatus, HealthResponse, MessageRequest, MessageResponse, PasswordRequest,
    PasswordResponse, WelcomeResponse,
};
use crate::error::Result;
use crate::level::{MAX_LEVEL, is_valid_level, level_buttons};
use crate::session::Session;

pub const CONNECTION_ERROR: &str = "Connection error. Please check if the server is running.";
pub const GAME_COMPLETE: &str = "GAME COMPLETE! You are a master social engineer!";

/// Output of one state machine step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transition {
    pub commands: Vec<RenderCommand>,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn render(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    fn append(&mut self, entry: TranscriptEntry) {
        self.commands.push(RenderCommand::Append(entry));
    }

    fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn alert(message: impl Into<String>) -> Self {
        Self {
            commands: vec![RenderCommand::Alert(message.into())],
            effects: Vec::new(),
        }
    }

    /// True when nothing needs to happen.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.effects.is_empty()
    }
}

/// Client-side game state: the session plus bookkeeping for in-flight
/// requests.
///
/// Overlap policy: the most recent level selection wins and older welcome
/// replies are dropped. Message and password controls are single-flight: a
/// second request while one is pending is rejected. Replies that arrive after
/// the player switched level still release their control but are not shown.
/// A confirmed new game releases both controls at once and drops whatever
/// the old session's requests return.
#[derive(Debug, Clone)]
pub struct GameState {
    session: Session,
    advance_delay: Duration,
    epoch: u64,
    next_ticket: u64,
    welcome: Option<Ticket>,
    message: Option<Ticket>,
    password: Option<Ticket>,
    reset_requested: bool,
}

impl GameState {
    pub fn new(session: Session, advance_delay: Duration) -> Self {
        Self {
            session,
            advance_delay,
            epoch: 0,
            next_ticket: 0,
            welcome: None,
            message: None,
            password: None,
            reset_requested: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current level epoch; changes every time a level is entered.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_busy(&self, control: Control) -> bool {
        match control {
            Control::Send => self.message.is_some(),
            Control::Submit => self.password.is_some(),
        }
    }

    pub fn handle(&mut self, event: GameEvent) -> Transition {
        match event {
            GameEvent::Initialize { restored } => self.initialize(restored),
            GameEvent::SelectLevel(level) => self.select_level(level),
            GameEvent::SendMessage(text) => self.send_message(&text),
            GameEvent::SubmitPassword(text) => self.submit_password(&text),
            GameEvent::NewGameRequested => self.request_new_game(),
            GameEvent::NewGameAnswered { confirmed } => self.answer_new_game(confirmed),
            GameEvent::CheckConnection => Transition {
                commands: Vec::new(),
                effects: vec![Effect::CheckHealth],
            },
            GameEvent::StatusRequested => Transition {
                commands: Vec::new(),
                effects: vec![Effect::FetchStatus {
                    session_id: self.session.session_id.clone(),
                }],
            },
            GameEvent::WelcomeLoaded {
                ticket,
                level,
                result,
            } => self.welcome_loaded(ticket, level, result),
            GameEvent::MessageAnswered { ticket, result } => self.message_answered(ticket, result),
            GameEvent::PasswordChecked {
                ticket,
                request,
                result,
            } => self.password_checked(ticket, request, result),
            GameEvent::AdvanceDue { level, epoch } => self.advance_due(level, epoch),
            GameEvent::HealthChecked(result) => Self::health_checked(result),
            GameEvent::StatusLoaded(result) => Self::status_loaded(result),
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket {
            id: self.next_ticket,
            epoch: self.epoch,
        }
    }

    fn refresh_progress(&self, t: &mut Transition) {
        t.render(RenderCommand::SetCompletedCount(self.session.levels_completed));
        t.render(RenderCommand::SetLevelButtons(level_buttons(
            self.session.current_level,
            self.session.levels_completed,
        )));
    }

    // ========================================================================
    // Initialization and reset
    // ========================================================================

    fn initialize(&mut self, restored: Option<Session>) -> Transition {
        let mut t = Transition::default();
        let level = match restored {
            Some(session) => {
                tracing::info!(
                    "[Game] Restored session {} at level {} ({} completed)",
                    session.session_id,
                    session.current_level,
                    session.levels_completed
                );
                self.session = session;
                t.render(RenderCommand::SetLevelLabel(self.session.current_level));
                self.refresh_progress(&mut t);
                self.session.current_level
            }
            None => {
                t.render(RenderCommand::SetCompletedCount(self.session.levels_completed));
                1
            }
        };
        self.enter_level(level, &mut t);
        t.effect(Effect::CheckHealth);
        t
    }

    fn request_new_game(&mut self) -> Transition {
        self.reset_requested = true;
        Transition {
            commands: vec![RenderCommand::ConfirmReset],
            effects: Vec::new(),
        }
    }

    fn answer_new_game(&mut self, confirmed: bool) -> Transition {
        if !std::mem::take(&mut self.reset_requested) || !confirmed {
            return Transition::default();
        }

        let previous = std::mem::take(&mut self.session);
        tracing::info!("[Game] Starting new game, discarding {}", previous.session_id);

        let mut t = Transition::default();
        // Replies to the old session's requests no longer match any ticket.
        if self.message.take().is_some() {
            t.render(RenderCommand::SetControl {
                control: Control::Send,
                busy: false,
            });
        }
        if self.password.take().is_some() {
            t.render(RenderCommand::SetControl {
                control: Control::Submit,
                busy: false,
            });
        }
        t.effect(Effect::ClearPersisted);
        t.effect(Effect::ResetRemote {
            session_id: previous.session_id,
        });
        t.render(RenderCommand::SetCompletedCount(0));
        self.enter_level(1, &mut t);
        t
    }

    // ========================================================================
    // Level selection
    // ========================================================================

    fn select_level(&mut self, level: u32) -> Transition {
        if !is_valid_level(level) {
            return Transition::alert(format!("Choose a level between 1 and {}.", MAX_LEVEL));
        }
        if !self.session.is_unlocked(level) {
            return Transition::alert(format!(
                "Complete Level {} first!",
                self.session.levels_completed + 1
            ));
        }

        let mut t = Transition::default();
        self.enter_level(level, &mut t);
        t
    }

    /// Moves to `level` (already validated) and requests its welcome message.
    fn enter_level(&mut self, level: u32, t: &mut Transition) {
        self.session.current_level = level;
        self.epoch += 1;
        let ticket = self.issue_ticket();
        self.welcome = Some(ticket);

        t.effect(Effect::Persist(self.session.clone()));
        t.render(RenderCommand::SetLevelLabel(level));
        t.render(RenderCommand::SetLevelButtons(level_buttons(
            level,
            self.session.levels_completed,
        )));
        t.render(RenderCommand::ClearTranscript);
        t.append(TranscriptEntry::system(format!("Loading Level {}...", level)));
        t.effect(Effect::FetchWelcome { ticket, level });
    }

    fn welcome_loaded(
        &mut self,
        ticket: Ticket,
        level: u32,
        result: Result<WelcomeResponse>,
    ) -> Transition {
        if self.welcome != Some(ticket) {
            tracing::debug!("[Game] Dropping stale welcome for level {}", level);
            return Transition::default();
        }
        self.welcome = None;

        let entry = match result {
            Ok(WelcomeResponse {
                success: true,
                welcome_message: Some(text),
            }) => TranscriptEntry::ai(text).with_heading(format!("Level {} AI", level)),
            Ok(_) => level_started(level),
            Err(e) => {
                tracing::warn!("[Game] Error getting welcome message: {}", e);
                level_started(level)
            }
        };

        let mut t = Transition::default();
        t.render(RenderCommand::ClearTranscript);
        t.append(entry);
        t
    }

    fn advance_due(&mut self, level: u32, epoch: u64) -> Transition {
        if epoch != self.epoch {
            tracing::debug!("[Game] Auto-advance to level {} cancelled", level);
            return Transition::default();
        }
        self.select_level(level)
    }

    // ========================================================================
    // Messaging
    // ========================================================================

    fn send_message(&mut self, text: &str) -> Transition {
        let message = text.trim();
        if message.is_empty() {
            return Transition::alert("Please enter a message");
        }
        if self.message.is_some() {
            return Transition::alert("Still waiting for the previous reply");
        }

        let ticket = self.issue_ticket();
        self.message = Some(ticket);

        let mut t = Transition::default();
        t.render(RenderCommand::SetControl {
            control: Control::Send,
            busy: true,
        });
        t.append(TranscriptEntry::user(message));
        t.render(RenderCommand::ClearInput(InputField::Message));
        t.effect(Effect::PostMessage {
            ticket,
            request: MessageRequest {
                session_id: self.session.session_id.clone(),
                level: self.session.current_level,
                message: message.to_string(),
            },
        });
        t
    }

    fn message_answered(&mut self, ticket: Ticket, result: Result<MessageResponse>) -> Transition {
        if self.message != Some(ticket) {
            return Transition::default();
        }
        self.message = None;

        let mut t = Transition::default();
        if ticket.epoch == self.epoch {
            let entry = match result {
                Ok(MessageResponse {
                    success: true,
                    ai_response,
                }) => TranscriptEntry::ai(ai_response.unwrap_or_default()),
                Ok(MessageResponse { ai_response, .. }) => TranscriptEntry::error(format!(
                    "Error: {}",
                    ai_response.unwrap_or_else(|| "Unknown error".to_string())
                )),
                Err(e) => {
                    tracing::warn!("[Game] Message request failed: {}", e);
                    TranscriptEntry::error(CONNECTION_ERROR)
                }
            };
            t.append(entry);
        } else {
            tracing::debug!("[Game] Dropping reply for a level the player left");
        }
        t.render(RenderCommand::SetControl {
            control: Control::Send,
            busy: false,
        });
        t
    }

    // ========================================================================
    // Password submission
    // ========================================================================

    fn submit_password(&mut self, text: &str) -> Transition {
        let password = text.trim();
        if password.is_empty() {
            return Transition::alert("Please enter a password");
        }
        if self.password.is_some() {
            return Transition::alert("Still checking the previous password");
        }

        let ticket = self.issue_ticket();
        self.password = Some(ticket);

        let mut t = Transition::default();
        t.render(RenderCommand::SetControl {
            control: Control::Submit,
            busy: true,
        });
        t.effect(Effect::PostPassword {
            ticket,
            request: PasswordRequest {
                session_id: self.session.session_id.clone(),
                level: self.session.current_level,
                password: password.to_string(),
            },
        });
        t
    }

    fn password_checked(
        &mut self,
        ticket: Ticket,
        request: PasswordRequest,
        result: Result<PasswordResponse>,
    ) -> Transition {
        if self.password != Some(ticket) {
            return Transition::default();
        }
        self.password = None;

        let current = ticket.epoch == self.epoch;
        let mut t = Transition::default();

        match result {
            Ok(PasswordResponse {
                success: true,
                correct: true,
                ..
            }) if request.session_id == self.session.session_id => {
                self.session.record_completion(request.level);
                tracing::info!(
                    "[Game] Level {} passed, {} completed",
                    request.level,
                    self.session.levels_completed
                );
                t.effect(Effect::Persist(self.session.clone()));

                if current {
                    t.append(TranscriptEntry::success(format!(
                        "SUCCESS! Password \"{}\" is correct!",
                        request.password
                    )));
                    t.render(RenderCommand::ClearInput(InputField::Password));
                }
                self.refresh_progress(&mut t);

                if current {
                    if request.level < MAX_LEVEL {
                        let next = request.level + 1;
                        t.append(TranscriptEntry::success(format!(
                            "Advancing to Level {} in {}...",
                            next,
                            describe_delay(self.advance_delay)
                        )));
                        t.effect(Effect::ScheduleAdvance {
                            level: next,
                            epoch: self.epoch,
                            delay: self.advance_delay,
                        });
                    } else {
                        t.append(TranscriptEntry::success(GAME_COMPLETE));
                    }
                }
            }
            Ok(PasswordResponse {
                success: true,
                correct: true,
                ..
            }) => {
                tracing::debug!(
                    "[Game] Ignoring verdict for previous session {}",
                    request.session_id
                );
            }
            Ok(PasswordResponse {
                success: true,
                correct: false,
                ..
            }) if current => {
                t.append(TranscriptEntry::error(format!(
                    "Wrong password: \"{}\". Keep trying!",
                    request.password
                )));
                t.render(RenderCommand::ClearInput(InputField::Password));
            }
            Ok(PasswordResponse { message, .. }) if current => {
                t.append(TranscriptEntry::error(format!(
                    "Error checking password: {}",
                    message.unwrap_or_else(|| "Unknown error".to_string())
                )));
            }
            Err(e) if current => {
                tracing::warn!("[Game] Password request failed: {}", e);
                t.append(TranscriptEntry::error(CONNECTION_ERROR));
            }
            _ => {
                tracing::debug!("[Game] Dropping password verdict for a level or session the player left");
            }
        }

        t.render(RenderCommand::SetControl {
            control: Control::Submit,
            busy: false,
        });
        t
    }

    // ========================================================================
    // Connectivity and status
    // ========================================================================

    fn health_checked(result: Result<HealthResponse>) -> Transition {
        let status = match result {
            Ok(HealthResponse {
                ollama_connected: true,
                ..
            }) => ConnectionStatus::Connected,
            Ok(_) => ConnectionStatus::Disconnected,
            Err(e) => {
                tracing::debug!("[Game] Health check failed: {}", e);
                ConnectionStatus::Error
            }
        };
        Transition {
            commands: vec![RenderCommand::SetConnection(status)],
            effects: Vec::new(),
        }
    }

    fn status_loaded(result: Result<GameStatus>) -> Transition {
        let entry = match result {
            Ok(GameStatus::Progress {
                completed_levels,
                total_levels,
            }) => {
                let mut levels = completed_levels;
                levels.sort_unstable();
                let listed = if levels.is_empty() {
                    "none".to_string()
                } else {
                    levels
                        .iter()
                        .map(u32::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                TranscriptEntry::system(format!(
                    "Server records {} of {} levels completed: {}",
                    levels.len(),
                    total_levels,
                    listed
                ))
            }
            Ok(GameStatus::Unknown { error }) => {
                TranscriptEntry::system(format!("Server has no progress for this session ({})", error))
            }
            Err(e) => {
                tracing::warn!("[Game] Status request failed: {}", e);
                TranscriptEntry::error(CONNECTION_ERROR)
            }
        };
        let mut t = Transition::default();
        t.append(entry);
        t
    }
}

fn level_started(level: u32) -> TranscriptEntry {
    TranscriptEntry::system(
        "Chat with the AI to try to get the password, then submit it below.",
    )
    .with_heading(format!("Level {} started!", level))
}

fn describe_delay(delay: Duration) -> String {
    let millis = delay.as_millis();
    if millis % 1000 == 0 {
        let secs = millis / 1000;
        if secs == 1 {
            "1 second".to_string()
        } else {
            format!("{} seconds", secs)
        }
    } else {
        format!("{:.1} seconds", delay.as_secs_f64())
    }
}
