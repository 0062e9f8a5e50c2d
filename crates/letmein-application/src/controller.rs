//! Game controller.
//!
//! Owns the [`GameState`] and runs the effects its transitions ask for.
//! Network calls and timers run as spawned tasks that report back on the
//! event channel returned by [`GameController::new`]; the owner feeds those
//! events back through [`GameController::dispatch`]. State is only ever
//! touched from `dispatch`, so there is no locking.

use std::sync::Arc;

use letmein_core::api::GameApi;
use letmein_core::config::ClientConfig;
use letmein_core::game::{Effect, GameEvent, GameState, RenderCommand};
use letmein_core::session::{Session, SessionStore};
use tokio::sync::mpsc;

/// Sender half of the controller's event channel.
pub type EventSender = mpsc::UnboundedSender<GameEvent>;

/// Receiver half of the controller's event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<GameEvent>;

pub struct GameController {
    state: GameState,
    api: Arc<dyn GameApi>,
    store: SessionStore,
    events: EventSender,
}

impl GameController {
    /// Creates a controller and the channel on which its background work
    /// reports back.
    pub fn new(
        api: Arc<dyn GameApi>,
        store: SessionStore,
        config: &ClientConfig,
    ) -> (Self, EventReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            state: GameState::new(Session::new(), config.advance_delay()),
            api,
            store,
            events,
        };
        (controller, receiver)
    }

    pub fn session(&self) -> &Session {
        self.state.session()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A sender for events produced outside the controller (timers, input).
    pub fn sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Restores the saved session (if any) and enters its level.
    pub async fn start(&mut self) -> Vec<RenderCommand> {
        let restored = self.store.load().await;
        if restored.is_none() {
            tracing::info!("[Controller] No saved game, starting fresh");
        }
        self.dispatch(GameEvent::Initialize { restored }).await
    }

    /// Applies one event and runs the resulting effects.
    ///
    /// Returns the render commands for the caller to draw.
    pub async fn dispatch(&mut self, event: GameEvent) -> Vec<RenderCommand> {
        let transition = self.state.handle(event);
        for effect in transition.effects {
            self.run_effect(effect).await;
        }
        transition.commands
    }

    async fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::Persist(session) => {
                if let Err(e) = self.store.save(&session).await {
                    tracing::warn!("[Controller] Failed to save game state: {}", e);
                }
            }
            Effect::ClearPersisted => {
                if let Err(e) = self.store.clear().await {
                    tracing::warn!("[Controller] Failed to clear game state: {}", e);
                }
            }
            Effect::FetchWelcome { ticket, level } => {
                self.spawn(move |api| async move {
                    let result = api.welcome(level).await;
                    GameEvent::WelcomeLoaded {
                        ticket,
                        level,
                        result,
                    }
                });
            }
            Effect::PostMessage { ticket, request } => {
                self.spawn(move |api| async move {
                    let result = api.send_message(&request).await;
                    GameEvent::MessageAnswered { ticket, result }
                });
            }
            Effect::PostPassword { ticket, request } => {
                self.spawn(move |api| async move {
                    let result = api.check_password(&request).await;
                    GameEvent::PasswordChecked {
                        ticket,
                        request,
                        result,
                    }
                });
            }
            Effect::ScheduleAdvance {
                level,
                epoch,
                delay,
            } => {
                let events = self.events.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(GameEvent::AdvanceDue { level, epoch });
                });
            }
            Effect::CheckHealth => {
                self.spawn(|api| async move { GameEvent::HealthChecked(api.health().await) });
            }
            Effect::FetchStatus { session_id } => {
                self.spawn(move |api| async move {
                    GameEvent::StatusLoaded(api.status(&session_id).await)
                });
            }
            Effect::ResetRemote { session_id } => {
                let api = Arc::clone(&self.api);
                tokio::spawn(async move {
                    match api.reset(&session_id).await {
                        Ok(response) => tracing::info!(
                            "[Controller] Server reset for {}: success={}",
                            session_id,
                            response.success
                        ),
                        Err(e) => tracing::warn!(
                            "[Controller] Server reset for {} failed: {}",
                            session_id,
                            e
                        ),
                    }
                });
            }
        }
    }

    /// Runs `request` in the background and posts the event it yields.
    fn spawn<F, Fut>(&self, request: F)
    where
        F: FnOnce(Arc<dyn GameApi>) -> Fut,
        Fut: std::future::Future<Output = GameEvent> + Send + 'static,
    {
        let events = self.events.clone();
        let future = request(Arc::clone(&self.api));
        tokio::spawn(async move {
            // The receiver is gone only during shutdown.
            let _ = events.send(future.await);
        });
    }
}
