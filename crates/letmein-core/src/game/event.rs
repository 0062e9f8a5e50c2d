//! Inputs to and side effects of the game state machine.

use std::time::Duration;

use crate::api::{
    GameStatus, HealthResponse, MessageRequest, MessageResponse, PasswordRequest,
    PasswordResponse, WelcomeResponse,
};
use crate::error::Result;
use crate::session::Session;

/// Identifies one in-flight request.
///
/// `epoch` is the level epoch the request was issued in; it changes every time
/// a level is entered, which is how replies for a level the player already
/// left are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub id: u64,
    pub epoch: u64,
}

/// Everything that can happen to the game: player actions, completed
/// requests and timers.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Startup, with the session restored from storage if there was one.
    Initialize { restored: Option<Session> },
    SelectLevel(u32),
    SendMessage(String),
    SubmitPassword(String),
    /// Player asked for a new game; answered by `NewGameAnswered`.
    NewGameRequested,
    NewGameAnswered { confirmed: bool },
    /// Periodic or manual connectivity check.
    CheckConnection,
    /// Player asked for the server-side progress record.
    StatusRequested,

    WelcomeLoaded {
        ticket: Ticket,
        level: u32,
        result: Result<WelcomeResponse>,
    },
    MessageAnswered {
        ticket: Ticket,
        result: Result<MessageResponse>,
    },
    PasswordChecked {
        ticket: Ticket,
        request: PasswordRequest,
        result: Result<PasswordResponse>,
    },
    /// A scheduled auto-advance fired.
    AdvanceDue { level: u32, epoch: u64 },
    HealthChecked(Result<HealthResponse>),
    StatusLoaded(Result<GameStatus>),
}

/// Work the state machine asks its driver to perform.
///
/// Network effects must be answered with the matching completion event
/// carrying the same ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the session snapshot to durable storage.
    Persist(Session),
    /// Delete the session snapshot.
    ClearPersisted,
    /// Answer with `GameEvent::WelcomeLoaded`.
    FetchWelcome { ticket: Ticket, level: u32 },
    /// Answer with `GameEvent::MessageAnswered`.
    PostMessage {
        ticket: Ticket,
        request: MessageRequest,
    },
    /// Answer with `GameEvent::PasswordChecked`.
    PostPassword {
        ticket: Ticket,
        request: PasswordRequest,
    },
    /// Fire `GameEvent::AdvanceDue` after `delay`.
    ScheduleAdvance {
        level: u32,
        epoch: u64,
        delay: Duration,
    },
    /// Answer with `GameEvent::HealthChecked`.
    CheckHealth,
    /// Answer with `GameEvent::StatusLoaded`.
    FetchStatus { session_id: String },
    /// Forget the old session on the server. Fire and forget.
    ResetRemote { session_id: String },
}
