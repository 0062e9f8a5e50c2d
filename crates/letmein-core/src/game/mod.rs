//! Game state machine.
//!
//! # Module Structure
//!
//! - `state`: `GameState` and its transitions
//! - `event`: events fed in and effects handed out
//! - `render`: render commands and transcript entries

mod event;
mod render;
mod state;


pub use event::{Effect, GameEvent, Ticket};
pub use render::{
    ConnectionStatus, Control, InputField, RenderCommand, Role, TranscriptEntry,
};
pub use state::{CONNECTION_ERROR, GAME_COMPLETE, GameState, Transition};
