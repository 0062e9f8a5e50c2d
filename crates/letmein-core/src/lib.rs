//! Domain layer of the Let Me In client: session model, game state machine,
//! server API contract and storage traits.

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod level;
pub mod session;

// Re-export common error type
pub use error::{LetmeinError, Result};
