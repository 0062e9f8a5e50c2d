//! Application layer: drives the game state machine against the server and
//! durable storage.

pub mod controller;
pub mod monitor;


pub use controller::{EventReceiver, EventSender, GameController};
pub use monitor::spawn_health_monitor;
