//! Session domain module.
//!
//! - `model`: the play-through record (`Session`) and its persisted form
//! - `store`: key/value storage trait and snapshot persistence

mod model;
mod store;

pub use model::{Session, SessionSnapshot, generate_session_id};
pub use store::{KeyValueStore, MemoryStore, SESSION_STATE_KEY, SessionStore};
