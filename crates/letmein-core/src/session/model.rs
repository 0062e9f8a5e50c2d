//! Session domain model.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::level::{MAX_LEVEL, highest_unlocked};

const SESSION_ID_PREFIX: &str = "session_";
const SESSION_ID_RANDOM_LEN: usize = 9;

/// One play-through: an opaque id the server keys its records on, plus
/// local progress counters.
///
/// Invariant: `1 <= current_level <= levels_completed + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub current_level: u32,
    pub levels_completed: u32,
}

impl Session {
    /// Starts a fresh play-through at level 1.
    pub fn new() -> Self {
        Self {
            session_id: generate_session_id(),
            current_level: 1,
            levels_completed: 0,
        }
    }

    /// Rebuilds a session from a persisted snapshot.
    ///
    /// Zero or empty fields fall back individually (level 1, nothing
    /// completed, fresh id). Values are then clamped back into range so a
    /// hand-edited snapshot cannot unlock levels.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let levels_completed = snapshot.levels_completed.min(MAX_LEVEL);
        let current_level = match snapshot.current_level {
            0 => 1,
            level => level.min(highest_unlocked(levels_completed)),
        };
        let session_id = if snapshot.session_id.trim().is_empty() {
            generate_session_id()
        } else {
            snapshot.session_id
        };

        Self {
            session_id,
            current_level,
            levels_completed,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_level: self.current_level,
            levels_completed: self.levels_completed,
            session_id: self.session_id.clone(),
        }
    }

    /// True when `level` may be selected.
    pub fn is_unlocked(&self, level: u32) -> bool {
        level >= 1 && level <= self.levels_completed + 1
    }

    /// Records a passed level. Progress never decreases.
    pub fn record_completion(&mut self, level: u32) {
        self.levels_completed = self.levels_completed.max(level.min(MAX_LEVEL));
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of [`Session`] kept in durable storage.
///
/// Field names are camelCase to stay readable by the web client, which
/// stores the same object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub current_level: u32,
    #[serde(default)]
    pub levels_completed: u32,
    #[serde(default)]
    pub session_id: String,
}

/// Generates a client-local session id: `session_` + 9 base-36 characters +
/// the current Unix time in milliseconds.
///
/// Not cryptographic; uniqueness is best effort.
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..SESSION_ID_RANDOM_LEN)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect();
    format!(
        "{}{}{}",
        SESSION_ID_PREFIX,
        random,
        chrono::Utc::now().timestamp_millis()
    )
}
