//! Durable storage for the session snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::model::{Session, SessionSnapshot};
use crate::error::Result;

/// Fixed key the session snapshot lives under.
pub const SESSION_STATE_KEY: &str = "letmeinGameState";

/// A string key/value store, the client-side equivalent of browser local
/// storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile [`KeyValueStore`], used for tests and `--no-save` runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Saves, restores and clears the session snapshot.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Writes the snapshot of `session` under [`SESSION_STATE_KEY`].
    pub async fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(&session.snapshot())?;
        self.backend.set(SESSION_STATE_KEY, &json).await
    }

    /// Restores the saved session.
    ///
    /// Returns `None` when nothing is saved. A snapshot that cannot be read or
    /// parsed is logged and also reported as `None`, so callers start fresh.
    pub async fn load(&self) -> Option<Session> {
        let raw = match self.backend.get(SESSION_STATE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to read saved game state: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<SessionSnapshot>(&raw) {
            Ok(snapshot) => Some(Session::from_snapshot(snapshot)),
            Err(e) => {
                tracing::warn!("[SessionStore] Error loading game state: {}", e);
                None
            }
        }
    }

    /// Deletes the saved snapshot.
    pub async fn clear(&self) -> Result<()> {
        self.backend.remove(SESSION_STATE_KEY).await
    }
}
