//! File-backed key/value store.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use letmein_core::session::KeyValueStore;
use letmein_core::{LetmeinError, Result};
use tokio::fs;

use super::atomic_file::write_atomic;

/// [`KeyValueStore`] keeping one `<key>.json` file per key in a directory.
///
/// Keys are restricted to ASCII letters, digits, `-` and `_` so they map to
/// file names one to one.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(LetmeinError::storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        write_atomic(&path, value.as_bytes()).await?;
        tracing::debug!("[Storage] Wrote {}", path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letmein_core::session::{SESSION_STATE_KEY, Session, SessionStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("state"));
        assert!(store.get("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("state"));

        store.set("greeting", "{\"a\":1}").await.unwrap();
        assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("{\"a\":1}"));

        store.remove("greeting").await.unwrap();
        assert!(store.get("greeting").await.unwrap().is_none());
        // Removing twice is fine
        store.remove("greeting").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert!(store.set("../escape", "x").await.is_err());
        assert!(store.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_session_survives_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let session = Session {
            session_id: "session_persist01x1700000000000".to_string(),
            current_level: 2,
            levels_completed: 1,
        };

        let first = SessionStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
        first.save(&session).await.unwrap();
        assert!(dir.path().join(format!("{}.json", SESSION_STATE_KEY)).exists());

        let second = SessionStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
        assert_eq!(second.load().await, Some(session));
    }

    #[tokio::test]
    async fn test_corrupted_file_loads_as_no_state() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(format!("{}.json", SESSION_STATE_KEY)),
            "garbage",
        )
        .unwrap();

        let store = SessionStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
        assert!(store.load().await.is_none());
    }
}
