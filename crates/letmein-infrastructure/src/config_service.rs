//! Configuration service.
//!
//! Loads [`ClientConfig`] from `config.toml` (~/.config/letmein/config.toml),
//! writing a default file on first run.

use std::io::ErrorKind;
use std::path::PathBuf;

use letmein_core::config::ClientConfig;
use letmein_core::{LetmeinError, Result};

use crate::storage::write_atomic;

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the configuration, creating the file with defaults if missing.
    ///
    /// A file that exists but does not parse is an error; it is never
    /// overwritten.
    pub async fn load_or_create(&self) -> Result<ClientConfig> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let config: ClientConfig = toml::from_str(&content).map_err(|e| {
                    LetmeinError::config(format!("{}: {}", self.path.display(), e))
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let config = ClientConfig::default();
                self.save(&config).await?;
                tracing::info!("[Config] Created default config at {}", self.path.display());
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, config: &ClientConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)?;
        write_atomic(&self.path, content.as_bytes()).await
    }
}
