//! Path management for letmein configuration, saved state and logs.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/letmein/           # Config directory
//! ├── config.toml              # Client configuration
//! ├── state/                   # Key/value store (saved game)
//! │   └── letmeinGameState.json
//! └── logs/                    # Application logs
//!     └── letmein.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use letmein_core::LetmeinError;

const APP_DIR_NAME: &str = "letmein";

/// Resolves every file location the client uses.
///
/// `base` replaces the platform config directory; tests and `--config-dir`
/// use it to keep everything under one root.
#[derive(Debug, Clone, Default)]
pub struct LetmeinPaths {
    base: Option<PathBuf>,
}

impl LetmeinPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the letmein configuration directory
    /// (e.g. `~/.config/letmein/`).
    pub fn config_dir(&self) -> Result<PathBuf, LetmeinError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| LetmeinError::config("Cannot find config directory")),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, LetmeinError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the directory backing the key/value store.
    pub fn state_dir(&self) -> Result<PathBuf, LetmeinError> {
        Ok(self.config_dir()?.join("state"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, LetmeinError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
