use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Client configuration, stored as `config.toml`.
///
/// Every field has a default so a partial (or empty) file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the game server, without trailing `/api`.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Upper bound for a single HTTP request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Period of the background health check.
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
    /// Delay between a correct password and the automatic move to the next level.
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_health_interval_secs() -> u64 {
    30
}

fn default_advance_delay_ms() -> u64 {
    2000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_request_timeout_secs(),
            health_interval_secs: default_health_interval_secs(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Never zero; `tokio::time::interval` panics on a zero period.
    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    /// Overrides the server URL, dropping any trailing slash.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
