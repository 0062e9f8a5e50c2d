//! Game server API contract.
//!
//! Request/response bodies for the `/api/game/*` and `/api/health` endpoints,
//! and the [`GameApi`] trait the controller talks through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// `GET /api/game/welcome/{level}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub welcome_message: Option<String>,
}

/// `POST /api/game/message` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub session_id: String,
    pub level: u32,
    pub message: String,
}

/// `POST /api/game/message` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ai_response: Option<String>,
}

/// `POST /api/game/password` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRequest {
    pub session_id: String,
    pub level: u32,
    pub password: String,
}

/// `POST /api/game/password` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/health`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether the server can reach its language model backend.
    #[serde(default)]
    pub ollama_connected: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub game_ready: Option<bool>,
}

/// `GET /api/game/status/{session_id}`
///
/// The server answers with an `error` object for sessions it has never seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameStatus {
    Progress {
        completed_levels: Vec<u32>,
        total_levels: u32,
    },
    Unknown {
        error: String,
    },
}

/// `POST /api/game/reset/{session_id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client side of the game server.
///
/// An `Err` always means the exchange itself failed (unreachable server,
/// timeout, unparsable body). Application-level failures arrive as
/// `success: false` inside an `Ok` response.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn welcome(&self, level: u32) -> Result<WelcomeResponse>;

    async fn send_message(&self, request: &MessageRequest) -> Result<MessageResponse>;

    async fn check_password(&self, request: &PasswordRequest) -> Result<PasswordResponse>;

    async fn health(&self) -> Result<HealthResponse>;

    async fn status(&self, session_id: &str) -> Result<GameStatus>;

    async fn reset(&self, session_id: &str) -> Result<ResetResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_body_reads_as_failure() {
        // FastAPI's HTTPException body
        let response: MessageResponse =
            serde_json::from_str(r#"{"detail":"model offline"}"#).unwrap();
        assert!(!response.success);
        assert!(response.ai_response.is_none());
    }

    #[test]
    fn test_health_ignores_extra_fields() {
        let health: HealthResponse = serde_json::from_str(
            r#"{"status":"healthy","ollama_connected":true,"game_ready":true}"#,
        )
        .unwrap();
        assert!(health.ollama_connected);
        assert_eq!(health.game_ready, Some(true));
    }

    #[test]
    fn test_status_variants() {
        let progress: GameStatus =
            serde_json::from_str(r#"{"completed_levels":[1,2],"total_levels":4}"#).unwrap();
        assert_eq!(
            progress,
            GameStatus::Progress {
                completed_levels: vec![1, 2],
                total_levels: 4
            }
        );

        let unknown: GameStatus = serde_json::from_str(r#"{"error":"Session not found"}"#).unwrap();
        assert!(matches!(unknown, GameStatus::Unknown { .. }));
    }

    #[test]
    fn test_password_request_field_names() {
        let request = PasswordRequest {
            session_id: "session_x".to_string(),
            level: 2,
            password: "tiger42".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["session_id"], "session_x");
        assert_eq!(value["level"], 2);
        assert_eq!(value["password"], "tiger42");
    }
}
