//! HttpGameApi - REST client for the Let Me In game server.

use async_trait::async_trait;
use letmein_core::api::{
    GameApi, GameStatus, HealthResponse, MessageRequest, MessageResponse, PasswordRequest,
    PasswordResponse, ResetResponse, WelcomeResponse,
};
use letmein_core::config::ClientConfig;
use letmein_core::{LetmeinError, Result};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

/// [`GameApi`] over HTTP.
///
/// Bodies are decoded whatever the status code: the server reports most
/// application failures as JSON with `success: false`. A body that is not
/// the expected JSON becomes [`LetmeinError::Decode`].
#[derive(Clone)]
pub struct HttpGameApi {
    client: Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LetmeinError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|err| {
            LetmeinError::transport(format!("{} request failed: {}", path, err))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            LetmeinError::transport(format!("{} body could not be read: {}", path, err))
        })?;

        if !status.is_success() {
            tracing::debug!("[HttpGameApi] {} answered {}", path, status);
        }
        parse_body(path, status, &body)
    }

    /// URL of `prefix` followed by `session_id` as one percent-encoded path
    /// segment, so ids containing `/`, `?` or `#` cannot change the route.
    fn session_url(&self, prefix: &str, session_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url(prefix))
            .map_err(|e| LetmeinError::config(format!("Invalid server URL: {}", e)))?;
        let shown = url.to_string();
        url.path_segments_mut()
            .map_err(|_| LetmeinError::config(format!("Server URL cannot hold a path: {}", shown)))?
            .push(session_id);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(path, self.client.get(self.url(path))).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(path, request).await
    }
}

fn parse_body<T: DeserializeOwned>(path: &str, status: StatusCode, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| LetmeinError::decode(path, format!("HTTP {}: {}", status.as_u16(), err)))
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn welcome(&self, level: u32) -> Result<WelcomeResponse> {
        self.get(&format!("/api/game/welcome/{}", level)).await
    }

    async fn send_message(&self, request: &MessageRequest) -> Result<MessageResponse> {
        self.post("/api/game/message", request).await
    }

    async fn check_password(&self, request: &PasswordRequest) -> Result<PasswordResponse> {
        self.post("/api/game/password", request).await
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.get("/api/health").await
    }

    async fn status(&self, session_id: &str) -> Result<GameStatus> {
        let url = self.session_url("/api/game/status", session_id)?;
        self.execute("/api/game/status", self.client.get(url)).await
    }

    async fn reset(&self, session_id: &str) -> Result<ResetResponse> {
        let url = self.session_url("/api/game/reset", session_id)?;
        self.execute("/api/game/reset", self.client.post(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let config = ClientConfig {
            server_url: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };
        let api = HttpGameApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/api/health"), "http://localhost:8000/api/health");
    }

    #[test]
    fn test_parse_error_status_body() {
        let response: MessageResponse = parse_body(
            "/api/game/message",
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"boom"}"#,
        )
        .unwrap();
        assert!(!response.success);
    }

    #[test]
    fn test_parse_non_json_is_decode_error() {
        let err = parse_body::<HealthResponse>("/api/health", StatusCode::BAD_GATEWAY, "<html>")
            .unwrap_err();
        assert!(err.is_connection_failure());
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_session_id_is_one_path_segment() {
        let api = HttpGameApi::new(&ClientConfig::default()).unwrap();
        let url = api
            .session_url("/api/game/status", "session_abc123def1700000000000")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/game/status/session_abc123def1700000000000"
        );

        let url = api.session_url("/api/game/reset", "a/b?c#d").unwrap();
        assert_eq!(url.path(), "/api/game/reset/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Bind then release an ephemeral port so nothing listens on it.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = ClientConfig {
            server_url: format!("http://127.0.0.1:{}", port),
            request_timeout_secs: 2,
            ..ClientConfig::default()
        };
        let api = HttpGameApi::new(&config).unwrap();
        let err = api.health().await.unwrap_err();
        assert!(matches!(err, LetmeinError::Transport(_)));
    }
}
