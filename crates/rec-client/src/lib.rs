//! Client for the external recommendation service.
//!
//! The service is an opaque HTTP collaborator exposing two endpoints:
//! - `POST /recommend` with `{"user_id": ...}` for users with history
//! - `POST /recommendcoldstart` with a preference document for new users
//!
//! Both answer with a JSON array of game ids. This crate handles:
//! - Building the HTTP client
//! - Serializing requests and decoding the id list
//! - Mapping transport and status failures onto `RecClientError`
//!
//! There are no retries: a failure is reported once and the caller decides.

use std::time::Duration;

use async_trait::async_trait;
use data_loader::{GameId, PreferenceDocument};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Path of the warm-start endpoint
pub const RECOMMEND_PATH: &str = "/recommend";

/// Path of the cold-start endpoint
pub const COLD_START_PATH: &str = "/recommendcoldstart";

const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when talking to the recommendation service
#[derive(Error, Debug)]
pub enum RecClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Recommendation service unreachable: {0}")]
    Network(String),

    #[error("Recommendation service returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Invalid response from recommendation service: {0}")]
    InvalidResponse(String),
}

/// Anything that can turn a user or their preferences into game ids.
///
/// The home view depends on this trait rather than on the HTTP client so
/// tests can count calls and script failures.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Warm start: recommendations from an existing user's history
    async fn recommend(&self, user_id: &str) -> Result<Vec<GameId>, RecClientError>;

    /// Cold start: recommendations from freshly collected preferences
    async fn recommend_cold_start(
        &self,
        preferences: &PreferenceDocument,
    ) -> Result<Vec<GameId>, RecClientError>;
}

#[derive(Serialize)]
struct WarmStartRequest<'a> {
    user_id: &'a str,
}

/// HTTP client for the recommendation service.
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecommendationClient {
    /// Create a client for the service at `base_url` (e.g. "http://127.0.0.1:5000")
    pub fn new(base_url: impl Into<String>) -> Result<Self, RecClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Using recommendation service at {}", base_url);

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RecClientError::ClientBuild(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// Get the address of the service this client talks to.
    pub fn service_address(&self) -> &str {
        &self.base_url
    }

    async fn post_for_ids<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<GameId>, RecClientError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            RecClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} answered {}", url, status);
            return Err(RecClientError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let ids: Vec<GameId> = response
            .json()
            .await
            .map_err(|e| RecClientError::InvalidResponse(e.to_string()))?;
        debug!("{} returned {} ids", url, ids.len());
        Ok(ids)
    }
}

#[async_trait]
impl Recommender for RecommendationClient {
    async fn recommend(&self, user_id: &str) -> Result<Vec<GameId>, RecClientError> {
        debug!("Requesting warm-start recommendations for {}", user_id);
        self.post_for_ids(RECOMMEND_PATH, &WarmStartRequest { user_id })
            .await
    }

    async fn recommend_cold_start(
        &self,
        preferences: &PreferenceDocument,
    ) -> Result<Vec<GameId>, RecClientError> {
        debug!(
            "Requesting cold-start recommendations for {} ({} tags)",
            preferences.username,
            preferences.all_selected_tags.len()
        );
        self.post_for_ids(COLD_START_PATH, preferences).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use data_loader::TagPreferences;
    use serde_json::Value;
    use tokio::net::TcpListener;

    // ============================================================================
    // Mock Recommendation Service
    // ============================================================================

    async fn mock_recommend(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        match body["user_id"].as_str() {
            Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, Json(Value::Null)),
            Some("garbled") => (StatusCode::OK, Json(serde_json::json!({"ids": []}))),
            Some(_) => (StatusCode::OK, Json(serde_json::json!(["413150", "105600"]))),
            None => (StatusCode::BAD_REQUEST, Json(Value::Null)),
        }
    }

    /// Echo the selected tags back as ids, proving the document arrived intact
    async fn mock_cold_start(Json(body): Json<PreferenceDocument>) -> Json<Vec<String>> {
        Json(body.all_selected_tags)
    }

    /// Start a mock recommendation service on a random port
    async fn start_mock_service() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("Failed to get local address");

        let app = Router::new()
            .route(RECOMMEND_PATH, post(mock_recommend))
            .route(COLD_START_PATH, post(mock_cold_start));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock service failed");
        });

        (format!("http://{}", addr), handle)
    }

    fn sample_preferences() -> PreferenceDocument {
        PreferenceDocument {
            username: "newbie".to_string(),
            timestamp: "2026-10-18T12:00:00.000Z".to_string(),
            tag_preferences: TagPreferences {
                core_preferences: "Indie".to_string(),
                gameplay_style: "Clicker".to_string(),
                aesthetic_preferences: "2D".to_string(),
                special_features: "Mystery".to_string(),
            },
            image_preferences: vec![
                "Horror".into(),
                "Shooter".into(),
                "Adventure".into(),
                "2D".into(),
            ],
            all_selected_tags: vec![
                "Indie".into(), "Clicker".into(), "2D".into(), "Mystery".into(),
                "Horror".into(), "Shooter".into(), "Adventure".into(), "2D".into(),
            ],
        }
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RecommendationClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.service_address(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_warm_start_returns_ids() {
        let (addr, handle) = start_mock_service().await;
        let client = RecommendationClient::new(addr).unwrap();

        let ids = client.recommend("alice").await.unwrap();
        assert_eq!(ids, vec!["413150", "105600"]);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cold_start_sends_document() {
        let (addr, handle) = start_mock_service().await;
        let client = RecommendationClient::new(addr).unwrap();
        let preferences = sample_preferences();

        let ids = client.recommend_cold_start(&preferences).await.unwrap();
        assert_eq!(ids, preferences.all_selected_tags);

        handle.abort();
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_failure() {
        let (addr, handle) = start_mock_service().await;
        let client = RecommendationClient::new(addr).unwrap();

        let err = client.recommend("broken").await.unwrap_err();
        assert!(matches!(err, RecClientError::UpstreamStatus { status: 500, .. }));

        handle.abort();
    }

    #[tokio::test]
    async fn test_unexpected_body_is_invalid_response() {
        let (addr, handle) = start_mock_service().await;
        let client = RecommendationClient::new(addr).unwrap();

        let err = client.recommend("garbled").await.unwrap_err();
        assert!(matches!(err, RecClientError::InvalidResponse(_)));

        handle.abort();
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RecommendationClient::new(format!("http://{}", addr)).unwrap();
        let err = client.recommend("alice").await.unwrap_err();
        assert!(matches!(err, RecClientError::Network(_)));
    }
}
