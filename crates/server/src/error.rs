use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rec_client::RecClientError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Every failure a request can end in.
///
/// The `Display` text is the message shown to the user; no structured codes
/// leave the server beyond the HTTP status.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed request body or parameter
    #[error("{0}")]
    InvalidInput(String),

    /// No identity cookie on the request
    #[error("No user logged in")]
    SessionMissing,

    #[error("User not found")]
    UserNotFound(String),

    /// The recommendation service was unreachable or answered with an error
    #[error("Failed to get recommendations")]
    Upstream(#[from] RecClientError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::SessionMissing => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Upstream(source) => warn!("Upstream failure: {source}"),
            AppError::UserNotFound(username) => warn!("Unknown user {username:?}"),
            _ => {}
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
