//! Request identity.
//!
//! The storefront identifies users by a plaintext `username` cookie with no
//! signature and no server-side store. Handlers never read the cookie
//! themselves: a `Session` is extracted per request through the
//! `IdentityResolver` held in the application state.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::extract::FromRequestParts;
use data_loader::Username;
use std::convert::Infallible;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the identity cookie
pub const SESSION_COOKIE: &str = "username";

/// Cookie lifetime: 30 days
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

/// Works out who a request belongs to.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<Username>;
}

/// Reads the identity from the `username` cookie.
#[derive(Debug, Default, Clone, Copy)]
pub struct CookieIdentity;

impl IdentityResolver for CookieIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Option<Username> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// The identity attached to one request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: Option<Username>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { username: None }
    }

    pub fn for_user(username: impl Into<Username>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The identity, or `SessionMissing`
    pub fn require_user(&self) -> Result<&str, AppError> {
        self.username().ok_or(AppError::SessionMissing)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session {
            username: state.identity.resolve(&parts.headers),
        })
    }
}

/// Reject names that can't travel in a cookie unescaped
pub fn validate_username(username: &str) -> Result<&str, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput("Username is required".to_string()));
    }
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | ',' | '=' | '"' | '\\'))
    {
        return Err(AppError::InvalidInput(
            "Username contains characters not allowed in a cookie".to_string(),
        ));
    }
    Ok(username)
}

/// `Set-Cookie` header that signs `username` in
pub fn sign_in_cookie(username: &str) -> Result<(axum::http::HeaderName, HeaderValue), AppError> {
    let cookie = format!(
        "{SESSION_COOKIE}={username}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; SameSite=Lax"
    );
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::InvalidInput(format!("Invalid username: {e}")))?;
    Ok((SET_COOKIE, value))
}

/// `Set-Cookie` header that clears the identity
pub fn sign_out_cookie() -> (axum::http::HeaderName, HeaderValue) {
    (
        SET_COOKIE,
        HeaderValue::from_static("username=; Path=/; Max-Age=0; SameSite=Lax"),
    )
}
