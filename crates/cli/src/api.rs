//! Client side of a running storefront server.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use data_loader::PreferenceDocument;
use questionnaire::{PreferenceSink, SinkError};
use reqwest::header::COOKIE;
use serde_json::Value;
use server::HomeView;
use tracing::debug;

/// Talks to the storefront HTTP API.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    http: reqwest::Client,
    base_url: String,
}

impl StorefrontApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Cold-start home view for `username` from freshly submitted preferences
    pub async fn cold_start(
        &self,
        username: &str,
        preferences: &PreferenceDocument,
    ) -> Result<HomeView> {
        let response = self
            .http
            .post(self.url("/api/home/coldstart"))
            .header(COOKIE, format!("username={username}"))
            .json(preferences)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body["error"].as_str().unwrap_or("unknown error");
            return Err(anyhow!("Server returned {}: {}", status, message));
        }

        response
            .json::<HomeView>()
            .await
            .context("Server sent an unreadable home view")
    }
}

#[async_trait]
impl PreferenceSink for StorefrontApi {
    fn name(&self) -> &str {
        "storefront-api"
    }

    async fn submit(&self, document: &PreferenceDocument) -> Result<(), SinkError> {
        debug!("Submitting preferences for {} to {}", document.username, self.base_url);
        self.http
            .post(self.url("/api/preferences"))
            .json(document)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
