//! The seam between the questionnaire and whatever stores preferences.

use async_trait::async_trait;
use data_loader::PreferenceDocument;

/// Error type sinks report; any error can be boxed into it
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receives the preference document of a completed questionnaire.
///
/// The questionnaire calls `submit` exactly once per completed run, and
/// again only when the caller explicitly retries after a failure.
#[async_trait]
pub trait PreferenceSink: Send + Sync {
    /// Returns the name of this sink (for logging)
    fn name(&self) -> &str;

    async fn submit(&self, preferences: &PreferenceDocument) -> Result<(), SinkError>;
}
