use thiserror::Error;

use crate::traits::SinkError;

/// Errors raised by the questionnaire state machine
#[derive(Error, Debug)]
pub enum QuestionnaireError {
    /// The selected option isn't offered at the current step
    #[error("{option:?} is not an option for question {}", .step + 1)]
    InvalidOption { step: usize, option: String },

    /// Input arrived after the preferences were already submitted
    #[error("Preferences were already submitted")]
    AlreadySubmitted,

    /// Resubmission was requested before every question had an answer
    #[error("Question {} has not been answered", .step + 1)]
    Incomplete { step: usize },

    /// The sink rejected the preference document
    #[error("Failed to save preferences: {0}")]
    Submission(#[source] SinkError),
}

pub type Result<T> = std::result::Result<T, QuestionnaireError>;
