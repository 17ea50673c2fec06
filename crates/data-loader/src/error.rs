//! Error types for the data-loader crate.
//!
//! Loading the fixtures is the only fallible operation here: lookups never
//! fail, they either return a record or synthesize a placeholder.

use thiserror::Error;

/// Errors that can occur while loading and validating fixture files
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Fixture file is not valid JSON or doesn't match the record shape
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// A record field had an invalid value
    #[error("Invalid value for {field} of {key}: {value:?}")]
    InvalidValue {
        key: String,
        field: String,
        value: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
