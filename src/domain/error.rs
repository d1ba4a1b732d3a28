//! Domain-level error types for comment-batch.
//!
//! All errors are typed with `thiserror` and map onto the request/response
//! contract: invalid input, extraction failure, storage I/O, missing batch,
//! and malformed delimited text.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required argument was missing or empty.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The markup could not be processed (e.g. the marker selector is invalid).
    #[error("Extraction failed: {message}")]
    ExtractionFailed { message: String },

    /// Export requested while no batch exists.
    #[error("{message}")]
    NotFound { message: String },

    /// Structurally malformed delimited text.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON serialization failed.
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a parse error for the given 1-based line.
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a JSON error.
    pub fn json(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
