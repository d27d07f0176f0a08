//! Result and error types for the media mock.

use thiserror::Error;

/// Result type for media mock operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while mocking `matchMedia`
#[derive(Debug, Error)]
pub enum MediaError {
    /// The media query could not be parsed
    #[error("Invalid media query {query:?}: {message}")]
    InvalidQuery {
        /// Query as passed by the caller
        query: String,
        /// Parser diagnostic
        message: String,
    },

    /// The un-mocked environment does not provide this API
    #[error("{api} is not implemented in this environment")]
    Unsupported {
        /// Name of the missing API
        api: String,
    },

    /// Configuration could not be read
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an invalid query error
    pub(crate) fn invalid_query(query: &str, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            query: query.to_string(),
            message: message.into(),
        }
    }
}
