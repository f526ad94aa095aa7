//! Error types for the AG-UI chat client.

use thiserror::Error;

/// Errors that can occur while talking to an AG-UI backend.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The HTTP request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code returned by the backend.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body stream failed mid-way.
    #[error("Stream error: {0}")]
    Stream(String),

    /// An event payload could not be decoded (only surfaced under
    /// [`DecodeErrorPolicy::Fail`](crate::ingest::DecodeErrorPolicy::Fail)).
    #[error("Failed to decode event payload {payload:?}: {source}")]
    Decode {
        /// The raw `data:` payload.
        payload: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ChatError {
    /// Returns true if the error happened before or while reaching the backend,
    /// as opposed to a problem with the data it sent.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ChatError::Http(_) | ChatError::Status { .. } | ChatError::Stream(_)
        )
    }
}

/// Result type alias for client operations.
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
