//! Error types for the remote data sources.

use thiserror::Error;

/// Errors raised while talking to the text or recitation APIs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Local I/O failure while saving a download.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ClientError {
    /// Returns a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the server. Please check your internet connection.",
            Self::Status { .. } => "The server could not fulfil the request.",
            Self::MalformedResponse(_) => "The server sent data in an unexpected format.",
            Self::Io(_) => "Could not write the file.",
        }
    }

    /// Whether re-triggering the same action might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Io(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::MalformedResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
