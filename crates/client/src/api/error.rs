//! Errors raised by the API client.

use thiserror::Error;

/// Errors that can occur when calling the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The path could not be turned into a URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// No response was received (connection, DNS, TLS or body read failure).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived with a status outside the 2xx range.
    #[error("HTTP {status}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, if it could be read.
        message: String,
    },

    /// A 2xx response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Status code carried by an HTTP status error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never produced a response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
