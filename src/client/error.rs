//! Error types for the catalog API client.

use thiserror::Error;

/// Errors that can occur when calling the catalog API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The configured base URL is unusable
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with an error status; `message` is its user-facing text
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ClientError {
    /// HTTP status when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
