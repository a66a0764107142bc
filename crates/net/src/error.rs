//! Calendar provider error types

use std::time::Duration;

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Calendar provider errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Calendar API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Calendar not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

impl Error {
    /// Whether another attempt might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::Status { status, .. } => *status == 429 || *status >= 500,
            Error::Timeout(_) => true,
            Error::NotConfigured(_) | Error::InvalidEvent(_) => false,
        }
    }
}
