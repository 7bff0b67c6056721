use thiserror::Error;
use tracing::{error, warn};

/// Why a single metadata fetch attempt failed.
///
/// Every variant is terminal for the attempt; nothing is retried and no
/// placeholder record is produced in its place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Metadata service returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Malformed metadata response: {0}")]
    Parse(String),

    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl FetchError {
    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }

    pub fn log(&self) {
        match self {
            FetchError::Network(e) => {
                error!(error = %e, "Metadata request failed");
            }
            FetchError::HttpStatus { status, message } => {
                warn!(status = status, error = %message, "Metadata service rejected request");
            }
            FetchError::Parse(e) => {
                error!(error = %e, "Metadata response could not be parsed");
            }
            FetchError::Timeout(e) => {
                warn!(error = %e, "Metadata request timed out");
            }
        }
    }
}
