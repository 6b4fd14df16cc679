//! Error types for the TSMP SDK.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The HTTP response had a non-2xx status code.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The market needs a signed-in session.
    #[error("Not signed in")]
    NotSignedIn,

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// The server's machine-readable error code, for API errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
