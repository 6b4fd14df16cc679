//! Error types for the Discord layer.

use thiserror::Error;
use tsmp_common::error::TsmpError;

#[derive(Debug, Error)]
pub enum DiscordError {
    /// The HTTP response had a non-2xx status code.
    #[error("Discord API error {status}: {message}")]
    Api { status: u16, message: String },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured application public key is unusable.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Signature headers missing, malformed, or not matching the body.
    #[error("Invalid request signature")]
    InvalidSignature,
}

pub type Result<T> = std::result::Result<T, DiscordError>;

impl From<DiscordError> for TsmpError {
    fn from(e: DiscordError) -> Self {
        TsmpError::upstream("Discord", &e)
    }
}
