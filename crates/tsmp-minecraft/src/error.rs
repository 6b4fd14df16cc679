//! Minecraft-side error types.

use thiserror::Error;
use tsmp_common::error::TsmpError;

/// Errors talking to Mojang or the Minecraft server bridge.
#[derive(Debug, Error)]
pub enum MinecraftError {
    #[error("HTTP error communicating with {service}: {message}")]
    Http { service: &'static str, message: String },

    #[error("{service} returned status {status}: {body}")]
    UnexpectedStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl MinecraftError {
    pub(crate) fn http(service: &'static str, e: reqwest::Error) -> Self {
        Self::Http {
            service,
            message: e.to_string(),
        }
    }

    fn service(&self) -> &'static str {
        match self {
            Self::Http { service, .. } | Self::UnexpectedStatus { service, .. } => service,
            _ => "Minecraft",
        }
    }
}

impl From<MinecraftError> for TsmpError {
    fn from(e: MinecraftError) -> Self {
        TsmpError::upstream(e.service(), &e)
    }
}
