//! Discord plumbing for the TSMP bot.
//!
//! The bot runs on Discord's HTTP interactions model: Discord POSTs each
//! interaction to us, we verify its Ed25519 signature, answer within three
//! seconds (usually with a deferred response), and finish the work later by
//! editing the original response over REST.

pub mod builders;
pub mod error;
pub mod rest;
pub mod types;
pub mod verify;

pub use error::{DiscordError, Result};
pub use rest::DiscordClient;
pub use types::*;
pub use verify::InteractionVerifier;
