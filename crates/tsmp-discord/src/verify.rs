//! Verification of Discord's interaction request signatures.
//!
//! Discord signs `timestamp || body` with the application's Ed25519 key and
//! sends the hex signature in `X-Signature-Ed25519` and the timestamp in
//! `X-Signature-Timestamp`. Requests failing verification must get a 401.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::{DiscordError, Result};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    /// Build from the hex public key shown in the developer portal.
    pub fn from_hex(public_key: &str) -> Result<Self> {
        let bytes: [u8; 32] = hex::decode(public_key.trim())
            .map_err(|e| DiscordError::InvalidPublicKey(e.to_string()))?
            .try_into()
            .map_err(|_| DiscordError::InvalidPublicKey("expected 32 bytes".into()))?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| DiscordError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { key })
    }

    pub fn verify(&self, signature_hex: &str, timestamp: &str, body: &[u8]) -> Result<()> {
        let sig_bytes: [u8; 64] = hex::decode(signature_hex)
            .map_err(|_| DiscordError::InvalidSignature)?
            .try_into()
            .map_err(|_| DiscordError::InvalidSignature)?;
        let signature = Signature::from_bytes(&sig_bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| DiscordError::InvalidSignature)
    }
}
