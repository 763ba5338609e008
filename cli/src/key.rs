//! Key text → `EnvelopeKey`.
//!
//! Accepted forms:
//! - `hex:<digits>` decodes to 16, 24 or 32 bytes.
//! - anything else is taken as its UTF-8 bytes.
//!
//! No derivation, no stretching: the bytes must already be a valid AES key.

use imgseal_core::crypto::EnvelopeKey;
use thiserror::Error;
use zeroize::Zeroizing;

const HEX_PREFIX: &str = "hex:";

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("key must be 16, 24 or 32 bytes, got {actual}")]
    InvalidLength { actual: usize },
}

pub fn parse_key(text: &str) -> Result<EnvelopeKey, KeyError> {
    let bytes = match text.strip_prefix(HEX_PREFIX) {
        Some(digits) => Zeroizing::new(hex::decode(digits.trim())?),
        None => Zeroizing::new(text.as_bytes().to_vec()),
    };

    EnvelopeKey::new(bytes.to_vec()).map_err(|e| KeyError::InvalidLength { actual: e.actual })
}
