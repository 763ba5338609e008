//! crypto/iv.rs
//! Fresh random IVs for the envelope.
//!
//! Security notes:
//! - One IV per `encrypt` call, drawn from the OS RNG. Never derived, never reused.
//! - All-zero output is treated as a broken source and rejected.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::IV_LEN;
use crate::crypto::types::EnvelopeError;

/// Draw a 16-byte IV from the operating system's random source.
pub fn generate_iv() -> Result<[u8; IV_LEN], EnvelopeError> {
    let mut iv = [0u8; IV_LEN];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| EnvelopeError::RandomSource(e.to_string()))?;
    validate_iv(&iv)?;
    Ok(iv)
}

#[inline]
pub fn validate_iv(iv: &[u8; IV_LEN]) -> Result<(), EnvelopeError> {
    if iv.iter().all(|&b| b == 0) {
        return Err(EnvelopeError::RandomSource("all-zero IV".into()));
    }
    Ok(())
}
