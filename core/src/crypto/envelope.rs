//! crypto/envelope.rs
//! AES-CBC envelope with PKCS#7 padding.
//!
//! Design notes:
//! - Wire form is `iv (16) ‖ ciphertext`; no header, no tag.
//! - No authentication. A corrupted ciphertext that still unpads decrypts to
//!   garbage without error; integrity must come from a higher layer.
//! - Every decrypt failure maps to `InvalidKeyOrCorruptData` so callers can
//!   never tell a wrong key from damaged data.
//! - Keys are borrowed per call and never copied outside cipher state, which
//!   `aes`/`cbc` zeroize on drop.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use tracing::debug;

use crate::constants::{BLOCK_LEN, IV_LEN};
use crate::crypto::iv::generate_iv;
use crate::crypto::types::{CipherSuite, EnvelopeError};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes192CbcDec = cbc::Decryptor<aes::Aes192>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Envelope size for a plaintext of `len` bytes (PKCS#7 always adds 1..=16).
pub const fn envelope_len(len: usize) -> usize {
    IV_LEN + (len / BLOCK_LEN + 1) * BLOCK_LEN
}

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// Two calls with the same inputs produce different envelopes.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    // Check the key before touching the RNG.
    CipherSuite::for_key(key)?;
    let iv = generate_iv()?;
    encrypt_with_iv(plaintext, key, &iv)
}

/// Encrypt with a caller-supplied IV. Deterministic; for known-answer tests
/// and callers that manage IVs themselves. Never reuse an IV under one key.
pub fn encrypt_with_iv(
    plaintext: &[u8],
    key: &[u8],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>, EnvelopeError> {
    let suite = CipherSuite::for_key(key)?;
    let bad_key = |_| EnvelopeError::InvalidKeyLen { actual: key.len() };

    let ciphertext = match suite {
        CipherSuite::Aes128Cbc => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(bad_key)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        CipherSuite::Aes192Cbc => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(bad_key)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        CipherSuite::Aes256Cbc => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(bad_key)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    };

    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);

    debug_assert_eq!(out.len(), envelope_len(plaintext.len()));
    debug!(suite = ?suite, plaintext = plaintext.len(), envelope = out.len(), "sealed envelope");

    Ok(out)
}

/// Split the IV, decrypt, and strip padding.
pub fn decrypt(envelope: &[u8], key: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    let suite = CipherSuite::for_key_len(key.len()).ok_or(EnvelopeError::InvalidKeyOrCorruptData)?;

    if envelope.len() < IV_LEN {
        return Err(EnvelopeError::InvalidKeyOrCorruptData);
    }
    let (iv, ciphertext) = envelope.split_at(IV_LEN);

    // Padding guarantees at least one full block.
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(EnvelopeError::InvalidKeyOrCorruptData);
    }

    let plaintext = match suite {
        CipherSuite::Aes128Cbc => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|_| EnvelopeError::InvalidKeyOrCorruptData)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        CipherSuite::Aes192Cbc => Aes192CbcDec::new_from_slices(key, iv)
            .map_err(|_| EnvelopeError::InvalidKeyOrCorruptData)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        CipherSuite::Aes256Cbc => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|_| EnvelopeError::InvalidKeyOrCorruptData)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
    }
    .map_err(|_| EnvelopeError::InvalidKeyOrCorruptData)?;

    debug!(suite = ?suite, envelope = envelope.len(), plaintext = plaintext.len(), "opened envelope");

    Ok(plaintext)
}
