use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::KEY_LENGTHS;

/// AES-CBC variant selected by key length.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CipherSuite {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
}

impl CipherSuite {
    /// Suite for `key`, or the rejected length.
    pub fn for_key(key: &[u8]) -> Result<Self, InvalidKeyLength> {
        Self::for_key_len(key.len()).ok_or(InvalidKeyLength { actual: key.len() })
    }

    pub fn for_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(CipherSuite::Aes128Cbc),
            24 => Some(CipherSuite::Aes192Cbc),
            32 => Some(CipherSuite::Aes256Cbc),
            _ => None,
        }
    }
}

/// Caller-held key bytes, wiped on drop.
///
/// The envelope functions take `&[u8]` directly; this wrapper is for callers
/// that keep a key around for more than one call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EnvelopeKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    suite: CipherSuite,
}

impl EnvelopeKey {
    pub fn new(mut bytes: Vec<u8>) -> Result<Self, InvalidKeyLength> {
        match CipherSuite::for_key(&bytes) {
            Ok(suite) => Ok(Self { bytes, suite }),
            Err(err) => {
                bytes.zeroize();
                Err(err)
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }
}

impl AsRef<[u8]> for EnvelopeKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for EnvelopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnvelopeKey(<redacted>, {:?})", self.suite)
    }
}

/// Key length is not one of the supported AES key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidKeyLength {
    pub actual: usize,
}

impl fmt::Display for InvalidKeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid key length: {} bytes (expected one of {:?})", self.actual, KEY_LENGTHS)
    }
}

impl std::error::Error for InvalidKeyLength {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Key length is not one of the supported AES key sizes (encrypt side).
    InvalidKeyLen { actual: usize },

    /// OS random source failed while generating an IV.
    RandomSource(String),

    /// Decryption failed. Wrong key and corrupted data are indistinguishable
    /// for an unauthenticated mode, so they share one variant.
    InvalidKeyOrCorruptData,
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EnvelopeError::*;
        match self {
            InvalidKeyLen { actual } =>
                write!(f, "invalid key length: {} bytes (expected one of {:?})", actual, KEY_LENGTHS),
            RandomSource(msg) =>
                write!(f, "random source failure: {}", msg),
            InvalidKeyOrCorruptData =>
                write!(f, "decryption failed: invalid key or corrupt data"),
        }
    }
}

impl std::error::Error for EnvelopeError {}

impl From<InvalidKeyLength> for EnvelopeError {
    fn from(e: InvalidKeyLength) -> Self {
        EnvelopeError::InvalidKeyLen { actual: e.actual }
    }
}
