use std::io;
use std::path::PathBuf;

use crate::{
    archive::ArchiveError,
    crypto::EnvelopeError,
    record::RecordError,
};


/// Unified error for the pack/unpack pipeline.
/// - `From<T>` impls let `?` cross module boundaries.
/// - Decryption failures collapse into `InvalidKeyOrCorruptData`; the message
///   never says which of the two happened.
#[derive(Debug)]
pub enum SealError {
    /// Transcoder could not decode an input image.
    UnreadableImage { path: PathBuf, reason: String },

    /// Transcoder could not encode or write an output image.
    UnwritableImage { path: PathBuf, reason: String },

    /// A record blob did not parse.
    MalformedRecord { member: Option<String>, reason: RecordError },

    /// Container could not be opened.
    CorruptArchive(String),

    /// Member name collision during packing.
    DuplicateMember { name: String },

    /// Wrong key or damaged envelope.
    InvalidKeyOrCorruptData,

    /// Key length not accepted by the cipher.
    InvalidKeyLen { actual: usize },

    /// Cipher setup failure unrelated to the key (e.g. RNG).
    Crypto(String),

    /// Every provided input was skipped.
    NoInputs { skipped: usize },

    /// I/O error outside the transcoder (reading/writing the envelope).
    Io(io::Error),

    /// Generic caller-side validation with a descriptive message.
    Validation(String),
}

impl std::fmt::Display for SealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SealError::UnreadableImage { path, reason } =>
                write!(f, "unreadable image {}: {}", path.display(), reason),
            SealError::UnwritableImage { path, reason } =>
                write!(f, "unwritable image {}: {}", path.display(), reason),
            SealError::MalformedRecord { member: Some(m), reason } =>
                write!(f, "malformed record in member {:?}: {}", m, reason),
            SealError::MalformedRecord { member: None, reason } =>
                write!(f, "malformed record: {}", reason),
            SealError::CorruptArchive(msg) => write!(f, "corrupt archive: {}", msg),
            SealError::DuplicateMember { name } => write!(f, "duplicate archive member: {:?}", name),
            SealError::InvalidKeyOrCorruptData => write!(f, "decryption failed"),
            SealError::InvalidKeyLen { actual } =>
                write!(f, "invalid key length: {} bytes (expected 16, 24 or 32)", actual),
            SealError::Crypto(msg) => write!(f, "crypto failure: {}", msg),
            SealError::NoInputs { skipped } =>
                write!(f, "no readable images ({} skipped)", skipped),
            SealError::Io(e) => write!(f, "I/O error: {}", e),
            SealError::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for SealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SealError::MalformedRecord { reason, .. } => Some(reason),
            SealError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SealError {
    fn from(e: io::Error) -> Self {
        SealError::Io(e)
    }
}

impl From<RecordError> for SealError {
    fn from(e: RecordError) -> Self {
        SealError::MalformedRecord { member: None, reason: e }
    }
}

impl From<ArchiveError> for SealError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::DuplicateMember { name } => SealError::DuplicateMember { name },
            ArchiveError::MalformedRecord { member, source } =>
                SealError::MalformedRecord { member: Some(member), reason: source },
            ArchiveError::CorruptArchive(fault) => SealError::CorruptArchive(fault.to_string()),
            other @ (ArchiveError::MemberNameTooLong { .. } | ArchiveError::TooManyMembers { .. }) =>
                SealError::Validation(other.to_string()),
        }
    }
}

impl From<EnvelopeError> for SealError {
    fn from(e: EnvelopeError) -> Self {
        match e {
            EnvelopeError::InvalidKeyLen { actual } => SealError::InvalidKeyLen { actual },
            EnvelopeError::RandomSource(msg) => SealError::Crypto(msg),
            EnvelopeError::InvalidKeyOrCorruptData => SealError::InvalidKeyOrCorruptData,
        }
    }
}
