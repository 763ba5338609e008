use std::fmt;

use crate::record::{Record, RecordError};

/// Container prefix: magic, version, reserved, member_count.
pub const ARCHIVE_HEADER_LEN: usize = 4 // magic
    + 1                                 // version
    + 3                                 // reserved
    + 4;                                // member_count

/// Smallest possible member: empty name and empty blob prefixes.
pub const MIN_MEMBER_LEN: usize = 2 // name_len
    + 8;                            // blob_len

/// What `pack` does when two entries map to the same member name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Fail the whole pack with `DuplicateMember`.
    #[default]
    Reject,
    /// Append `-2`, `-3`, ... before the extension of the later entry.
    Disambiguate,
}

impl NamingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingPolicy::Reject => "reject",
            NamingPolicy::Disambiguate => "disambiguate",
        }
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(NamingPolicy::Reject),
            "disambiguate" => Ok(NamingPolicy::Disambiguate),
            other => Err(format!("unknown naming policy: {:?} (expected reject|disambiguate)", other)),
        }
    }
}

/// Input to `pack`: a record plus the file name it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub file_name: String,
    pub record: Record,
}

impl ArchiveEntry {
    pub fn new(file_name: impl Into<String>, record: Record) -> Self {
        Self { file_name: file_name.into(), record }
    }
}

/// Output of `unpack_members`: a decoded record under its stored name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveMember {
    pub name: String,
    pub record: Record,
}

/// Borrowed view over one member inside a container buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberView<'a> {
    pub name: &'a str,
    pub blob: &'a [u8],
}

/// Reasons a container cannot be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerFault {
    InvalidMagic([u8; 4]),
    UnsupportedVersion(u8),
    ReservedBytesNonZero([u8; 3]),
    Truncated,
    TrailingBytes { extra: usize },
    InvalidMemberName,
    DuplicateMemberName(String),
}

impl fmt::Display for ContainerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ContainerFault::*;
        match self {
            InvalidMagic(m) =>
                write!(f, "invalid archive magic: 0x{}", hex::encode(m)),
            UnsupportedVersion(v) =>
                write!(f, "unsupported archive version: {}", v),
            ReservedBytesNonZero(r) =>
                write!(f, "reserved bytes must be zero, got 0x{}", hex::encode(r)),
            Truncated =>
                write!(f, "truncated archive"),
            TrailingBytes { extra } =>
                write!(f, "{} trailing bytes after last member", extra),
            InvalidMemberName =>
                write!(f, "member name is not valid UTF-8"),
            DuplicateMemberName(name) =>
                write!(f, "member {:?} appears more than once", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// Two entries map to the same member name under `NamingPolicy::Reject`.
    DuplicateMember { name: String },

    /// Member name does not fit the u16 length prefix.
    MemberNameTooLong { len: usize },

    /// More entries than the u32 member count can express.
    TooManyMembers { count: usize },

    /// Container cannot be opened.
    CorruptArchive(ContainerFault),

    /// A member blob failed to deserialize.
    MalformedRecord { member: String, source: RecordError },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ArchiveError::*;
        match self {
            DuplicateMember { name } =>
                write!(f, "duplicate archive member: {:?}", name),
            MemberNameTooLong { len } =>
                write!(f, "member name too long: {} bytes", len),
            TooManyMembers { count } =>
                write!(f, "too many archive members: {}", count),
            CorruptArchive(fault) =>
                write!(f, "corrupt archive: {}", fault),
            MalformedRecord { member, source } =>
                write!(f, "malformed record in member {:?}: {}", member, source),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::MalformedRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ContainerFault> for ArchiveError {
    fn from(fault: ContainerFault) -> Self {
        ArchiveError::CorruptArchive(fault)
    }
}
