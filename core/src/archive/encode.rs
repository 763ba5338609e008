use tracing::debug;

use crate::archive::naming::{member_name, NameRegistry};
use crate::archive::types::{ArchiveEntry, ArchiveError, NamingPolicy, ARCHIVE_HEADER_LEN};
use crate::constants::{ARCHIVE_VERSION, MAGIC_ARCHIVE};
use crate::record::{encoded_len, serialize};

/// Pack entries into one container, preserving input order.
///
/// Layout:
///
/// ```text
/// [ magic (4) ][ version (1) ][ reserved (3) ]
/// [ member_count (4) ]
/// [ name_len (2) ][ name ][ blob_len (8) ][ blob ]   × member_count
/// ```
///
/// Fails without producing output if a name collides under
/// `NamingPolicy::Reject`.
pub fn pack(entries: &[ArchiveEntry], policy: NamingPolicy) -> Result<Vec<u8>, ArchiveError> {
    let count = u32::try_from(entries.len())
        .map_err(|_| ArchiveError::TooManyMembers { count: entries.len() })?;

    let mut names = NameRegistry::new(policy);

    // Names first, so a collision fails before any serialization work.
    let assigned = entries
        .iter()
        .map(|e| names.assign(member_name(&e.record.origin, &e.file_name)))
        .collect::<Result<Vec<_>, _>>()?;

    let body_len: usize = entries
        .iter()
        .zip(&assigned)
        .map(|(e, name)| 2 + name.len() + 8 + encoded_len(&e.record))
        .sum();
    let mut out = Vec::with_capacity(ARCHIVE_HEADER_LEN + body_len);

    // --- Header ---
    out.extend_from_slice(&MAGIC_ARCHIVE);
    out.push(ARCHIVE_VERSION);
    out.extend_from_slice(&[0u8; 3]);
    out.extend_from_slice(&count.to_le_bytes());

    // --- Members ---
    for (entry, name) in entries.iter().zip(&assigned) {
        let blob = serialize(&entry.record);

        // NameRegistry::assign bounds the name to u16.
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&(blob.len() as u64).to_le_bytes());
        out.extend_from_slice(&blob);

        debug!(member = %name, bytes = blob.len(), "packed member");
    }

    debug_assert_eq!(out.len(), ARCHIVE_HEADER_LEN + body_len);

    Ok(out)
}
