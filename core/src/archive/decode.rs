use std::collections::HashSet;

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::archive::types::{
    ArchiveError, ArchiveMember, ContainerFault, MemberView, ARCHIVE_HEADER_LEN, MIN_MEMBER_LEN,
};
use crate::constants::{ARCHIVE_VERSION, MAGIC_ARCHIVE};
use crate::record::{deserialize, Record};

/// Split a container into borrowed member views without decoding records.
///
/// Every structural problem (magic, version, truncation, trailing bytes,
/// bad or repeated names) is reported as `CorruptArchive`.
pub fn open_container(wire: &[u8]) -> Result<Vec<MemberView<'_>>, ArchiveError> {
    if wire.len() < ARCHIVE_HEADER_LEN {
        return Err(ContainerFault::Truncated.into());
    }

    // --- fixed offsets ---
    let mut off = 0;

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&wire[off..off + 4]);
    off += 4;
    if magic != MAGIC_ARCHIVE {
        return Err(ContainerFault::InvalidMagic(magic).into());
    }

    let version = wire[off];
    off += 1;
    if version != ARCHIVE_VERSION {
        return Err(ContainerFault::UnsupportedVersion(version).into());
    }

    let mut reserved = [0u8; 3];
    reserved.copy_from_slice(&wire[off..off + 3]);
    off += 3;
    if reserved != [0u8; 3] {
        return Err(ContainerFault::ReservedBytesNonZero(reserved).into());
    }

    let count = LittleEndian::read_u32(&wire[off..off + 4]) as usize;
    off += 4;

    // Do not trust `count` for allocation beyond what the buffer can hold.
    let mut members = Vec::with_capacity(count.min((wire.len() - off) / MIN_MEMBER_LEN));
    let mut seen = HashSet::new();

    for _ in 0..count {
        if wire.len() - off < 2 {
            return Err(ContainerFault::Truncated.into());
        }
        let name_len = LittleEndian::read_u16(&wire[off..off + 2]) as usize;
        off += 2;

        if wire.len() - off < name_len {
            return Err(ContainerFault::Truncated.into());
        }
        let name = std::str::from_utf8(&wire[off..off + name_len])
            .map_err(|_| ContainerFault::InvalidMemberName)?;
        off += name_len;

        if wire.len() - off < 8 {
            return Err(ContainerFault::Truncated.into());
        }
        let blob_len = usize::try_from(LittleEndian::read_u64(&wire[off..off + 8]))
            .map_err(|_| ContainerFault::Truncated)?;
        off += 8;

        if wire.len() - off < blob_len {
            return Err(ContainerFault::Truncated.into());
        }
        let blob = &wire[off..off + blob_len];
        off += blob_len;

        if !seen.insert(name) {
            return Err(ContainerFault::DuplicateMemberName(name.to_owned()).into());
        }

        members.push(MemberView { name, blob });
    }

    if off != wire.len() {
        return Err(ContainerFault::TrailingBytes { extra: wire.len() - off }.into());
    }

    Ok(members)
}

/// Decode every member in stored order. All-or-nothing: the first bad member
/// aborts with `MalformedRecord` and nothing is returned.
pub fn unpack_members(wire: &[u8]) -> Result<Vec<ArchiveMember>, ArchiveError> {
    open_container(wire)?
        .into_iter()
        .map(|view| -> Result<ArchiveMember, ArchiveError> {
            let record = deserialize(view.blob).map_err(|source| ArchiveError::MalformedRecord {
                member: view.name.to_owned(),
                source,
            })?;
            debug!(member = view.name, "unpacked member");
            Ok(ArchiveMember { name: view.name.to_owned(), record })
        })
        .collect()
}

/// Decode every member, dropping names.
pub fn unpack(wire: &[u8]) -> Result<Vec<Record>, ArchiveError> {
    Ok(unpack_members(wire)?.into_iter().map(|m| m.record).collect())
}
