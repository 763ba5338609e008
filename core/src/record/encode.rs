//! record/encode.rs
//!
//! Record serialization.
//!
//! Design notes:
//! - Field order must match `decode.rs` exactly.
//! - Every variable-length field carries a u64 length prefix, so encoding is
//!   total for any `Record`.
//! - Output is deterministic: the same record always yields the same bytes.

use crate::constants::{MAGIC_RECORD, RECORD_VERSION};
use crate::record::types::Record;

/// Fixed prefix: magic, version, sample type, reserved, shape.
pub const RECORD_PREFIX_LEN: usize = 4 // magic
    + 1                                // version
    + 1                                // sample_type
    + 2                                // reserved
    + 4                                // height
    + 4                                // width
    + 4;                               // channels

/// Exact encoded size of `record`.
pub fn encoded_len(record: &Record) -> usize {
    RECORD_PREFIX_LEN
        + 8 + record.origin.len()
        + 8 + record.captured_at.len()
        + 8 + record.tag.len()
        + 8 + record.source_extension.len()
        + 8 + record.pixels.byte_len()
}

/// Serialize a record into a self-describing blob.
///
/// Layout:
///
/// ```text
/// [ magic (4) ][ version (1) ][ sample_type (1) ][ reserved (2) ]
/// [ height (4) ][ width (4) ][ channels (4) ]
/// [ origin_len (8) ][ origin ]
/// [ captured_at_len (8) ][ captured_at ]
/// [ tag_len (8) ][ tag ]
/// [ extension_len (8) ][ extension ]
/// [ pixel_len (8) ][ pixels ]
/// ```
pub fn serialize(record: &Record) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(record));

    fn put_u32(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_le_bytes());
    }
    fn put_field(out: &mut Vec<u8>, b: &[u8]) {
        out.extend_from_slice(&(b.len() as u64).to_le_bytes());
        out.extend_from_slice(b);
    }

    let shape = record.pixels.shape();

    // --- Prefix ---
    out.extend_from_slice(&MAGIC_RECORD);
    out.push(RECORD_VERSION);
    out.push(record.pixels.dtype() as u8);
    out.extend_from_slice(&[0u8; 2]);
    put_u32(&mut out, shape.height);
    put_u32(&mut out, shape.width);
    put_u32(&mut out, shape.channels);

    // --- Metadata ---
    put_field(&mut out, record.origin.as_bytes());
    put_field(&mut out, record.captured_at.as_bytes());
    put_field(&mut out, record.tag.as_bytes());
    put_field(&mut out, record.source_extension.as_bytes());

    // --- Pixels ---
    put_field(&mut out, record.pixels.data());

    debug_assert_eq!(out.len(), encoded_len(record), "record encoding wrote incorrect length");

    out
}
