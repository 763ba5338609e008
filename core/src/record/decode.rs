//! record/decode.rs
//!
//! Record deserialization.
//!
//! Design notes:
//! - Field order must match `encode.rs` exactly.
//! - Length prefixes are checked against the remaining input before slicing.
//! - The pixel payload must match shape × sample size; mismatches are rejected
//!   rather than truncated or padded.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{MAGIC_RECORD, RECORD_VERSION};
use crate::record::encode::RECORD_PREFIX_LEN;
use crate::record::types::{PixelBuffer, PixelShape, Record, RecordError, RecordField, SampleType};

/// Bounds-checked cursor over a record blob.
struct FieldReader<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.off
    }

    fn take(&mut self, n: usize, field: RecordField) -> Result<&'a [u8], RecordError> {
        if n > self.remaining() {
            return Err(RecordError::Truncated { field });
        }
        let out = &self.buf[self.off..self.off + n];
        self.off += n;
        Ok(out)
    }

    fn u32(&mut self, field: RecordField) -> Result<u32, RecordError> {
        Ok(LittleEndian::read_u32(self.take(4, field)?))
    }

    /// u64 length prefix followed by that many bytes.
    fn field(&mut self, field: RecordField) -> Result<&'a [u8], RecordError> {
        let len = LittleEndian::read_u64(self.take(8, field)?);
        let len = usize::try_from(len).map_err(|_| RecordError::Truncated { field })?;
        self.take(len, field)
    }

    fn text(&mut self, field: RecordField) -> Result<String, RecordError> {
        let raw = self.field(field)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| RecordError::InvalidUtf8 { field })
    }
}

/// Deserialize a record blob produced by [`serialize`](crate::record::serialize).
pub fn deserialize(bytes: &[u8]) -> Result<Record, RecordError> {
    if bytes.len() < RECORD_PREFIX_LEN {
        return Err(RecordError::Truncated { field: RecordField::Header });
    }

    let mut r = FieldReader::new(bytes);

    // --- Prefix ---
    let mut magic = [0u8; 4];
    magic.copy_from_slice(r.take(4, RecordField::Header)?);
    if magic != MAGIC_RECORD {
        return Err(RecordError::InvalidMagic { have: magic });
    }

    let version = r.take(1, RecordField::Header)?[0];
    if version != RECORD_VERSION {
        return Err(RecordError::UnsupportedVersion { have: version });
    }

    let dtype = SampleType::verify(r.take(1, RecordField::Header)?[0])?;

    let mut reserved = [0u8; 2];
    reserved.copy_from_slice(r.take(2, RecordField::Header)?);
    if reserved != [0u8; 2] {
        return Err(RecordError::ReservedBytesNonZero { reserved });
    }

    let height = r.u32(RecordField::Header)?;
    let width = r.u32(RecordField::Header)?;
    let channels = r.u32(RecordField::Header)?;
    let shape = PixelShape::new(height, width, channels);

    // --- Metadata ---
    let origin = r.text(RecordField::Origin)?;
    let captured_at = r.text(RecordField::CapturedAt)?;
    let tag = r.text(RecordField::Tag)?;
    let source_extension = r.text(RecordField::SourceExtension)?;

    // --- Pixels ---
    let data = r.field(RecordField::Pixels)?;

    if r.remaining() != 0 {
        return Err(RecordError::TrailingBytes { extra: r.remaining() });
    }

    let pixels = PixelBuffer::new(shape, dtype, data.to_vec())?;

    Ok(Record { pixels, origin, captured_at, tag, source_extension })
}
