//! record/types.rs
//! In-memory model of one tagged image.
//!
//! Notes:
//! - Pixel samples are stored row-major, channel-interleaved, little-endian.
//! - `PixelBuffer` can only be built with a payload that matches its shape and
//!   sample type, so every `Record` is serializable.
//! - All five record fields are required. Text fields may be empty.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::sample_ids;

/// Element data type of a pixel buffer.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum SampleType {
    U8  = sample_ids::U8,
    I8  = sample_ids::I8,
    U16 = sample_ids::U16,
    I16 = sample_ids::I16,
    U32 = sample_ids::U32,
    I32 = sample_ids::I32,
    F32 = sample_ids::F32,
    F64 = sample_ids::F64,
}

impl SampleType {
    pub const ALL: [SampleType; 8] = [
        SampleType::U8,
        SampleType::I8,
        SampleType::U16,
        SampleType::I16,
        SampleType::U32,
        SampleType::I32,
        SampleType::F32,
        SampleType::F64,
    ];

    /// Width of one sample in bytes.
    #[inline]
    pub const fn size_bytes(self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    pub fn verify(raw: u8) -> Result<Self, RecordError> {
        SampleType::try_from_primitive(raw).map_err(|_| RecordError::UnknownSampleType { raw })
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "u8",
            SampleType::I8 => "i8",
            SampleType::U16 => "u16",
            SampleType::I16 => "i16",
            SampleType::U32 => "u32",
            SampleType::I32 => "i32",
            SampleType::F32 => "f32",
            SampleType::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Shape of a pixel buffer: (height, width, channels).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelShape {
    pub height: u32,
    pub width: u32,
    pub channels: u32,
}

impl PixelShape {
    pub const fn new(height: u32, width: u32, channels: u32) -> Self {
        Self { height, width, channels }
    }

    /// Total number of samples, `None` on overflow.
    pub fn sample_count(&self) -> Option<usize> {
        (self.height as usize)
            .checked_mul(self.width as usize)?
            .checked_mul(self.channels as usize)
    }

    /// Payload size in bytes for `dtype`, `None` on overflow.
    pub fn byte_len(&self, dtype: SampleType) -> Option<usize> {
        self.sample_count()?.checked_mul(dtype.size_bytes())
    }
}

impl fmt::Display for PixelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.height, self.width, self.channels)
    }
}

/// Rectangular sample buffer with shape and element type.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    shape: PixelShape,
    dtype: SampleType,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Build a buffer, rejecting payloads that disagree with `shape` and `dtype`.
    pub fn new(shape: PixelShape, dtype: SampleType, data: Vec<u8>) -> Result<Self, RecordError> {
        let expected = shape.byte_len(dtype).ok_or(RecordError::ShapeOverflow { shape })?;
        if data.len() != expected {
            return Err(RecordError::PayloadMismatch { expected, actual: data.len() });
        }
        Ok(Self { shape, dtype, data })
    }

    pub fn shape(&self) -> PixelShape {
        self.shape
    }

    pub fn dtype(&self) -> SampleType {
        self.dtype
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

// Pixel payloads can be megabytes; keep Debug output readable.
impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("shape", &self.shape)
            .field("dtype", &self.dtype)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// One tagged image, the unit of serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub pixels: PixelBuffer,
    pub origin: String,
    pub captured_at: String,
    pub tag: String,
    pub source_extension: String,
}

impl Record {
    pub fn new(
        pixels: PixelBuffer,
        origin: impl Into<String>,
        captured_at: impl Into<String>,
        tag: impl Into<String>,
        source_extension: impl Into<String>,
    ) -> Self {
        Self {
            pixels,
            origin: origin.into(),
            captured_at: captured_at.into(),
            tag: tag.into(),
            source_extension: source_extension.into(),
        }
    }

    /// One-line description for logs (no pixel data).
    pub fn summary(&self) -> String {
        format!(
            "origin={:?} tag={:?} captured_at={} ext={:?} shape={} dtype={}",
            self.origin,
            self.tag,
            self.captured_at,
            self.source_extension,
            self.pixels.shape(),
            self.pixels.dtype(),
        )
    }
}

/// Names of the fields on the wire, used in error messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordField {
    Header,
    Origin,
    CapturedAt,
    Tag,
    SourceExtension,
    Pixels,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordField::Header => "header",
            RecordField::Origin => "origin",
            RecordField::CapturedAt => "captured_at",
            RecordField::Tag => "tag",
            RecordField::SourceExtension => "source_extension",
            RecordField::Pixels => "pixels",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Blob ends before `field` is complete.
    Truncated { field: RecordField },

    /// Invalid magic marker (expected "ISR1").
    InvalidMagic { have: [u8; 4] },

    /// Unsupported record version.
    UnsupportedVersion { have: u8 },

    /// Unknown sample type identifier.
    UnknownSampleType { raw: u8 },

    /// Reserved bytes must be zero.
    ReservedBytesNonZero { reserved: [u8; 2] },

    /// Text field is not valid UTF-8.
    InvalidUtf8 { field: RecordField },

    /// Shape product overflows the address space.
    ShapeOverflow { shape: PixelShape },

    /// Pixel payload size disagrees with shape × sample size.
    PayloadMismatch { expected: usize, actual: usize },

    /// Bytes left over after the last field.
    TrailingBytes { extra: usize },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RecordError::*;
        match self {
            Truncated { field } =>
                write!(f, "record truncated in {}", field),
            InvalidMagic { have } =>
                write!(f, "invalid record magic: 0x{}", hex::encode(have)),
            UnsupportedVersion { have } =>
                write!(f, "unsupported record version: {}", have),
            UnknownSampleType { raw } =>
                write!(f, "unknown sample type: 0x{:02x}", raw),
            ReservedBytesNonZero { reserved } =>
                write!(f, "reserved bytes must be zero, got 0x{}", hex::encode(reserved)),
            InvalidUtf8 { field } =>
                write!(f, "{} is not valid UTF-8", field),
            ShapeOverflow { shape } =>
                write!(f, "pixel shape {} overflows", shape),
            PayloadMismatch { expected, actual } =>
                write!(f, "pixel payload mismatch: expected {} bytes, got {}", expected, actual),
            TrailingBytes { extra } =>
                write!(f, "{} trailing bytes after record", extra),
        }
    }
}

impl std::error::Error for RecordError {}
