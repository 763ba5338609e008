// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use imgseal_core::record::{PixelBuffer, PixelShape, Record, SampleType};
use imgseal_core::transcoder::ImageTranscoder;
use imgseal_core::types::SealError;

pub const KEY_128: [u8; 16] = [0x11; 16];
pub const KEY_192: [u8; 24] = [0x22; 24];
pub const KEY_256: [u8; 32] = [0x33; 32];

pub const FIXED_STAMP: &str = "2024-05-01T12:00:00.000Z";

/// Deterministic u8 RGB buffer, bytes depend on `seed`.
pub fn rgb_pixels(height: u32, width: u32, seed: u8) -> PixelBuffer {
    let shape = PixelShape::new(height, width, 3);
    let len = shape.byte_len(SampleType::U8).unwrap();
    let data = (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect();
    PixelBuffer::new(shape, SampleType::U8, data).unwrap()
}

pub fn sample_record(origin: &str, tag: &str, ext: &str, seed: u8) -> Record {
    Record::new(rgb_pixels(2, 3, seed), origin, FIXED_STAMP, tag, ext)
}

/// Transcoder over an in-memory image table. Saves are captured so tests can
/// compare the exact buffers that reached `save`; each save also drops the raw
/// samples at `path` so directory contents can be checked.
#[derive(Default)]
pub struct MemoryTranscoder {
    sources: HashMap<PathBuf, PixelBuffer>,
    saved: RefCell<Vec<(PathBuf, PixelBuffer)>>,
    fail_saves: bool,
    fail_on: Option<String>,
}

impl MemoryTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>, pixels: PixelBuffer) -> Self {
        self.sources.insert(path.into(), pixels);
        self
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Fail only the save whose file name is `name`.
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.fail_on = Some(name.into());
        self
    }

    pub fn saved(&self) -> Vec<(PathBuf, PixelBuffer)> {
        self.saved.borrow().clone()
    }
}

impl ImageTranscoder for MemoryTranscoder {
    fn load(&self, path: &Path) -> Result<PixelBuffer, SealError> {
        self.sources.get(path).cloned().ok_or_else(|| SealError::UnreadableImage {
            path: path.to_path_buf(),
            reason: "no such image".into(),
        })
    }

    fn save(&self, pixels: &PixelBuffer, path: &Path) -> Result<(), SealError> {
        let targeted = self
            .fail_on
            .as_deref()
            .is_some_and(|name| path.file_name().is_some_and(|f| f == name));
        if self.fail_saves || targeted {
            return Err(SealError::UnwritableImage {
                path: path.to_path_buf(),
                reason: "read-only fixture".into(),
            });
        }
        std::fs::write(path, pixels.data())?;
        self.saved.borrow_mut().push((path.to_path_buf(), pixels.clone()));
        Ok(())
    }
}
