//! transcoder.rs
//! Seam between the archive codec and whatever decodes/encodes image files.
//!
//! The core never parses image formats itself. Implementations map their
//! native pixel layout onto `PixelBuffer` (shape + sample type + little-endian
//! samples) and back.

use std::path::Path;

use crate::record::PixelBuffer;
use crate::types::SealError;

pub trait ImageTranscoder {
    /// Decode the image at `path`.
    /// Fails with `SealError::UnreadableImage`.
    fn load(&self, path: &Path) -> Result<PixelBuffer, SealError>;

    /// Encode `pixels` to `path`; the extension of `path` selects the format.
    /// Fails with `SealError::UnwritableImage`.
    fn save(&self, pixels: &PixelBuffer, path: &Path) -> Result<(), SealError>;
}

impl<T: ImageTranscoder + ?Sized> ImageTranscoder for &T {
    fn load(&self, path: &Path) -> Result<PixelBuffer, SealError> {
        (**self).load(path)
    }

    fn save(&self, pixels: &PixelBuffer, path: &Path) -> Result<(), SealError> {
        (**self).save(pixels, path)
    }
}

/// Extension of `path` with its leading dot (`".png"`), or `""` if none.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
