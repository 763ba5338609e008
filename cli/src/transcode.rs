//! `ImageTranscoder` backed by the `image` crate.
//!
//! Layout mapping (`DynamicImage` ⇄ channels, sample type):
//! - Luma8 / LumaA8 / Rgb8 / Rgba8       ⇄ 1..=4, U8
//! - Luma16 / LumaA16 / Rgb16 / Rgba16   ⇄ 1..=4, U16
//! - Rgb32F / Rgba32F                    ⇄ 3..=4, F32
//!
//! Decoded layouts outside the table are converted to Rgba8. Buffers outside
//! the table are refused on save.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use imgseal_core::record::{PixelBuffer, PixelShape, SampleType};
use imgseal_core::transcoder::ImageTranscoder;
use imgseal_core::types::SealError;

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateTranscoder;

impl ImageTranscoder for ImageCrateTranscoder {
    fn load(&self, path: &Path) -> Result<PixelBuffer, SealError> {
        let unreadable = |reason: String| SealError::UnreadableImage { path: path.to_path_buf(), reason };
        let img = image::open(path).map_err(|e| unreadable(e.to_string()))?;
        to_pixel_buffer(img).map_err(unreadable)
    }

    fn save(&self, pixels: &PixelBuffer, path: &Path) -> Result<(), SealError> {
        let unwritable = |reason: String| SealError::UnwritableImage { path: path.to_path_buf(), reason };
        let img = to_dynamic_image(pixels).map_err(unwritable)?;
        img.save(path).map_err(|e| unwritable(e.to_string()))
    }
}

fn to_pixel_buffer(img: DynamicImage) -> Result<PixelBuffer, String> {
    let (height, width) = (img.height(), img.width());

    let (channels, dtype, data) = match img {
        DynamicImage::ImageLuma8(b) => (1, SampleType::U8, b.into_raw()),
        DynamicImage::ImageLumaA8(b) => (2, SampleType::U8, b.into_raw()),
        DynamicImage::ImageRgb8(b) => (3, SampleType::U8, b.into_raw()),
        DynamicImage::ImageRgba8(b) => (4, SampleType::U8, b.into_raw()),
        DynamicImage::ImageLuma16(b) => (1, SampleType::U16, u16_to_le(&b.into_raw())),
        DynamicImage::ImageLumaA16(b) => (2, SampleType::U16, u16_to_le(&b.into_raw())),
        DynamicImage::ImageRgb16(b) => (3, SampleType::U16, u16_to_le(&b.into_raw())),
        DynamicImage::ImageRgba16(b) => (4, SampleType::U16, u16_to_le(&b.into_raw())),
        DynamicImage::ImageRgb32F(b) => (3, SampleType::F32, f32_to_le(&b.into_raw())),
        DynamicImage::ImageRgba32F(b) => (4, SampleType::F32, f32_to_le(&b.into_raw())),
        other => (4, SampleType::U8, other.to_rgba8().into_raw()),
    };

    PixelBuffer::new(PixelShape::new(height, width, channels), dtype, data).map_err(|e| e.to_string())
}

fn to_dynamic_image(pixels: &PixelBuffer) -> Result<DynamicImage, String> {
    let shape = pixels.shape();
    let (w, h) = (shape.width, shape.height);
    let raw = pixels.data();
    let short = || format!("pixel payload too small for {}", shape);

    let img = match (pixels.dtype(), shape.channels) {
        (SampleType::U8, 1) => ImageBuffer::<Luma<u8>, _>::from_raw(w, h, raw.to_vec()).map(DynamicImage::ImageLuma8),
        (SampleType::U8, 2) => ImageBuffer::<LumaA<u8>, _>::from_raw(w, h, raw.to_vec()).map(DynamicImage::ImageLumaA8),
        (SampleType::U8, 3) => ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, raw.to_vec()).map(DynamicImage::ImageRgb8),
        (SampleType::U8, 4) => ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, raw.to_vec()).map(DynamicImage::ImageRgba8),
        (SampleType::U16, 1) => ImageBuffer::<Luma<u16>, _>::from_raw(w, h, le_to_u16(raw)).map(DynamicImage::ImageLuma16),
        (SampleType::U16, 2) => ImageBuffer::<LumaA<u16>, _>::from_raw(w, h, le_to_u16(raw)).map(DynamicImage::ImageLumaA16),
        (SampleType::U16, 3) => ImageBuffer::<Rgb<u16>, _>::from_raw(w, h, le_to_u16(raw)).map(DynamicImage::ImageRgb16),
        (SampleType::U16, 4) => ImageBuffer::<Rgba<u16>, _>::from_raw(w, h, le_to_u16(raw)).map(DynamicImage::ImageRgba16),
        (SampleType::F32, 3) => ImageBuffer::<Rgb<f32>, _>::from_raw(w, h, le_to_f32(raw)).map(DynamicImage::ImageRgb32F),
        (SampleType::F32, 4) => ImageBuffer::<Rgba<f32>, _>::from_raw(w, h, le_to_f32(raw)).map(DynamicImage::ImageRgba32F),
        (dtype, channels) => {
            return Err(format!("no image layout for {} channel(s) of {}", channels, dtype));
        }
    };

    img.ok_or_else(short)
}

fn u16_to_le(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn f32_to_le(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn le_to_u16(raw: &[u8]) -> Vec<u16> {
    raw.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect()
}

fn le_to_f32(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()
}
