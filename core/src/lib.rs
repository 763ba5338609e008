//! imgseal-core
//!
//! Tagged image records, an order-preserving archive container, and an
//! AES-CBC envelope around it. No image decoding, no CLI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod types;

// Codec layers, leaves first
pub mod record;
pub mod archive;
pub mod crypto;

pub mod telemetry;
pub mod transcoder;

// Stable API
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::archive::{pack, unpack, unpack_members, ArchiveEntry, ArchiveMember, NamingPolicy};
    pub use crate::config::PackConfig;
    pub use crate::crypto::{decrypt, encrypt, EnvelopeKey};
    pub use crate::pipeline::{extract_to_dir, open_envelope, seal_images, ExtractOutcome, ImageInput, SealOutcome};
    pub use crate::record::{deserialize, serialize, PixelBuffer, PixelShape, Record, SampleType};
    pub use crate::telemetry::PackReport;
    pub use crate::transcoder::ImageTranscoder;
    pub use crate::types::SealError;
}
