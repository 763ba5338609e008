//! record/mod.rs
//! Tagged image record model and its self-describing binary codec.
//!
//! Notes:
//! - Shape, sample type and source extension travel with the pixel data, so a
//!   blob decodes without any external schema.
//! - Little-endian across all multi-byte integers.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
