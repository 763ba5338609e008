//! archive/mod.rs
//! Order-preserving container of named record blobs.
//!
//! Notes:
//! - Member names are derived from `(origin, file name)`; collisions follow an
//!   explicit `NamingPolicy` instead of silently overwriting.
//! - Unpacking is all-or-nothing.

pub mod types;
pub mod naming;
pub mod encode;
pub mod decode;

pub use types::*;
pub use naming::*;
pub use encode::*;
pub use decode::*;
