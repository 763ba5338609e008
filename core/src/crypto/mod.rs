
pub mod types;
pub mod iv;
pub mod envelope;

pub use types::*;
pub use iv::*;
pub use envelope::*;
