//! telemetry/counters.rs
//! Mutable counters used during pack and unpack.
//!
//! Summary: collects record counts and byte counts, converted into an
//! immutable `PackReport` at the end of an operation.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackCounters {
    pub records_packed: u64,
    pub records_unpacked: u64,
    pub records_skipped: u64,
    pub images_written: u64,
    pub bytes_pixels: u64,
    pub bytes_container: u64,
    pub bytes_envelope: u64,
}

impl PackCounters {
    /// Record one image turned into an archive member.
    pub fn add_packed(&mut self, pixel_len: usize) {
        self.records_packed += 1;
        self.bytes_pixels += pixel_len as u64;
    }

    /// Record one member decoded from an archive.
    pub fn add_unpacked(&mut self, pixel_len: usize) {
        self.records_unpacked += 1;
        self.bytes_pixels += pixel_len as u64;
    }

    /// Record an input image that could not be read.
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Record an extracted image written to disk.
    pub fn add_written(&mut self) {
        self.images_written += 1;
    }

    /// Record the container and envelope sizes for this operation.
    pub fn set_sizes(&mut self, container_len: usize, envelope_len: usize) {
        self.bytes_container = container_len as u64;
        self.bytes_envelope = envelope_len as u64;
    }

    /// Bytes added by record/container framing and the cipher, over raw pixels.
    pub fn overhead_bytes(&self) -> u64 {
        self.bytes_envelope.saturating_sub(self.bytes_pixels)
    }

    pub fn merge(&mut self, other: &PackCounters) {
        self.records_packed += other.records_packed;
        self.records_unpacked += other.records_unpacked;
        self.records_skipped += other.records_skipped;
        self.images_written += other.images_written;

        self.bytes_pixels += other.bytes_pixels;
        self.bytes_container += other.bytes_container;
        self.bytes_envelope += other.bytes_envelope;
    }
}

impl AddAssign for PackCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
