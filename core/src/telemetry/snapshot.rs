//! telemetry/snapshot.rs
//!
//! Immutable report produced at the end of a pack or unpack.
//!
//! Design notes:
//! - Stage times are flattened to milliseconds keyed by stage name, so the
//!   JSON form stays stable and readable.
//! - Skipped inputs carry the error text, never key material.

use std::collections::BTreeMap;
use std::time::Duration;
use serde::Serialize;

use crate::telemetry::counters::PackCounters;
use crate::telemetry::timers::StageTimer;

/// An input left out of the archive and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInput {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackReport {
    pub counters: PackCounters,
    /// Member names in archive order.
    pub members: Vec<String>,
    pub skipped: Vec<SkippedInput>,
    pub elapsed_ms: f64,
    pub stage_ms: BTreeMap<String, f64>,
}

impl PackReport {
    pub fn from_parts(
        counters: PackCounters,
        members: Vec<String>,
        skipped: Vec<SkippedInput>,
        timer: &StageTimer,
    ) -> Self {
        let stage_ms = timer
            .stage_times
            .iter()
            .map(|(stage, _)| (stage.to_string(), timer.stage_times.get_ms(stage)))
            .collect();

        Self {
            counters,
            members,
            skipped,
            elapsed_ms: timer.elapsed().as_secs_f64() * 1_000.0,
            stage_ms,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_ms / 1_000.0)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
