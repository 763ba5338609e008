//! telemetry/timers.rs
//! Stage timers for the pack/unpack pipeline.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Load,
    Pack,
    Encrypt,
    Decrypt,
    Unpack,
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load    => "load",
            Stage::Pack    => "pack",
            Stage::Encrypt => "encrypt",
            Stage::Decrypt => "decrypt",
            Stage::Unpack  => "unpack",
            Stage::Save    => "save",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageTimes {
    times: HashMap<Stage, Duration>,
}

impl StageTimes {
    /// Add duration to a stage (accumulates if already present).
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_insert(Duration::ZERO) += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or(Duration::ZERO)
    }

    pub fn get_ms(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1_000.0
    }

    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, Duration)> + '_ {
        self.times.iter().map(|(s, d)| (*s, *d))
    }
}

/// Wall clock for one operation plus per-stage accumulation.
#[derive(Debug, Clone)]
pub struct StageTimer {
    start: Instant,
    pub stage_times: StageTimes,
}

impl StageTimer {
    pub fn new() -> Self {
        Self { start: Instant::now(), stage_times: StageTimes::default() }
    }

    /// Run `f`, charging its duration to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let t0 = Instant::now();
        let out = f();
        self.stage_times.add(stage, t0.elapsed());
        out
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for StageTimer {
    fn default() -> Self {
        Self::new()
    }
}
