//! config.rs
//! Pack-time options.

use chrono::{SecondsFormat, Utc};

use crate::archive::NamingPolicy;

#[derive(Debug, Clone, Default)]
pub struct PackConfig {
    /// Collision handling for member names.
    /// - default → `NamingPolicy::Reject`.
    pub naming: NamingPolicy,

    /// Fixed `captured_at` stamp for every record.
    /// - `None` → current UTC time at pack (production default).
    /// - `Some(_)` → reproducible archives for tests and fixtures.
    pub captured_at: Option<String>,
}

impl PackConfig {
    pub fn new(naming: Option<NamingPolicy>, captured_at: Option<String>) -> Self {
        Self {
            naming: naming.unwrap_or_default(),
            captured_at,
        }
    }

    pub fn disambiguating() -> Self {
        Self { naming: NamingPolicy::Disambiguate, ..Self::default() }
    }

    /// Timestamp to store in the next record (RFC 3339, UTC, millisecond precision).
    pub fn timestamp(&self) -> String {
        match &self.captured_at {
            Some(fixed) => fixed.clone(),
            None => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
