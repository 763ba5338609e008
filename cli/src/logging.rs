//! Global tracing subscriber for the CLI.
//!
//! `RUST_LOG` wins when set; otherwise `--log-level` applies to every target.
//! Logs go to stderr so stdout stays clean for reports and listings.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {:?}", level))?,
    };

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
