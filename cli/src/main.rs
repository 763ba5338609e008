//! imgseal
//! Pack tagged images into one AES-CBC encrypted archive, list it, extract it.

#![forbid(unsafe_code)]

mod args;
mod commands;
mod key;
mod logging;
mod transcode;

use anyhow::Result;
use clap::Parser;

use crate::args::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    match cli.command {
        Commands::Pack { output, key, images, naming, report } => {
            commands::pack(&output, key, &images, naming, report)?
        }
        Commands::Unpack { input, key, output_dir, report } => {
            commands::unpack(&input, key, &output_dir, report)?
        }
        Commands::List { input, key } => commands::list(&input, key)?,
    }

    Ok(())
}
