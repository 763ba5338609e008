//! Command-line argument definitions (clap derive).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imgseal_core::archive::NamingPolicy;
use imgseal_core::pipeline::ImageInput;

/// Environment variable consulted when `--key` is omitted.
pub const KEY_ENV_VAR: &str = "IMGSEAL_KEY";

#[derive(Debug, Parser)]
#[command(name = "imgseal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Pack tagged images into one encrypted archive and extract them again")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read images, tag them, and write one encrypted archive
    Pack {
        /// Archive file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Key: raw text, or `hex:` followed by 32/48/64 hex digits
        #[arg(short, long, env = KEY_ENV_VAR, hide_env_values = true)]
        key: String,

        /// An image and its labels; repeat for more images
        #[arg(long = "image", num_args = 3, value_names = ["PATH", "ORIGIN", "TAG"])]
        images: Vec<String>,

        /// What to do when two images map to the same member name
        #[arg(long, default_value = "reject")]
        naming: NamingPolicy,

        /// Print a JSON report after packing
        #[arg(long)]
        report: bool,
    },
    /// Decrypt an archive and write every image into a directory
    Unpack {
        /// Archive file to read
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, env = KEY_ENV_VAR, hide_env_values = true)]
        key: String,

        /// Directory to write images into (created if missing)
        #[arg(short = 'd', long)]
        output_dir: PathBuf,

        /// Print a JSON report after extracting
        #[arg(long)]
        report: bool,
    },
    /// Decrypt an archive and print member metadata without writing images
    List {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, env = KEY_ENV_VAR, hide_env_values = true)]
        key: String,
    },
}

/// Group flat `--image PATH ORIGIN TAG` values into inputs.
pub fn image_inputs(values: &[String]) -> Vec<ImageInput> {
    values
        .chunks_exact(3)
        .map(|v| ImageInput::new(&v[0], v[1].as_str(), v[2].as_str()))
        .collect()
}
