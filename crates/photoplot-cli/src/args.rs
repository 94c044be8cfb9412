//! Command-line argument definitions for the photoplot CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the job file, the output directory,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the photoplot tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML job describing the layers
    #[arg(help = "Path to the job file")]
    pub input: String,

    /// Directory that receives one file per layer
    #[arg(short, long, default_value = ".")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Fixed `.CreationDate` value, for reproducible output
    #[arg(long)]
    pub creation_date: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
