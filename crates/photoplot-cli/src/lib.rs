//! CLI logic for the photoplot tool.
//!
//! This module reads a TOML job, builds each layer it describes and writes
//! one photoplot file per layer into the output directory.

pub mod error_adapter;
pub mod job;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use photoplot::{PhotoplotError, layer};

use job::Job;

/// Run the photoplot CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PhotoplotError` for:
/// - File I/O errors
/// - Configuration and job loading errors
/// - Usage errors raised while building or rendering a layer
pub fn run(args: &Args) -> Result<(), PhotoplotError> {
    info!(
        input_path = args.input,
        output_dir = args.output;
        "Processing job"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Read and build the job
    let source = fs::read_to_string(&args.input)?;
    let job = Job::parse(&source)?;
    let layers = job.build(&app_config, args.creation_date.as_deref())?;

    // Every layer renders before the first file is written
    let output_dir = Path::new(&args.output);
    let rendered = layers
        .iter()
        .map(|(file, layer)| Ok((output_dir.join(file), layer.render()?)))
        .collect::<Result<Vec<_>, PhotoplotError>>()?;

    fs::create_dir_all(output_dir)?;
    for (path, text) in rendered {
        layer::persist(&path, &text)?;
    }

    info!(layers = job.len(); "Job completed");
    Ok(())
}
