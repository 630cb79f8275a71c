#![warn(missing_docs)]
//! Generates PNG images of a given size, where every colour channel is
//! either a fixed value or a uniformly random byte per pixel.
//!
//! The pipeline is
//! [`cli::resolve`] -> [`config::GenerationConfig`] -> [`raster::generate`]
//! -> [`output::encode_and_write`].

pub mod cli;
pub mod config;
pub mod output;
mod progress;
pub mod raster;
pub mod text;

pub use cli::{resolve, CliError, Resolution};
pub use config::{ChannelPolicy, GenerationConfig, SizeLimit};
pub use output::{encode_and_write, OutputError};
pub use raster::{generate, generate_with_rng, GenerationError, Raster};

/// Any error the program can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid command line. See [`CliError`]
    #[error(transparent)]
    Cli(#[from] CliError),
    /// The raster could not be generated. See [`GenerationError`]
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// The png could not be encoded or written. See [`OutputError`]
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Generate the image described by `config` and write it to
/// `config.output_path`.
///
/// # Errors
///
/// Will return `Err` if the raster cannot be generated, or the png cannot be
/// encoded or written. No file is created in the first case.
pub fn run(config: &GenerationConfig) -> Result<(), Error> {
    let raster = raster::generate(config)?;
    progress::report(config.verbose, "Writing png file...");
    output::encode_and_write(raster, &config.output_path)?;
    Ok(())
}
