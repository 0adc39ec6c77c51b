//! CLI argument definitions for the mapvis command-line interface.

use std::path::PathBuf;

use clap::Parser;
use mapvis_cli::config::{
    RunConfig, DEFAULT_OUTPUT_DIR, DEFAULT_REFERENCE_DIR, DEFAULT_STYLES_DIR,
};

/// mapvis - visual regression tests for map styles
#[derive(Parser)]
#[command(name = "mapvis")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Fixture names to run (default: the whole catalog)
    pub names: Vec<String>,

    /// Only print the summary, not one line per job
    #[arg(short, long)]
    pub quiet: bool,

    /// Replace the reference of every failing job with its actual output
    #[arg(long)]
    pub overwrite: bool,

    /// Treat missing references as failures instead of generating them
    #[arg(long)]
    pub no_generate: bool,

    /// Directory containing `<fixture>.json` style files
    #[arg(long, default_value = DEFAULT_STYLES_DIR)]
    pub styles_dir: PathBuf,

    /// Directory containing the `images/` and `grids/` reference folders
    #[arg(long, default_value = DEFAULT_REFERENCE_DIR)]
    pub reference_dir: PathBuf,

    /// Scratch directory for rendered artifacts and the run summary
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Catalog file with defaults, thresholds and fixtures (JSON)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print the expanded job matrix and exit
    #[arg(long)]
    pub list: bool,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Run settings from the parsed flags. Thresholds come from the catalog.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            styles_dir: self.styles_dir.clone(),
            reference_dir: self.reference_dir.clone(),
            output_dir: self.output_dir.clone(),
            quiet: self.quiet,
            overwrite: self.overwrite,
            generate: !self.no_generate,
            json: self.json,
            ..Default::default()
        }
    }
}
