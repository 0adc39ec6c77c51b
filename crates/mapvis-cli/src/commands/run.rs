//! Run command implementation
//!
//! Renders every job of the selected fixtures, compares each artifact with
//! its reference and reports the results.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use mapvis_engine::{Map, SketchMap};

use super::resolve_fixtures;
use crate::config::RunConfig;
use crate::reporting::{print_summary, Reporting};
use crate::runner::run_fixtures;

/// Surface size a fresh map starts with before the first resize.
const INITIAL_MAP_SIZE: u32 = 256;

/// Run the visual tests
///
/// # Arguments
/// * `names` - Fixture names; empty selects the whole catalog
/// * `catalog` - Optional catalog file replacing the built-in catalog
/// * `config` - Directories and reporting policies
///
/// # Returns
/// Exit code: 0 when every job passed, 1 otherwise
pub fn run(names: &[String], catalog: Option<&Path>, mut config: RunConfig) -> Result<ExitCode> {
    let (fixtures, thresholds) = resolve_fixtures(names, catalog)?;
    config.thresholds = thresholds;

    if !config.json {
        println!("{}", "======================================".cyan());
        println!("{}", "  mapvis Visual Tests".cyan());
        println!("{}", "======================================".cyan());
        println!();
        println!("{} {}", "Styles:".blue().bold(), config.styles_dir.display());
        println!("{} {}", "References:".blue().bold(), config.reference_dir.display());
        println!("{} {}", "Output:".blue().bold(), config.output_dir.display());
        println!("{} {}", "Fixtures:".blue().bold(), fixtures.len());
        println!();
    }

    let mut reporting = Reporting::new(&config);
    run_fixtures(
        &fixtures,
        &config,
        || Box::new(SketchMap::new(INITIAL_MAP_SIZE, INITIAL_MAP_SIZE)) as Box<dyn Map>,
        &mut reporting,
    )?;

    let summary = reporting.summary();
    summary.write(&config.summary_path())?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        println!(
            "{} {}",
            "Summary written to".dimmed(),
            config.summary_path().display()
        );
    }

    Ok(summary.exit_code())
}
