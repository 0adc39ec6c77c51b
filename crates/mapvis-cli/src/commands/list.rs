//! List command implementation
//!
//! Prints the expanded job matrix without rendering anything.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use mapvis_spec::{expand_jobs, RenderJob};

use super::resolve_fixtures;

/// Print every job the selected fixtures expand to
pub fn run(names: &[String], catalog: Option<&Path>, json: bool) -> Result<ExitCode> {
    let (fixtures, _) = resolve_fixtures(names, catalog)?;

    if json {
        let jobs: Vec<RenderJob> = fixtures.iter().flat_map(expand_jobs).collect();
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut total = 0;
    for fixture in &fixtures {
        let jobs = expand_jobs(fixture);
        println!(
            "{} {}",
            fixture.name.cyan().bold(),
            format!("({} jobs)", jobs.len()).dimmed()
        );
        for job in &jobs {
            println!("  {}", job.artifact_file_name());
        }
        total += jobs.len();
    }
    println!();
    println!(
        "{} {} jobs across {} fixtures",
        "Total:".blue().bold(),
        total,
        fixtures.len()
    );

    Ok(ExitCode::SUCCESS)
}
