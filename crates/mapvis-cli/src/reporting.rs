//! Reporting sink.
//!
//! Collects job outcomes in enumeration order, applies the reference
//! generation and overwrite policies, prints progress and produces the run
//! summary.

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use mapvis_spec::{BackendKind, Outcome};
use serde::{Deserialize, Serialize};

use crate::compare::file_digest;
use crate::config::RunConfig;
use crate::dispatch::JobRecord;

/// What the sink did to a reference artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceAction {
    /// A missing reference was captured from the actual artifact.
    Generated,
    /// A failing reference was replaced by the actual artifact.
    Overwritten,
}

/// One recorded outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub fixture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// BLAKE3 digest of the actual artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ReferenceAction>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
    /// Missing references captured as new baselines.
    pub generated: usize,
    /// Missing references with generation disabled.
    pub missing: usize,
    pub load_errors: usize,
    pub render_errors: usize,
    /// Failing references replaced (also counted in `failed`).
    pub overwritten: usize,
}

impl Counts {
    /// Whether nothing failed or errored.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.missing == 0 && self.load_errors == 0 && self.render_errors == 0
    }
}

/// Machine-readable report written to `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub runtime_seconds: f64,
    pub total: usize,
    pub success: bool,
    pub counts: Counts,
    pub entries: Vec<SummaryEntry>,
}

impl RunSummary {
    /// 0 for a clean run, 1 otherwise.
    pub fn exit_code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }
    }

    /// Writes the summary as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize summary")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        Ok(())
    }
}

/// Accumulates outcomes for one run.
pub struct Reporting {
    print_jobs: bool,
    overwrite: bool,
    generate: bool,
    counts: Counts,
    entries: Vec<SummaryEntry>,
    start: Instant,
}

impl Reporting {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            print_jobs: config.prints_jobs(),
            overwrite: config.overwrite,
            generate: config.generate,
            counts: Counts::default(),
            entries: Vec::new(),
            start: Instant::now(),
        }
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    /// Routes a finished job to the matching `record_*` method.
    pub fn record(&mut self, record: JobRecord) {
        match record.outcome {
            Outcome::Pass { .. } => self.record_pass(record),
            Outcome::Fail { .. } => self.record_fail(record),
            Outcome::ReferenceMissing => self.record_not_found(record),
            Outcome::LoadError { .. } => self.record_job_load_error(record),
            Outcome::RenderError { .. } => self.record_other_error(record),
        }
    }

    pub fn record_pass(&mut self, record: JobRecord) {
        self.counts.passed += 1;
        if self.print_jobs {
            println!(
                "  {} {} {}",
                "PASS ".green(),
                record.job.artifact_stem(),
                timing(&record.outcome).dimmed()
            );
        }
        self.push(record, None);
    }

    /// Counts a failure; with overwrite on, the reference is replaced.
    pub fn record_fail(&mut self, record: JobRecord) {
        self.counts.failed += 1;
        let mut action = None;
        if self.overwrite {
            match copy_to_reference(&record.actual, &record.reference) {
                Ok(()) => {
                    self.counts.overwritten += 1;
                    action = Some(ReferenceAction::Overwritten);
                }
                Err(e) => log::warn!("could not overwrite reference: {:#}", e),
            }
        }
        if self.print_jobs {
            let note = if action.is_some() { " (reference overwritten)" } else { "" };
            println!(
                "  {} {} diff {} {}{}",
                "FAIL ".red().bold(),
                record.job.artifact_stem(),
                record.outcome.diff().unwrap_or_default(),
                timing(&record.outcome).dimmed(),
                note.yellow()
            );
        }
        self.push(record, action);
    }

    /// Captures a new baseline, or counts a failure when generation is off.
    pub fn record_not_found(&mut self, record: JobRecord) {
        if !self.generate {
            self.counts.missing += 1;
            if self.print_jobs {
                println!(
                    "  {} {} no reference at {}",
                    "MISS ".red().bold(),
                    record.job.artifact_stem(),
                    record.reference.display()
                );
            }
            self.push(record, None);
            return;
        }

        match copy_to_reference(&record.actual, &record.reference) {
            Ok(()) => {
                self.counts.generated += 1;
                if self.print_jobs {
                    println!(
                        "  {} {} -> {}",
                        "NEW  ".yellow().bold(),
                        record.job.artifact_stem(),
                        record.reference.display()
                    );
                }
                self.push(record, Some(ReferenceAction::Generated));
            }
            Err(e) => {
                let record = JobRecord {
                    outcome: Outcome::RenderError {
                        message: format!("{:#}", e),
                    },
                    ..record
                };
                self.record_other_error(record);
            }
        }
    }

    /// Counts a fixture whose style could not be loaded.
    pub fn record_load_error(&mut self, fixture: &str, message: &str) {
        self.counts.load_errors += 1;
        if self.print_jobs {
            println!("  {} {}: {}", "LOAD ".red().bold(), fixture, message);
        }
        self.entries.push(SummaryEntry {
            fixture: fixture.to_string(),
            artifact: None,
            backend: None,
            actual: None,
            reference: None,
            digest: None,
            action: None,
            outcome: Outcome::LoadError {
                message: message.to_string(),
            },
        });
    }

    fn record_job_load_error(&mut self, record: JobRecord) {
        self.counts.load_errors += 1;
        if self.print_jobs {
            if let Outcome::LoadError { message } = &record.outcome {
                println!("  {} {}: {}", "LOAD ".red().bold(), record.job.fixture, message);
            }
        }
        self.push(record, None);
    }

    /// Counts a job that failed to render or compare.
    pub fn record_other_error(&mut self, record: JobRecord) {
        self.counts.render_errors += 1;
        if self.print_jobs {
            let message = match &record.outcome {
                Outcome::RenderError { message } => message.as_str(),
                _ => "",
            };
            println!(
                "  {} {}: {}",
                "ERROR".red().bold(),
                record.job.artifact_stem(),
                message
            );
        }
        self.push(record, None);
    }

    fn push(&mut self, record: JobRecord, action: Option<ReferenceAction>) {
        let rendered = !matches!(
            record.outcome,
            Outcome::LoadError { .. } | Outcome::RenderError { .. }
        );
        let digest = if rendered && record.actual.exists() {
            file_digest(&record.actual).ok()
        } else {
            None
        };
        self.entries.push(SummaryEntry {
            fixture: record.job.fixture.clone(),
            artifact: Some(record.job.artifact_file_name()),
            backend: Some(record.job.backend),
            actual: Some(record.actual.display().to_string()),
            reference: Some(record.reference.display().to_string()),
            digest,
            action,
            outcome: record.outcome,
        });
    }

    /// Snapshot of the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            timestamp: chrono::Utc::now().to_rfc3339(),
            runtime_seconds: self.start.elapsed().as_secs_f64(),
            total: self.entries.len(),
            success: self.counts.is_clean(),
            counts: self.counts.clone(),
            entries: self.entries.clone(),
        }
    }
}

fn timing(outcome: &Outcome) -> String {
    outcome
        .elapsed()
        .map(|d| format!("({:.1}ms)", d.as_secs_f64() * 1000.0))
        .unwrap_or_default()
}

fn copy_to_reference(actual: &Path, reference: &Path) -> Result<()> {
    if let Some(parent) = reference.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(actual, reference).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            actual.display(),
            reference.display()
        )
    })?;
    Ok(())
}

/// One line per entry that made the run fail.
pub fn failure_lines(summary: &RunSummary) -> Vec<String> {
    summary
        .entries
        .iter()
        .filter_map(|entry| {
            let name = entry.artifact.as_deref().unwrap_or(&entry.fixture);
            match &entry.outcome {
                Outcome::Fail { diff, .. } => Some(format!("{}: diff {}", name, diff)),
                Outcome::LoadError { message } | Outcome::RenderError { message } => {
                    Some(format!("{}: {}", name, message))
                }
                Outcome::ReferenceMissing if entry.action.is_none() => {
                    let reference = entry.reference.as_deref().unwrap_or_default();
                    Some(format!("{}: no reference at {}", name, reference))
                }
                _ => None,
            }
        })
        .collect()
}

/// Prints the coloured end-of-run summary.
pub fn print_summary(summary: &RunSummary) {
    let counts = &summary.counts;
    println!();
    println!("{}", "======================================".cyan());
    println!("{}", "  Visual Test Summary".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!("{} {}", "Total:".blue().bold(), summary.total);
    println!("{} {}", "Passed:".green().bold(), counts.passed);
    println!("{} {}", "Failed:".red().bold(), counts.failed);
    if counts.overwritten > 0 {
        println!("{} {}", "  overwritten:".yellow(), counts.overwritten);
    }
    println!("{} {}", "Generated:".yellow().bold(), counts.generated);
    if counts.missing > 0 {
        println!("{} {}", "Missing:".red().bold(), counts.missing);
    }
    println!("{} {}", "Load errors:".red().bold(), counts.load_errors);
    println!("{} {}", "Render errors:".red().bold(), counts.render_errors);
    println!("{} {:.2}s", "Total runtime:".blue().bold(), summary.runtime_seconds);
    println!();

    let failures = failure_lines(summary);
    if !failures.is_empty() {
        println!("{}", "Failures:".red().bold());
        for line in failures {
            println!("  - {}", line);
        }
        println!();
    }

    if summary.success {
        println!("{}", "All visual tests passed".green().bold());
    } else {
        println!("{}", "Visual tests failed".red().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapvis_spec::{OutcomeKind, RenderJob};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(dir: &Path) -> RunConfig {
        RunConfig {
            reference_dir: dir.join("refs"),
            output_dir: dir.join("out"),
            quiet: true,
            ..Default::default()
        }
    }

    fn record(config: &RunConfig, outcome: Outcome) -> JobRecord {
        let job = RenderJob {
            fixture: "simple".to_string(),
            width: 10,
            height: 10,
            scale: 1.0,
            backend: BackendKind::Raster,
        };
        let actual = config.actual_path(&job);
        fs::create_dir_all(actual.parent().unwrap()).unwrap();
        fs::write(&actual, b"actual").unwrap();
        JobRecord {
            reference: config.reference_path(&job),
            actual,
            job,
            outcome,
        }
    }

    fn fail(diff: u64) -> Outcome {
        Outcome::Fail {
            diff,
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_generate_missing_reference() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut reporting = Reporting::new(&config);

        let rec = record(&config, Outcome::ReferenceMissing);
        let reference = rec.reference.clone();
        reporting.record(rec);

        assert_eq!(fs::read(&reference).unwrap(), b"actual");
        assert_eq!(reporting.counts().generated, 1);
        assert!(reporting.summary().success);
        assert_eq!(reporting.entries()[0].action, Some(ReferenceAction::Generated));
    }

    #[test]
    fn test_missing_reference_without_generate() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            generate: false,
            ..config(dir.path())
        };
        let mut reporting = Reporting::new(&config);

        let rec = record(&config, Outcome::ReferenceMissing);
        let reference = rec.reference.clone();
        reporting.record(rec);

        assert!(!reference.exists());
        assert_eq!(reporting.counts().missing, 1);
        assert!(!reporting.summary().success);
    }

    #[test]
    fn test_overwrite_still_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            overwrite: true,
            ..config(dir.path())
        };
        let mut reporting = Reporting::new(&config);

        let rec = record(&config, fail(12));
        fs::create_dir_all(rec.reference.parent().unwrap()).unwrap();
        fs::write(&rec.reference, b"old").unwrap();
        let reference = rec.reference.clone();
        reporting.record(rec);

        assert_eq!(fs::read(&reference).unwrap(), b"actual");
        assert_eq!(reporting.counts().failed, 1);
        assert_eq!(reporting.counts().overwritten, 1);
        assert!(!reporting.summary().success);
    }

    #[test]
    fn test_fail_without_overwrite_keeps_reference() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut reporting = Reporting::new(&config);

        let rec = record(&config, fail(3));
        fs::create_dir_all(rec.reference.parent().unwrap()).unwrap();
        fs::write(&rec.reference, b"old").unwrap();
        let reference = rec.reference.clone();
        reporting.record(rec);

        assert_eq!(fs::read(&reference).unwrap(), b"old");
        assert_eq!(reporting.entries()[0].action, None);
    }

    #[test]
    fn test_load_and_render_errors_fail_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let mut reporting = Reporting::new(&config);
        reporting.record_load_error("broken", "no such file");
        assert!(!reporting.summary().success);

        let mut reporting = Reporting::new(&config);
        reporting.record(record(
            &config,
            Outcome::RenderError {
                message: "boom".to_string(),
            },
        ));
        assert_eq!(reporting.counts().render_errors, 1);
        assert!(!reporting.summary().success);
    }

    #[test]
    fn test_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut reporting = Reporting::new(&config);
        reporting.record(record(
            &config,
            Outcome::Pass {
                diff: 0,
                elapsed: Duration::from_millis(2),
            },
        ));
        reporting.record_load_error("broken", "no such file");

        let summary = reporting.summary();
        let path: PathBuf = config.summary_path();
        summary.write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["success"], false);
        assert_eq!(value["counts"]["passed"], 1);
        assert_eq!(value["entries"][0]["status"], "pass");
        assert_eq!(value["entries"][0]["artifact"], "simple-10-10-1.0-raster.png");
        assert_eq!(
            value["entries"][0]["digest"],
            blake3::hash(b"actual").to_hex().to_string()
        );
        assert_eq!(value["entries"][1]["status"], "load_error");
        assert_eq!(value["entries"][1]["fixture"], "broken");

        let parsed: RunSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.entries[1].outcome.kind(), OutcomeKind::LoadError);
    }

    #[test]
    fn test_render_error_has_no_digest() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut reporting = Reporting::new(&config);

        reporting.record(record(
            &config,
            Outcome::RenderError {
                message: "boom".to_string(),
            },
        ));

        assert_eq!(reporting.entries()[0].digest, None);
    }

    #[test]
    fn test_routed_load_error_counts_as_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut reporting = Reporting::new(&config);

        reporting.record(record(
            &config,
            Outcome::LoadError {
                message: "bad style".to_string(),
            },
        ));

        assert_eq!(reporting.counts().load_errors, 1);
        assert_eq!(reporting.counts().render_errors, 0);
        assert_eq!(reporting.entries()[0].fixture, "simple");
    }

    #[test]
    fn test_failure_lines_list_missing_references() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            generate: false,
            ..config(dir.path())
        };
        let mut reporting = Reporting::new(&config);
        reporting.record(record(&config, Outcome::ReferenceMissing));
        reporting.record(record(&config, fail(7)));

        let lines = failure_lines(&reporting.summary());

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("simple-10-10-1.0-raster.png: no reference at"));
        assert_eq!(lines[1], "simple-10-10-1.0-raster.png: diff 7");
    }

    #[test]
    fn test_failure_lines_skip_generated() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut reporting = Reporting::new(&config);
        reporting.record(record(&config, Outcome::ReferenceMissing));

        assert!(failure_lines(&reporting.summary()).is_empty());
    }
}
