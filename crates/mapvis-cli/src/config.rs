//! Run configuration.

use std::path::PathBuf;

use mapvis_spec::{RenderJob, Thresholds};

/// Default location of fixture style files.
pub const DEFAULT_STYLES_DIR: &str = "visual_tests/styles";
/// Default root of the `images/` and `grids/` reference folders.
pub const DEFAULT_REFERENCE_DIR: &str = "visual_tests";
/// Default scratch directory for rendered artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/mapvis-visual-images";
/// Sub-directory of the output dir receiving saved styles.
pub const STYLES_OUT_DIR: &str = "styles-out";

/// Settings for one run. Built once from the command line and never mutated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub styles_dir: PathBuf,
    pub reference_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Suppress per-job lines.
    pub quiet: bool,
    /// Replace the reference of a failing job with its actual artifact.
    pub overwrite: bool,
    /// Capture a missing reference from the actual artifact.
    pub generate: bool,
    /// Print the summary as JSON instead of coloured text.
    pub json: bool,
    pub thresholds: Thresholds,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            styles_dir: PathBuf::from(DEFAULT_STYLES_DIR),
            reference_dir: PathBuf::from(DEFAULT_REFERENCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            quiet: false,
            overwrite: false,
            generate: true,
            json: false,
            thresholds: Thresholds::default(),
        }
    }
}

impl RunConfig {
    /// Where a job writes its actual artifact.
    pub fn actual_path(&self, job: &RenderJob) -> PathBuf {
        self.output_dir.join(job.artifact_file_name())
    }

    /// Where a job's reference artifact lives.
    pub fn reference_path(&self, job: &RenderJob) -> PathBuf {
        self.reference_dir
            .join(job.backend.category().reference_dir())
            .join(job.artifact_file_name())
    }

    /// Where a fixture's loaded style is written back to.
    pub fn style_out_path(&self, fixture: &str) -> PathBuf {
        self.styles_out_dir().join(format!("{}-out.json", fixture))
    }

    pub fn styles_out_dir(&self) -> PathBuf {
        self.output_dir.join(STYLES_OUT_DIR)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join("summary.json")
    }

    /// Per-job lines are printed only in coloured, non-quiet mode.
    pub fn prints_jobs(&self) -> bool {
        !self.quiet && !self.json
    }
}
