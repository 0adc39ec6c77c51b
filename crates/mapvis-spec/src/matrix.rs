//! Render-job expansion and artifact naming.

use serde::Serialize;

use crate::backend::BackendKind;
use crate::fixture::{FixtureConfig, FixtureDefaults, FixtureOverride, Size};

/// A single render + compare unit of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderJob {
    pub fixture: String,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub backend: BackendKind,
}

impl RenderJob {
    /// `<fixture>-<width>-<height>-<scale>`, shared by every backend of a size/scale pair.
    pub fn postfix(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.fixture,
            self.width,
            self.height,
            format_scale(self.scale)
        )
    }

    /// `<fixture>-<width>-<height>-<scale>-<backend>`.
    pub fn artifact_stem(&self) -> String {
        format!("{}-{}", self.postfix(), self.backend)
    }

    /// Artifact file name, identical for the actual and the reference artifact.
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{}", self.artifact_stem(), self.backend.extension())
    }

    /// Surface size after applying the scale factor.
    pub fn surface_size(&self) -> (u32, u32) {
        Size::new(self.width, self.height).scaled(self.scale)
    }
}

/// Formats a scale factor with at least one decimal place (`1.0`, `2.0`, `1.5`).
pub fn format_scale(scale: f64) -> String {
    if scale.fract() == 0.0 {
        format!("{:.1}", scale)
    } else {
        format!("{}", scale)
    }
}

/// Merges every override onto the defaults, preserving input order.
pub fn build_fixtures(defaults: &FixtureDefaults, overrides: &[FixtureOverride]) -> Vec<FixtureConfig> {
    overrides.iter().map(|o| defaults.merge(o)).collect()
}

/// Jobs for one (size, scale) pair, in backend dispatch order.
///
/// Disabled backends are left out, as is the grid backend at any scale other
/// than 1.0.
pub fn jobs_for_size(fixture: &FixtureConfig, size: Size, scale: f64) -> Vec<RenderJob> {
    fixture
        .enabled_backends()
        .filter(|backend| backend.supports_scale(scale))
        .map(|backend| RenderJob {
            fixture: fixture.name.clone(),
            width: size.width,
            height: size.height,
            scale,
            backend,
        })
        .collect()
}

/// Expands a fixture into its full job list: sizes outer, scales middle,
/// backends inner.
pub fn expand_jobs(fixture: &FixtureConfig) -> Vec<RenderJob> {
    let mut jobs = Vec::new();
    for size in &fixture.sizes {
        for &scale in &fixture.scales {
            jobs.extend(jobs_for_size(fixture, *size, scale));
        }
    }
    jobs
}
