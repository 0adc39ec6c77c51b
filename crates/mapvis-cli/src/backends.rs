//! Renderer backends.
//!
//! Each [`BackendKind`] knows how to render its artifact through a [`Map`]
//! and how to diff that artifact against a reference.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mapvis_engine::{ImageFormat, Map, DEFAULT_GRID_RESOLUTION};
use mapvis_spec::{ArtifactCategory, BackendKind};

use crate::compare::{compare_grids, compare_images};

/// Render and compare capabilities of one backend.
pub trait Backend {
    /// Renders the map's current view to `output`.
    fn render(&self, map: &dyn Map, output: &Path, scale: f64) -> Result<()>;

    /// Difference between an actual artifact and its reference.
    fn compare(&self, actual: &Path, reference: &Path) -> Result<u64>;
}

impl Backend for BackendKind {
    fn render(&self, map: &dyn Map, output: &Path, scale: f64) -> Result<()> {
        match self {
            BackendKind::Raster => map.render_image(output, ImageFormat::Rgba, scale)?,
            BackendKind::Vector => map.render_image(output, ImageFormat::Rgb, scale)?,
            BackendKind::Grid => {
                let grid = map.render_grid(0, DEFAULT_GRID_RESOLUTION)?;
                let json = serde_json::to_string_pretty(&grid).context("Failed to serialize grid")?;
                fs::write(output, json)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
            }
        }
        Ok(())
    }

    fn compare(&self, actual: &Path, reference: &Path) -> Result<u64> {
        match self.category() {
            ArtifactCategory::Image => compare_images(actual, reference, self.compares_alpha()),
            ArtifactCategory::Grid => compare_grids(actual, reference),
        }
    }
}
