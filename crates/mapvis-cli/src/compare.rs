//! Artifact comparison.
//!
//! Images are compared per pixel with a per-channel tolerance; UTF grids are
//! compared structurally and then cell by cell.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mapvis_engine::UtfGrid;

/// Per-channel difference tolerated before a pixel counts as changed.
pub const PIXEL_TOLERANCE: u8 = 16;

/// Grid difference reported when keys, data or dimensions disagree.
pub const GRID_MISMATCH: u64 = 99_999_999;

/// BLAKE3 hex digest of a file.
pub fn file_digest(path: &Path) -> Result<String> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(blake3::hash(&data).to_hex().to_string())
}

/// Counts differing pixels between two images.
///
/// When the pixel counts differ the result is the difference in pixel count;
/// when only the dimensions differ it is the full pixel count. The alpha
/// channel is compared only when `alpha` is set.
pub fn compare_images(actual: &Path, reference: &Path, alpha: bool) -> Result<u64> {
    let actual_bytes =
        fs::read(actual).with_context(|| format!("Failed to read {}", actual.display()))?;
    let reference_bytes =
        fs::read(reference).with_context(|| format!("Failed to read {}", reference.display()))?;

    if blake3::hash(&actual_bytes) == blake3::hash(&reference_bytes) {
        return Ok(0);
    }

    let actual_img = image::load_from_memory(&actual_bytes)
        .with_context(|| format!("Failed to decode {}", actual.display()))?
        .to_rgba8();
    let reference_img = image::load_from_memory(&reference_bytes)
        .with_context(|| format!("Failed to decode {}", reference.display()))?
        .to_rgba8();

    let actual_area = actual_img.width() as u64 * actual_img.height() as u64;
    let reference_area = reference_img.width() as u64 * reference_img.height() as u64;
    if actual_area != reference_area {
        return Ok(actual_area.abs_diff(reference_area));
    }
    if actual_img.dimensions() != reference_img.dimensions() {
        return Ok(actual_area);
    }

    let channels = if alpha { 4 } else { 3 };
    let diff = actual_img
        .pixels()
        .zip(reference_img.pixels())
        .filter(|(a, b)| {
            a.0[..channels]
                .iter()
                .zip(&b.0[..channels])
                .any(|(x, y)| x.abs_diff(*y) > PIXEL_TOLERANCE)
        })
        .count();
    Ok(diff as u64)
}

fn load_grid(path: &Path) -> Result<UtfGrid> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse grid {}", path.display()))
}

/// Counts differing cells between two UTF grids.
///
/// Grids whose keys, data, row count or row width differ are not comparable
/// cell by cell and yield [`GRID_MISMATCH`].
pub fn compare_grids(actual: &Path, reference: &Path) -> Result<u64> {
    let actual = load_grid(actual)?;
    let reference = load_grid(reference)?;
    Ok(grid_difference(&actual, &reference))
}

pub fn grid_difference(actual: &UtfGrid, reference: &UtfGrid) -> u64 {
    if actual.keys != reference.keys
        || actual.data != reference.data
        || actual.grid.len() != reference.grid.len()
    {
        return GRID_MISMATCH;
    }

    let mut diff = 0u64;
    for (a, b) in actual.grid.iter().zip(&reference.grid) {
        if a.chars().count() != b.chars().count() {
            return GRID_MISMATCH;
        }
        diff += a.chars().zip(b.chars()).filter(|(x, y)| x != y).count() as u64;
    }
    diff
}
