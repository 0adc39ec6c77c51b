//! Fixture name and field validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CatalogError;
use crate::fixture::FixtureOverride;

/// Regex pattern for valid fixture names.
/// Format: starts with a letter or digit, followed by letters, digits, underscores, dots, or hyphens.
const FIXTURE_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.-]*$";

static FIXTURE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn fixture_name_regex() -> &'static Regex {
    FIXTURE_NAME_REGEX.get_or_init(|| Regex::new(FIXTURE_NAME_PATTERN).expect("invalid regex pattern"))
}

/// Checks whether a fixture name is safe to use as a file name stem.
///
/// Names with path separators or a leading dot are rejected, so a fixture
/// can never resolve outside the styles or output directory.
pub fn is_valid_fixture_name(name: &str) -> bool {
    fixture_name_regex().is_match(name)
}

/// Validates an override record.
///
/// Only fields that are set are checked; unset fields come from the defaults.
pub fn validate_override(over: &FixtureOverride) -> Result<(), CatalogError> {
    if !is_valid_fixture_name(&over.name) {
        return Err(CatalogError::InvalidName(over.name.clone()));
    }

    if let Some(sizes) = &over.sizes {
        if sizes.is_empty() {
            return Err(CatalogError::invalid_field(&over.name, "sizes must not be empty"));
        }
        if let Some(size) = sizes.iter().find(|s| s.width == 0 || s.height == 0) {
            return Err(CatalogError::invalid_field(
                &over.name,
                format!("size {} has a zero dimension", size),
            ));
        }
    }

    if let Some(scales) = &over.scales {
        if scales.is_empty() {
            return Err(CatalogError::invalid_field(&over.name, "scales must not be empty"));
        }
        if let Some(scale) = scales.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(CatalogError::invalid_field(
                &over.name,
                format!("scale factor {} must be finite and positive", scale),
            ));
        }
    }

    if let Some(bbox) = &over.bbox {
        if !bbox.is_valid() {
            return Err(CatalogError::invalid_field(
                &over.name,
                format!(
                    "bounding box [{}, {}, {}, {}] is empty or not finite",
                    bbox.minx, bbox.miny, bbox.maxx, bbox.maxy
                ),
            ));
        }
    }

    Ok(())
}
