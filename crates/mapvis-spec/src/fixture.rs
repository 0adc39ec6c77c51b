//! Fixture configuration types.

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;

/// Output size in logical pixels (before the scale factor is applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Surface size for a scale factor; fractional pixels are truncated.
    pub fn scaled(&self, scale: f64) -> (u32, u32) {
        (
            (self.width as f64 * scale) as u32,
            (self.height as f64 * scale) as u32,
        )
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<Size> for (u32, u32) {
    fn from(size: Size) -> Self {
        (size.width, size.height)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Map-space bounding box `[minx, miny, maxx, maxy]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl BoundingBox {
    /// Creates a new bounding box.
    pub const fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }

    /// Whether both spans are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.minx, self.miny, self.maxx, self.maxy]
            .iter()
            .all(|v| v.is_finite())
            && self.minx < self.maxx
            && self.miny < self.maxy
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([minx, miny, maxx, maxy]: [f64; 4]) -> Self {
        Self::new(minx, miny, maxx, maxy)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.minx, b.miny, b.maxx, b.maxy]
    }
}

/// Shared defaults every fixture override is merged onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureDefaults {
    /// Candidate output sizes.
    pub sizes: Vec<Size>,
    /// Scale factors applied to every size.
    pub scales: Vec<f64>,
    /// Bounding box; `None` means fit the full data extent.
    pub bbox: Option<BoundingBox>,
    /// Raster backend enabled.
    pub raster: bool,
    /// Vector backend enabled.
    pub vector: bool,
    /// Grid backend enabled.
    pub grid: bool,
}

impl Default for FixtureDefaults {
    fn default() -> Self {
        Self {
            sizes: vec![Size::new(500, 100)],
            scales: vec![1.0, 2.0],
            bbox: None,
            raster: true,
            vector: true,
            grid: false,
        }
    }
}

impl FixtureDefaults {
    /// Merges an override onto these defaults.
    ///
    /// Each field of the override that is set replaces the corresponding
    /// default; every other field keeps its default value.
    pub fn merge(&self, over: &FixtureOverride) -> FixtureConfig {
        FixtureConfig {
            name: over.name.clone(),
            sizes: over.sizes.clone().unwrap_or_else(|| self.sizes.clone()),
            scales: over.scales.clone().unwrap_or_else(|| self.scales.clone()),
            bbox: over.bbox.or(self.bbox),
            raster: over.raster.unwrap_or(self.raster),
            vector: over.vector.unwrap_or(self.vector),
            grid: over.grid.unwrap_or(self.grid),
        }
    }
}

/// Per-fixture override record. Unset fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureOverride {
    /// Fixture name; the style file is `<name>.json`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<Size>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scales: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
}

impl FixtureOverride {
    /// Creates an override that only names the fixture.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the candidate sizes.
    pub fn sizes(mut self, sizes: Vec<Size>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    /// Sets the scale factors.
    pub fn scales(mut self, scales: Vec<f64>) -> Self {
        self.scales = Some(scales);
        self
    }

    /// Sets the bounding box.
    pub fn bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Enables or disables a backend.
    pub fn backend(mut self, backend: BackendKind, enabled: bool) -> Self {
        match backend {
            BackendKind::Raster => self.raster = Some(enabled),
            BackendKind::Vector => self.vector = Some(enabled),
            BackendKind::Grid => self.grid = Some(enabled),
        }
        self
    }
}

/// A fully merged, immutable fixture configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureConfig {
    pub name: String,
    pub sizes: Vec<Size>,
    pub scales: Vec<f64>,
    pub bbox: Option<BoundingBox>,
    pub raster: bool,
    pub vector: bool,
    pub grid: bool,
}

impl FixtureConfig {
    /// Whether a backend is enabled for this fixture.
    pub fn is_enabled(&self, backend: BackendKind) -> bool {
        match backend {
            BackendKind::Raster => self.raster,
            BackendKind::Vector => self.vector,
            BackendKind::Grid => self.grid,
        }
    }

    /// Enabled backends in dispatch order.
    pub fn enabled_backends(&self) -> impl Iterator<Item = BackendKind> + '_ {
        BackendKind::ALL
            .into_iter()
            .filter(move |backend| self.is_enabled(*backend))
    }

    /// Path of this fixture's style file under a styles directory.
    pub fn style_path(&self, styles_dir: &std::path::Path) -> std::path::PathBuf {
        styles_dir.join(format!("{}.json", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_without_overrides_keeps_defaults() {
        let defaults = FixtureDefaults::default();
        let config = defaults.merge(&FixtureOverride::named("formatting"));

        assert_eq!(config.name, "formatting");
        assert_eq!(config.sizes, vec![Size::new(500, 100)]);
        assert_eq!(config.scales, vec![1.0, 2.0]);
        assert_eq!(config.bbox, None);
        assert!(config.raster);
        assert!(config.vector);
        assert!(!config.grid);
    }

    #[test]
    fn test_merge_replaces_only_set_fields() {
        let defaults = FixtureDefaults::default();
        let over = FixtureOverride::named("collision")
            .sizes(vec![Size::new(600, 400)])
            .backend(BackendKind::Grid, true);
        let config = defaults.merge(&over);

        assert_eq!(config.sizes, vec![Size::new(600, 400)]);
        assert_eq!(config.scales, defaults.scales);
        assert!(config.grid);
        assert!(config.raster);
        assert!(config.vector);
    }

    #[test]
    fn test_enabled_backends_order() {
        let config = FixtureDefaults::default().merge(
            &FixtureOverride::named("x")
                .backend(BackendKind::Grid, true)
                .backend(BackendKind::Raster, false),
        );
        let backends: Vec<_> = config.enabled_backends().collect();
        assert_eq!(backends, vec![BackendKind::Vector, BackendKind::Grid]);
    }

    #[test]
    fn test_size_scaled_truncates() {
        assert_eq!(Size::new(255, 257).scaled(1.5), (382, 385));
        assert_eq!(Size::new(500, 100).scaled(2.0), (1000, 200));
    }

    #[test]
    fn test_override_json_shape() {
        let over: FixtureOverride = serde_json::from_str(
            r#"{"name": "line-offset", "sizes": [[900, 250]], "bbox": [-5.192, 50.189, -5.174, 50.195]}"#,
        )
        .unwrap();

        assert_eq!(over.sizes, Some(vec![Size::new(900, 250)]));
        assert_eq!(
            over.bbox,
            Some(BoundingBox::new(-5.192, 50.189, -5.174, 50.195))
        );
        assert_eq!(over.scales, None);
    }

    #[test]
    fn test_override_rejects_unknown_fields() {
        let result: Result<FixtureOverride, _> =
            serde_json::from_str(r#"{"name": "a", "agg": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bbox_validity() {
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!BoundingBox::new(1.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!BoundingBox::new(0.0, f64::NAN, 1.0, 1.0).is_valid());
    }
}
