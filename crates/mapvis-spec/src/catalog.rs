//! Size presets, the built-in fixture catalog and catalog files.
//!
//! The built-in catalog is grouped into text, raster-image and marker
//! fixtures and is always enumerated in that order.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::Thresholds;
use crate::error::CatalogError;
use crate::fixture::{BoundingBox, FixtureConfig, FixtureDefaults, FixtureOverride, Size};
use crate::matrix::build_fixtures;
use crate::validation::validate_override;

/// Widths 800 down to 100 at a fixed height of 100.
pub const SIZES_MANY_IN_BIG_RANGE: &[Size] = &[
    Size::new(800, 100),
    Size::new(600, 100),
    Size::new(400, 100),
    Size::new(300, 100),
    Size::new(250, 100),
    Size::new(150, 100),
    Size::new(100, 100),
];

/// A few square sizes.
pub const SIZES_FEW_SQUARE: &[Size] = &[
    Size::new(800, 800),
    Size::new(600, 600),
    Size::new(400, 400),
    Size::new(200, 200),
];

/// Widths clustered around 500 at a fixed height of 100.
pub const SIZES_MANY_IN_SMALL_RANGE: &[Size] = &[
    Size::new(490, 100),
    Size::new(495, 100),
    Size::new(497, 100),
    Size::new(498, 100),
    Size::new(499, 100),
    Size::new(500, 100),
    Size::new(501, 100),
    Size::new(502, 100),
    Size::new(505, 100),
    Size::new(510, 100),
];

/// Bounding box shared by the text placement fixtures.
pub const DEFAULT_TEXT_BOX: BoundingBox = BoundingBox::new(-0.05, -0.01, 0.95, 0.01);

fn sized(name: &str, sizes: &[Size]) -> FixtureOverride {
    FixtureOverride::named(name).sizes(sizes.to_vec())
}

fn text(name: &str) -> FixtureOverride {
    FixtureOverride::named(name).bbox(DEFAULT_TEXT_BOX)
}

fn text_sized(name: &str, sizes: &[Size]) -> FixtureOverride {
    sized(name, sizes).bbox(DEFAULT_TEXT_BOX)
}

fn text_fixtures() -> Vec<FixtureOverride> {
    vec![
        text_sized("list", SIZES_MANY_IN_BIG_RANGE),
        text_sized("simple", SIZES_MANY_IN_BIG_RANGE),
        text_sized("lines-1", SIZES_FEW_SQUARE),
        text_sized("lines-2", SIZES_FEW_SQUARE),
        text_sized("lines-3", SIZES_FEW_SQUARE),
        text_sized("lines-4", SIZES_FEW_SQUARE),
        text_sized("lines-5", SIZES_FEW_SQUARE),
        text_sized("lines-6", SIZES_FEW_SQUARE),
        text("formatting"),
        // lines-shield is left out: its placement differs between compilers.
        sized("collision", &[Size::new(600, 400)]),
        sized("text-halo-rasterizer", &[Size::new(600, 400)]),
        text("simple-E"),
        text("simple-NE"),
        text("simple-NW"),
        text("simple-N"),
        text("simple-SE"),
        text("simple-SW"),
        text("simple-S"),
        text("simple-W"),
        text("formatting-1"),
        text("formatting-2"),
        text("formatting-3"),
        text("formatting-4"),
        text("expressionformat"),
        text_sized("shieldsymbolizer-1", SIZES_MANY_IN_SMALL_RANGE),
        text("shieldsymbolizer-2"),
        text("shieldsymbolizer-3"),
        text("shieldsymbolizer-4"),
        text_sized("orientation", &[Size::new(800, 200)]),
        text_sized("hb-fontsets", &[Size::new(800, 200)]),
        text_sized("charspacing", &[Size::new(200, 400)]),
        text_sized("charspacing-lines", &[Size::new(300, 300)]),
        text_sized("line_break", &[Size::new(800, 800)]),
        text_sized("rtl-point", &[Size::new(200, 200)]),
        text_sized("jalign-auto", &[Size::new(200, 200)]),
        sized("line-offset", &[Size::new(900, 250)])
            .bbox(BoundingBox::new(-5.192, 50.189, -5.174, 50.195)),
    ]
}

fn tiff_fixtures() -> Vec<FixtureOverride> {
    let edge = [Size::new(256, 256), Size::new(255, 257)];
    vec![
        sized("tiff-alpha-gdal", &[Size::new(600, 400)]),
        sized("tiff-alpha-broken-assoc-alpha-gdal", &[Size::new(600, 400)]),
        sized("tiff-alpha-gradient-gdal", &[Size::new(600, 400)]),
        sized("tiff-nodata-edge-gdal", &[Size::new(600, 400), Size::new(969, 793)]),
        sized("tiff-opaque-edge-gdal", &[Size::new(256, 256), Size::new(969, 793)]),
        sized("tiff-opaque-edge-gdal2", &[Size::new(600, 400), Size::new(969, 793)]),
        sized("tiff-opaque-edge-raster2", &[Size::new(600, 400), Size::new(969, 793)]),
        sized("tiff-resampling", &[Size::new(600, 400)]),
        sized("tiff-edge-alignment-gdal1", &edge).bbox(BoundingBox::new(
            -13267022.12540147,
            4618019.500877209,
            -13247454.246160466,
            4637587.380118214,
        )),
        sized("tiff-edge-alignment-gdal2", &edge).bbox(BoundingBox::new(
            -13267022.12540147,
            4598451.621636203,
            -13247454.246160466,
            4618019.500877209,
        )),
    ]
}

fn other_fixtures() -> Vec<FixtureOverride> {
    let three = [Size::new(600, 400), Size::new(400, 600), Size::new(257, 256)];
    vec![
        FixtureOverride::named("marker-svg-opacity"),
        sized("marker-multi-policy", &[Size::new(600, 400)]),
        sized("marker-on-line", &[Size::new(600, 400)])
            .bbox(BoundingBox::new(-10.0, 0.0, 15.0, 20.0)),
        sized("marker-on-line-spacing-eq-width", &[Size::new(600, 400)]),
        sized("marker-on-line-spacing-eq-width-overlap", &[Size::new(600, 400)]),
        FixtureOverride::named("marker_line_placement_on_points"),
        sized("marker-with-background-image", &three),
        sized("marker-with-background-image-and-hsla-transform", &three),
        sized("marker-on-hex-grid", &three),
        sized("whole-centroid", &[Size::new(600, 400)])
            .bbox(BoundingBox::new(736908.0, 4390316.0, 2060771.0, 5942346.0)),
    ]
}

/// The curated fixture list run when no names are given.
pub fn builtin_fixtures() -> Vec<FixtureOverride> {
    let mut fixtures = text_fixtures();
    fixtures.extend(tiff_fixtures());
    fixtures.extend(other_fixtures());
    fixtures
}

/// Fixture overrides for names supplied on the command line.
///
/// No names selects the built-in catalog. A single name runs at the
/// [`SIZES_FEW_SQUARE`] sizes; several names run at the default sizes.
pub fn fixtures_for_names(names: &[String]) -> Vec<FixtureOverride> {
    match names {
        [] => builtin_fixtures(),
        [name] => vec![sized(name, SIZES_FEW_SQUARE)],
        names => names.iter().map(FixtureOverride::named).collect(),
    }
}

/// A fixture catalog file: defaults, per-backend thresholds and fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Catalog {
    pub defaults: FixtureDefaults,
    pub thresholds: Thresholds,
    pub fixtures: Vec<FixtureOverride>,
}

impl Catalog {
    /// The built-in catalog with stock defaults and thresholds.
    pub fn builtin() -> Self {
        Self {
            defaults: FixtureDefaults::default(),
            thresholds: Thresholds::default(),
            fixtures: builtin_fixtures(),
        }
    }

    /// Parses and validates a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads, parses and validates a catalog file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Checks every fixture and the defaults.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        let defaults = FixtureOverride {
            name: "defaults".to_string(),
            sizes: Some(self.defaults.sizes.clone()),
            scales: Some(self.defaults.scales.clone()),
            bbox: self.defaults.bbox,
            ..Default::default()
        };
        validate_override(&defaults)?;

        for fixture in &self.fixtures {
            validate_override(fixture)?;
            if !seen.insert(fixture.name.as_str()) {
                return Err(CatalogError::Duplicate(fixture.name.clone()));
            }
        }
        Ok(())
    }

    /// Merged fixture configurations in catalog order.
    pub fn fixture_configs(&self) -> Vec<FixtureConfig> {
        build_fixtures(&self.defaults, &self.fixtures)
    }
}
