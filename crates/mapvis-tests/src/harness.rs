//! Test harness for running fixtures against scratch directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use mapvis_cli::config::RunConfig;
use mapvis_cli::reporting::{Reporting, RunSummary};
use mapvis_cli::runner::run_fixtures;
use mapvis_engine::{Map, SketchMap};
use mapvis_spec::{FixtureConfig, FixtureDefaults, FixtureOverride, Size};

/// A small style with a polygon, a line and a point, in one layer each.
pub const MIXED_STYLE: &str = r##"{
    "background": "#ffffffff",
    "layers": [
        { "name": "area", "fill": "#88cc88ff", "stroke": "#336633ff", "features": [
            { "id": 1, "geometry": { "type": "polygon", "coordinates": [[0, 0], [6, 0], [6, 4], [0, 4]] } } ] },
        { "name": "road", "fill": "#000000ff", "stroke_width": 2, "features": [
            { "id": 2, "geometry": { "type": "line_string", "coordinates": [[0, 2], [10, 3]] } } ] },
        { "name": "poi", "fill": "#cc0000ff", "marker_size": 3, "features": [
            { "id": 3, "geometry": { "type": "point", "coordinates": [8, 1] } } ] }
    ]
}"##;

/// Same as [`MIXED_STYLE`] with the polygon recoloured.
pub const MIXED_STYLE_RECOLOURED: &str = r##"{
    "background": "#ffffffff",
    "layers": [
        { "name": "area", "fill": "#3355ffff", "stroke": "#336633ff", "features": [
            { "id": 1, "geometry": { "type": "polygon", "coordinates": [[0, 0], [6, 0], [6, 4], [0, 4]] } } ] },
        { "name": "road", "fill": "#000000ff", "stroke_width": 2, "features": [
            { "id": 2, "geometry": { "type": "line_string", "coordinates": [[0, 2], [10, 3]] } } ] },
        { "name": "poi", "fill": "#cc0000ff", "marker_size": 3, "features": [
            { "id": 3, "geometry": { "type": "point", "coordinates": [8, 1] } } ] }
    ]
}"##;

/// Scratch styles, references and output under one temp dir.
pub struct VisualHarness {
    pub work_dir: TempDir,
}

impl VisualHarness {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn styles_dir(&self) -> PathBuf {
        self.path().join("styles")
    }

    /// Writes `<styles>/<name>.json`.
    pub fn write_style(&self, name: &str, json: &str) {
        fs::create_dir_all(self.styles_dir()).expect("Failed to create styles dir");
        fs::write(self.styles_dir().join(format!("{}.json", name)), json)
            .expect("Failed to write style");
    }

    /// Quiet config pointing at the harness directories.
    pub fn config(&self) -> RunConfig {
        RunConfig {
            styles_dir: self.styles_dir(),
            reference_dir: self.path().join("refs"),
            output_dir: self.path().join("out"),
            quiet: true,
            ..Default::default()
        }
    }

    /// Runs fixtures with the sketch engine and returns the summary.
    pub fn run(&self, fixtures: &[FixtureConfig], config: &RunConfig) -> RunSummary {
        let mut reporting = Reporting::new(config);
        run_fixtures(
            fixtures,
            config,
            || Box::new(SketchMap::new(256, 256)) as Box<dyn Map>,
            &mut reporting,
        )
        .expect("Failed to prepare output directories");
        reporting.summary()
    }
}

impl Default for VisualHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixtures at one small size, with the default scales and backends.
pub fn small_fixtures(names: &[&str]) -> Vec<FixtureConfig> {
    let defaults = FixtureDefaults {
        sizes: vec![Size::new(60, 20)],
        ..Default::default()
    };
    names
        .iter()
        .map(|name| defaults.merge(&FixtureOverride::named(*name)))
        .collect()
}
