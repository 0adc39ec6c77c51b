//! Render dispatch.
//!
//! Prepares the map for one (size, scale) pair and runs every job of that
//! pair. Failures are folded into the job's [`Outcome`] so one bad job never
//! stops its siblings.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use mapvis_engine::Map;
use mapvis_spec::{jobs_for_size, FixtureConfig, Outcome, RenderJob, Size};

use crate::backends::Backend;
use crate::config::RunConfig;

/// A finished job together with the paths it touched.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job: RenderJob,
    pub actual: PathBuf,
    pub reference: PathBuf,
    pub outcome: Outcome,
}

/// Resizes and zooms the map, then renders and compares every job of one
/// (size, scale) pair in backend order.
pub fn dispatch_size(
    map: &mut dyn Map,
    fixture: &FixtureConfig,
    size: Size,
    scale: f64,
    config: &RunConfig,
) -> Vec<JobRecord> {
    let (width, height) = size.scaled(scale);
    map.resize(width, height);
    let (surface_w, surface_h) = map.size();
    log::debug!("{}: surface {}x{} at scale {}", fixture.name, surface_w, surface_h, scale);
    match fixture.bbox {
        Some(bbox) => map.zoom_to_box(bbox),
        None => map.zoom_all(),
    }

    let map: &dyn Map = map;
    jobs_for_size(fixture, size, scale)
        .into_iter()
        .map(|job| run_job(map, job, config))
        .collect()
}

/// Renders one job and compares it against its reference.
pub fn run_job(map: &dyn Map, job: RenderJob, config: &RunConfig) -> JobRecord {
    let actual = config.actual_path(&job);
    let reference = config.reference_path(&job);

    if actual.exists() {
        if let Err(e) = fs::remove_file(&actual) {
            log::warn!("could not remove stale {}: {}", actual.display(), e);
        }
    }

    let start = Instant::now();
    let rendered = job.backend.render(map, &actual, job.scale);
    let elapsed = start.elapsed();
    log::debug!("rendered {} in {:?}", actual.display(), elapsed);

    let outcome = match rendered {
        Err(e) => Outcome::RenderError {
            message: format!("{:#}", e),
        },
        Ok(()) if !reference.exists() => Outcome::ReferenceMissing,
        Ok(()) => match job.backend.compare(&actual, &reference) {
            Ok(diff) => Outcome::from_diff(diff, config.thresholds.for_backend(job.backend), elapsed),
            Err(e) => Outcome::RenderError {
                message: format!("{:#}", e),
            },
        },
    };

    JobRecord {
        job,
        actual,
        reference,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapvis_engine::{EngineError, ImageFormat, SketchMap, StyleDocument, UtfGrid};
    use mapvis_spec::{BackendKind, BoundingBox, FixtureDefaults, FixtureOverride, OutcomeKind};
    use std::path::Path;

    const STYLE: &str = r##"{"background":"#ffffff","layers":[{"name":"a","features":[
        {"id":1,"geometry":{"type":"line_string","coordinates":[[0,0],[10,2]]}}]}]}"##;

    fn config(dir: &Path) -> RunConfig {
        RunConfig {
            reference_dir: dir.join("refs"),
            output_dir: dir.join("out"),
            quiet: true,
            ..Default::default()
        }
    }

    /// Records calls and fails the vector render.
    #[derive(Default)]
    struct FlakyMap {
        size: (u32, u32),
        zoomed_to: Option<BoundingBox>,
        zoomed_all: bool,
    }

    impl Map for FlakyMap {
        fn load_style(&mut self, _path: &Path) -> Result<(), EngineError> {
            Ok(())
        }
        fn save_style(&self, _path: &Path) -> Result<(), EngineError> {
            Ok(())
        }
        fn size(&self) -> (u32, u32) {
            self.size
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
        fn zoom_to_box(&mut self, bbox: BoundingBox) {
            self.zoomed_to = Some(bbox);
        }
        fn zoom_all(&mut self) {
            self.zoomed_all = true;
        }
        fn render_image(&self, path: &Path, format: ImageFormat, _scale: f64) -> Result<(), EngineError> {
            match format {
                ImageFormat::Rgb => Err(EngineError::InvalidStyle("vector backend unavailable".into())),
                ImageFormat::Rgba => {
                    let img = image::RgbaImage::new(self.size.0, self.size.1);
                    img.save(path).map_err(|e| EngineError::InvalidStyle(e.to_string()))
                }
            }
        }
        fn render_grid(&self, _layer: usize, _resolution: u32) -> Result<UtfGrid, EngineError> {
            Ok(UtfGrid {
                grid: vec![" ".to_string(); 2],
                keys: vec![String::new()],
                data: Default::default(),
            })
        }
    }

    #[test]
    fn test_resize_and_zoom() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir_all(&config.output_dir).unwrap();

        let fixture = FixtureDefaults::default().merge(&FixtureOverride::named("f").bbox(BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        let mut map = FlakyMap::default();
        dispatch_size(&mut map, &fixture, Size::new(50, 20), 2.0, &config);

        assert_eq!(map.size, (100, 40));
        assert_eq!(map.zoomed_to, Some(BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!map.zoomed_all);
    }

    #[test]
    fn test_failing_job_does_not_stop_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir_all(&config.output_dir).unwrap();

        let fixture = FixtureDefaults::default().merge(&FixtureOverride::named("f").backend(BackendKind::Grid, true));
        let mut map = FlakyMap::default();
        let first = dispatch_size(&mut map, &fixture, Size::new(8, 8), 1.0, &config);
        let kinds: Vec<_> = first.iter().map(|r| r.outcome.kind()).collect();
        assert_eq!(
            kinds,
            vec![OutcomeKind::ReferenceMissing, OutcomeKind::RenderError, OutcomeKind::ReferenceMissing]
        );
        assert!(map.zoomed_all);

        for record in first.iter().filter(|r| r.actual.exists()) {
            std::fs::create_dir_all(record.reference.parent().unwrap()).unwrap();
            std::fs::copy(&record.actual, &record.reference).unwrap();
        }

        let second = dispatch_size(&mut map, &fixture, Size::new(8, 8), 1.0, &config);
        let kinds: Vec<_> = second.iter().map(|r| r.outcome.kind()).collect();
        assert_eq!(
            kinds,
            vec![OutcomeKind::Pass, OutcomeKind::RenderError, OutcomeKind::Pass]
        );
        assert_eq!(second[2].job.backend, BackendKind::Grid);
    }

    #[test]
    fn test_failed_render_leaves_no_stale_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir_all(&config.output_dir).unwrap();

        let job = RenderJob {
            fixture: "f".to_string(),
            width: 8,
            height: 8,
            scale: 1.0,
            backend: BackendKind::Vector,
        };
        let stale = config.actual_path(&job);
        std::fs::write(&stale, b"previous run").unwrap();

        let record = run_job(&FlakyMap::default(), job, &config);

        assert_eq!(record.outcome.kind(), OutcomeKind::RenderError);
        assert!(!stale.exists());
    }

    #[test]
    fn test_pass_against_identical_reference() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir_all(&config.output_dir).unwrap();
        std::fs::create_dir_all(config.reference_dir.join("images")).unwrap();

        let fixture = FixtureDefaults::default().merge(&FixtureOverride::named("line"));
        let mut map = SketchMap::with_style(1, 1, StyleDocument::from_json(STYLE).unwrap());

        let first = dispatch_size(&mut map, &fixture, Size::new(40, 10), 1.0, &config);
        for record in &first {
            std::fs::copy(&record.actual, &record.reference).unwrap();
        }
        let second = dispatch_size(&mut map, &fixture, Size::new(40, 10), 1.0, &config);

        assert_eq!(second.len(), 2);
        for record in second {
            assert_eq!(record.outcome.kind(), OutcomeKind::Pass);
            assert_eq!(record.outcome.diff(), Some(0));
        }
    }

    #[test]
    fn test_threshold_applies_per_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.thresholds.raster = 1_000;
        std::fs::create_dir_all(&config.output_dir).unwrap();
        std::fs::create_dir_all(config.reference_dir.join("images")).unwrap();

        let job = RenderJob {
            fixture: "line".to_string(),
            width: 40,
            height: 10,
            scale: 1.0,
            backend: BackendKind::Raster,
        };
        let reference = config.reference_path(&job);
        image::RgbaImage::new(40, 10).save(&reference).unwrap();

        let mut map = SketchMap::with_style(40, 10, StyleDocument::from_json(STYLE).unwrap());
        map.zoom_all();
        let record = run_job(&map, job, &config);

        match record.outcome {
            Outcome::Pass { diff, .. } => assert!(diff > 0 && diff <= 1_000),
            other => panic!("expected pass, got {:?}", other),
        }
    }
}
