//! End-to-end visual test runs against scratch directories.

use std::fs;

use pretty_assertions::assert_eq;

use mapvis_cli::commands;
use mapvis_cli::reporting::{ReferenceAction, RunSummary};
use mapvis_spec::{BackendKind, Catalog, FixtureDefaults, FixtureOverride, OutcomeKind, Size};
use mapvis_tests::harness::{small_fixtures, MIXED_STYLE, MIXED_STYLE_RECOLOURED};
use mapvis_tests::VisualHarness;

fn kinds(summary: &RunSummary) -> Vec<OutcomeKind> {
    summary.entries.iter().map(|e| e.outcome.kind()).collect()
}

#[test]
fn first_run_generates_then_second_run_passes() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    let config = harness.config();
    let fixtures = small_fixtures(&["mixed"]);

    let first = harness.run(&fixtures, &config);
    assert!(first.success);
    assert_eq!(first.counts.generated, 4);
    assert!(first
        .entries
        .iter()
        .all(|e| e.action == Some(ReferenceAction::Generated)));

    let second = harness.run(&fixtures, &config);
    assert!(second.success);
    assert_eq!(second.counts.passed, 4);
    assert!(second.entries.iter().all(|e| e.outcome.diff() == Some(0)));
}

#[test]
fn changed_style_fails_against_reference() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    let config = harness.config();
    let fixtures = small_fixtures(&["mixed"]);
    harness.run(&fixtures, &config);

    harness.write_style("mixed", MIXED_STYLE_RECOLOURED);
    let summary = harness.run(&fixtures, &config);

    assert!(!summary.success);
    assert_eq!(summary.counts.failed, 4);
    assert!(summary.entries.iter().all(|e| e.outcome.diff().unwrap_or(0) > 0));
}

#[test]
fn overwrite_replaces_reference_but_fails_once() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    let fixtures = small_fixtures(&["mixed"]);
    harness.run(&fixtures, &harness.config());

    harness.write_style("mixed", MIXED_STYLE_RECOLOURED);
    let overwrite = mapvis_cli::config::RunConfig {
        overwrite: true,
        ..harness.config()
    };
    let replaced = harness.run(&fixtures, &overwrite);
    assert!(!replaced.success);
    assert_eq!(replaced.counts.overwritten, 4);

    let after = harness.run(&fixtures, &harness.config());
    assert!(after.success);
    assert_eq!(after.counts.passed, 4);
}

#[test]
fn no_generate_reports_missing_references() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    let config = mapvis_cli::config::RunConfig {
        generate: false,
        ..harness.config()
    };

    let summary = harness.run(&small_fixtures(&["mixed"]), &config);

    assert!(!summary.success);
    assert_eq!(summary.counts.missing, 4);
    assert!(!config.reference_dir.join("images").exists());
}

#[test]
fn load_error_skips_only_that_fixture() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    harness.write_style("broken", "{ not json");
    let config = harness.config();

    let summary = harness.run(&small_fixtures(&["broken", "missing", "mixed"]), &config);

    assert_eq!(
        kinds(&summary)[..2],
        [OutcomeKind::LoadError, OutcomeKind::LoadError]
    );
    assert_eq!(summary.entries[0].fixture, "broken");
    assert_eq!(summary.entries[1].fixture, "missing");
    assert_eq!(summary.counts.generated, 4);
    assert!(!summary.success);
}

#[test]
fn oversized_surface_fails_only_its_jobs() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    harness.write_style("other", MIXED_STYLE);
    let catalog = Catalog::from_json(
        r#"{"defaults":{"sizes":[[800,800]],"scales":[1.0,1e9]},"fixtures":[{"name":"mixed"},{"name":"other"}]}"#,
    )
    .unwrap();

    let summary = harness.run(&catalog.fixture_configs(), &harness.config());

    assert_eq!(summary.entries.len(), 8);
    assert_eq!(summary.counts.generated, 4);
    assert_eq!(summary.counts.render_errors, 4);
    let other: Vec<_> = summary
        .entries
        .iter()
        .filter(|e| e.fixture == "other")
        .map(|e| e.outcome.kind())
        .collect();
    assert_eq!(
        other,
        vec![
            OutcomeKind::ReferenceMissing,
            OutcomeKind::ReferenceMissing,
            OutcomeKind::RenderError,
            OutcomeKind::RenderError,
        ]
    );
    assert!(!summary.success);
}

#[test]
fn grid_jobs_only_at_scale_one() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    let config = harness.config();
    let fixture = FixtureDefaults::default().merge(
        &FixtureOverride::named("mixed")
            .sizes(vec![Size::new(40, 20)])
            .backend(BackendKind::Grid, true),
    );

    let summary = harness.run(&[fixture], &config);

    let grids: Vec<_> = summary
        .entries
        .iter()
        .filter(|e| e.backend == Some(BackendKind::Grid))
        .collect();
    assert_eq!(summary.entries.len(), 5);
    assert_eq!(grids.len(), 1);
    assert_eq!(grids[0].artifact.as_deref(), Some("mixed-40-20-1.0-grid.json"));
    assert!(config.reference_dir.join("grids/mixed-40-20-1.0-grid.json").exists());
}

#[test]
fn style_is_saved_after_rendering() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    let config = harness.config();

    harness.run(&small_fixtures(&["mixed"]), &config);

    let saved = fs::read_to_string(config.style_out_path("mixed")).unwrap();
    let original: serde_json::Value = serde_json::from_str(MIXED_STYLE).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["layers"][1]["name"], original["layers"][1]["name"]);
}

#[test]
fn run_command_writes_summary_json() {
    let harness = VisualHarness::new();
    harness.write_style("mixed", MIXED_STYLE);
    let catalog = harness.path().join("catalog.json");
    fs::write(
        &catalog,
        r#"{"defaults":{"sizes":[[30,10]],"scales":[1.0]},"fixtures":[{"name":"mixed","grid":true}]}"#,
    )
    .unwrap();
    let config = harness.config();
    let summary_path = config.summary_path();

    commands::run::run(&[], Some(&catalog), config).unwrap();

    let summary: RunSummary =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert!(summary.success);
    assert_eq!(summary.total, 3);
    assert!(summary.entries.iter().all(|e| e.digest.is_some()));
}

#[test]
fn simple_raster_fixture_passes_against_its_reference() {
    let harness = VisualHarness::new();
    let bundled = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../visual_tests/styles/simple.json");
    harness.write_style("simple", &fs::read_to_string(bundled).unwrap());
    let config = harness.config();
    let fixture = FixtureDefaults::default().merge(
        &FixtureOverride::named("simple")
            .sizes(vec![Size::new(500, 100)])
            .scales(vec![1.0])
            .backend(BackendKind::Vector, false),
    );

    let first = harness.run(std::slice::from_ref(&fixture), &config);
    assert_eq!(kinds(&first), vec![OutcomeKind::ReferenceMissing]);
    assert!(first.success);
    assert!(config
        .reference_dir
        .join("images/simple-500-100-1.0-raster.png")
        .exists());

    let second = harness.run(&[fixture], &config);
    assert_eq!(kinds(&second), vec![OutcomeKind::Pass]);
    assert!(second.success);
}
