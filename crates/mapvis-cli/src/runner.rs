//! Walks the fixture list, one map per fixture.

use std::fs;

use anyhow::{Context, Result};
use mapvis_engine::Map;
use mapvis_spec::{is_valid_fixture_name, FixtureConfig};

use crate::config::RunConfig;
use crate::dispatch::dispatch_size;
use crate::reporting::Reporting;

/// Runs every fixture in order and records all outcomes.
///
/// `new_map` is called once per fixture. Only failing to create the output
/// directories aborts the run; everything else becomes an outcome.
pub fn run_fixtures<F>(
    fixtures: &[FixtureConfig],
    config: &RunConfig,
    mut new_map: F,
    reporting: &mut Reporting,
) -> Result<()>
where
    F: FnMut() -> Box<dyn Map>,
{
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;
    fs::create_dir_all(config.styles_out_dir()).with_context(|| {
        format!(
            "Failed to create styles output directory: {}",
            config.styles_out_dir().display()
        )
    })?;

    for fixture in fixtures {
        let mut map = new_map();
        run_fixture(fixture, config, map.as_mut(), reporting);
    }
    Ok(())
}

/// Loads one fixture's style and runs its size x scale matrix.
pub fn run_fixture(
    fixture: &FixtureConfig,
    config: &RunConfig,
    map: &mut dyn Map,
    reporting: &mut Reporting,
) {
    if !is_valid_fixture_name(&fixture.name) {
        reporting.record_load_error(&fixture.name, "invalid fixture name");
        return;
    }

    let style_path = fixture.style_path(&config.styles_dir);
    log::info!("loading {}", style_path.display());
    if let Err(e) = map.load_style(&style_path) {
        reporting.record_load_error(&fixture.name, &e.to_string());
        return;
    }

    for size in &fixture.sizes {
        for &scale in &fixture.scales {
            for record in dispatch_size(map, fixture, *size, scale, config) {
                reporting.record(record);
            }
        }
    }

    let out = config.style_out_path(&fixture.name);
    if let Err(e) = map.save_style(&out) {
        log::warn!("could not save style for {}: {}", fixture.name, e);
    }
}
