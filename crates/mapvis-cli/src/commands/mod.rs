//! CLI command implementations

pub mod list;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use mapvis_spec::{build_fixtures, fixtures_for_names, Catalog, FixtureConfig, Thresholds};

/// Fixtures and thresholds selected for a run.
///
/// Without names the catalog's own fixtures are used; with names, those
/// fixtures are built from the catalog defaults. The catalog is the built-in
/// one unless a catalog file is given.
pub fn resolve_fixtures(
    names: &[String],
    catalog_path: Option<&Path>,
) -> Result<(Vec<FixtureConfig>, Thresholds)> {
    let catalog = match catalog_path {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?,
        None => Catalog::builtin(),
    };

    let fixtures = if names.is_empty() {
        catalog.fixture_configs()
    } else {
        build_fixtures(&catalog.defaults, &fixtures_for_names(names))
    };
    Ok((fixtures, catalog.thresholds))
}
