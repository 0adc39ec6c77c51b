//! mapvis Fixture Library
//!
//! This crate provides the data model for mapvis visual-regression runs:
//! fixture configurations, the defaults/override merge, the built-in fixture
//! catalog, render-job expansion, artifact naming and per-job outcomes.
//!
//! # Overview
//!
//! A run is a matrix of named style fixtures x output sizes x scale factors x
//! renderer backends:
//!
//! - **Fixtures**: [`FixtureOverride`] records merged onto [`FixtureDefaults`]
//!   to produce immutable [`FixtureConfig`] values
//! - **Jobs**: each [`FixtureConfig`] expands deterministically into
//!   [`RenderJob`]s, one per (size, scale, enabled backend)
//! - **Outcomes**: every job produces exactly one [`Outcome`]
//!
//! # Example
//!
//! ```
//! use mapvis_spec::{expand_jobs, FixtureDefaults, FixtureOverride, Size};
//!
//! let defaults = FixtureDefaults::default();
//! let fixture = defaults.merge(&FixtureOverride::named("simple").sizes(vec![Size::new(500, 100)]));
//!
//! // raster + vector at 1.0 and 2.0
//! let jobs = expand_jobs(&fixture);
//! assert_eq!(jobs.len(), 4);
//! assert_eq!(jobs[0].artifact_file_name(), "simple-500-100-1.0-raster.png");
//! ```
//!
//! # Modules
//!
//! - [`backend`]: Backend kinds and artifact categories
//! - [`catalog`]: Size presets, the built-in fixture list and catalog files
//! - [`error`]: Catalog errors
//! - [`fixture`]: Defaults, overrides and merged fixture configurations
//! - [`matrix`]: Render-job expansion and artifact naming
//! - [`outcome`]: Per-job outcomes
//! - [`validation`]: Fixture name and field validation

pub mod backend;
pub mod catalog;
pub mod error;
pub mod fixture;
pub mod matrix;
pub mod outcome;
pub mod validation;

pub use backend::{ArtifactCategory, BackendKind, Thresholds};
pub use catalog::{
    builtin_fixtures, fixtures_for_names, Catalog, DEFAULT_TEXT_BOX, SIZES_FEW_SQUARE,
    SIZES_MANY_IN_BIG_RANGE, SIZES_MANY_IN_SMALL_RANGE,
};
pub use error::CatalogError;
pub use fixture::{BoundingBox, FixtureConfig, FixtureDefaults, FixtureOverride, Size};
pub use matrix::{build_fixtures, expand_jobs, format_scale, jobs_for_size, RenderJob};
pub use outcome::{Outcome, OutcomeKind};
pub use validation::{is_valid_fixture_name, validate_override};
