//! mapvis CLI library.
//!
//! This crate drives the visual tests: it renders every job of the fixture
//! matrix through a [`mapvis_engine::Map`], compares the artifacts against
//! stored references and reports the outcomes.

pub mod backends;
pub mod commands;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod reporting;
pub mod runner;
