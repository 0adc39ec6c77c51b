//! mapvis End-to-End Test Infrastructure
//!
//! This crate exercises the whole visual test flow through the library
//! entry points: fixture matrix -> render dispatch -> comparison -> report.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mapvis-tests
//! ```

pub mod harness;

pub use harness::VisualHarness;
