//! Runlens Core Library
//!
//! Test-run analytics: flattens a hierarchical test report into records,
//! aggregates them into counters, scores and rollups, and compares the run
//! against a caller-maintained history window.

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod flatten;
pub mod history;
pub mod logging;
pub mod payload;
pub mod record;
pub mod report;
pub mod rollup;
pub mod score;
pub mod trend;
