//! Report document loading
//!
//! Parsing is strictly ordered: raw JSON, then [`validate_structure`], then
//! typing into [`Report`]. Nothing downstream sees an unvalidated tree.

mod types;
mod validate;

pub use types::{
    AttemptError, AttemptResult, OutputChunk, Report, ReportStats, SpecNode, SuiteNode, TestNode,
};
pub use validate::validate_structure;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{RunlensError, Result};

/// Parse, validate and type a report document
pub fn parse_report(text: &str) -> Result<Report> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| RunlensError::invalid_report("$", format!("not valid JSON: {e}")))?;
    parse_report_value(value)
}

/// Validate and type an already-parsed report document
pub fn parse_report_value(value: Value) -> Result<Report> {
    validate_structure(&value)?;
    serde_json::from_value(value).map_err(|e| RunlensError::invalid_report("$", e.to_string()))
}

impl Report {
    /// Run start time, when the reporter recorded a parseable one
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.stats.as_ref()?.start_time.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
