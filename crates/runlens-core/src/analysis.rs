//! First phase of the pipeline: everything derivable from the report alone
//!
//! The caller takes [`ReportAnalysis::run_summary`], maintains its history
//! window with it, and then hands the window to
//! [`crate::payload::build_payload`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::aggregate::Aggregates;
use crate::flatten::{flatten, FlattenedReport};
use crate::record::TestRecord;
use crate::report::Report;
use crate::rollup::Rollups;
use crate::score::Percentiles;
use crate::trace_time;
use crate::trend::RunSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportAnalysis {
    pub flattened: FlattenedReport,
    pub aggregates: Aggregates,
    pub percentiles: Percentiles,
    pub rollups: Rollups,
    /// Run start time declared by the report, if any
    pub started_at: Option<DateTime<Utc>>,
}

impl ReportAnalysis {
    pub fn records(&self) -> &[TestRecord] {
        &self.flattened.records
    }

    /// Summary of this run for the history window, stamped with the
    /// report's start time when it has one
    pub fn run_summary(&self, now: DateTime<Utc>) -> RunSummary {
        self.aggregates.run_summary(self.started_at.unwrap_or(now))
    }
}

/// Flatten, aggregate and roll up a validated report
pub fn analyze(report: &Report) -> ReportAnalysis {
    let start = Instant::now();

    let flattened = flatten(report);
    trace_time!(start, "flatten", records = flattened.records.len());

    let aggregates = Aggregates::compute(&flattened.records);
    let percentiles = Percentiles::from_durations(flattened.records.iter().map(|r| r.duration_ms));
    debug!(
        total = aggregates.total,
        passed = aggregates.passed,
        failed = aggregates.failed,
        flaky = aggregates.flaky,
        p95 = percentiles.p95,
        "aggregates"
    );

    let rollups = Rollups::compute(&flattened.records, percentiles.p95);
    trace_time!(start, "analyze");

    ReportAnalysis {
        flattened,
        aggregates,
        percentiles,
        rollups,
        started_at: report.started_at(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse_report;
    use chrono::TimeZone;

    const REPORT: &str = r#"{
        "stats": {"startTime": "2026-03-04T10:15:00.000Z", "duration": 4200},
        "suites": [{
            "title": "checkout.spec.ts",
            "file": "checkout.spec.ts",
            "specs": [
                {"title": "pays", "tests": [{"projectName": "chromium", "results": [{"status": "passed", "duration": 1200}]}]},
                {"title": "refunds", "tests": [{"projectName": "firefox", "results": [
                    {"status": "failed", "duration": 900},
                    {"status": "passed", "duration": 700}
                ]}]},
                {"title": "voids", "tests": [{"projectName": "chromium", "results": [{"status": "failed", "duration": 2400}]}]}
            ]
        }]
    }"#;

    #[test]
    fn test_analyze_counts() {
        let analysis = analyze(&parse_report(REPORT).unwrap());
        assert_eq!(analysis.records().len(), 3);
        assert_eq!(analysis.aggregates.passed, 2);
        assert_eq!(analysis.aggregates.failed, 1);
        assert_eq!(analysis.aggregates.flaky, 1);
        assert_eq!(analysis.percentiles.p95, 2400);
        assert_eq!(analysis.rollups.browsers.len(), 2);
        assert_eq!(analysis.rollups.files.len(), 1);
    }

    #[test]
    fn test_run_summary_prefers_report_start_time() {
        let analysis = analyze(&parse_report(REPORT).unwrap());
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();

        let summary = analysis.run_summary(now);
        assert_eq!(
            summary.generated_at,
            Some(Utc.with_ymd_and_hms(2026, 3, 4, 10, 15, 0).unwrap())
        );
        assert_eq!(summary.total, 3);
        assert_eq!(summary.duration_ms, 4300);
    }

    #[test]
    fn test_run_summary_falls_back_to_now() {
        let analysis = analyze(&parse_report(r#"{"suites": []}"#).unwrap());
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();

        let summary = analysis.run_summary(now);
        assert_eq!(summary.generated_at, Some(now));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate, 0.0);
    }
}
