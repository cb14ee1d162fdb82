//! Per-browser, per-suite and per-file rollups

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::percent;
use crate::record::{TestRecord, TestStatus};
use crate::score::round_clamp;

pub const FILE_RISK_FAIL_WEIGHT: f64 = 0.55;
pub const FILE_RISK_RETRY_WEIGHT: f64 = 0.20;
pub const FILE_RISK_DURATION_WEIGHT: f64 = 0.25;

/// Number of riskiest files kept in the payload
pub const TOP_RISK_FILES: usize = 10;

/// Counters of one group of records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionStats {
    pub name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub timed_out: usize,
    pub flaky: usize,
    pub retried: usize,
    pub duration_ms: u64,
    pub pass_rate: f64,
}

impl DimensionStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn add(&mut self, record: &TestRecord) {
        self.total += 1;
        match record.status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Skipped => self.skipped += 1,
            TestStatus::TimedOut => self.timed_out += 1,
            TestStatus::Interrupted | TestStatus::Unknown => {}
        }
        if record.is_flaky() {
            self.flaky += 1;
        }
        if record.was_retried() {
            self.retried += 1;
        }
        self.duration_ms += record.duration_ms;
        self.pass_rate = percent(self.passed, self.total);
    }

    pub fn avg_duration_ms(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.duration_ms as f64 / self.total as f64
        }
    }
}

/// File rollup with its risk index
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    #[serde(flatten)]
    pub stats: DimensionStats,
    pub avg_duration_ms: f64,
    pub risk_score: u32,
}

/// 0-100 risk of a file: failures, retries and duration pressure against
/// the run-wide p95 (pressure is uncapped until the final clamp).
pub fn file_risk_score(stats: &DimensionStats, global_p95_ms: u64) -> u32 {
    let fail_rate = percent(stats.failed, stats.total);
    let retry_rate = percent(stats.retried, stats.total);
    let pressure = 100.0 * stats.avg_duration_ms() / global_p95_ms.max(1) as f64;

    round_clamp(
        FILE_RISK_FAIL_WEIGHT * fail_rate
            + FILE_RISK_RETRY_WEIGHT * retry_rate
            + FILE_RISK_DURATION_WEIGHT * pressure,
    )
}

/// Group records by a label, ordered by label
pub fn rollup_by<'a, F>(records: &'a [TestRecord], label: F) -> Vec<DimensionStats>
where
    F: Fn(&'a TestRecord) -> &'a str,
{
    let mut groups: BTreeMap<&str, DimensionStats> = BTreeMap::new();
    for record in records {
        let name = label(record);
        groups
            .entry(name)
            .or_insert_with(|| DimensionStats::new(name))
            .add(record);
    }
    groups.into_values().collect()
}

/// All rollups of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rollups {
    pub browsers: Vec<DimensionStats>,
    pub suites: Vec<DimensionStats>,
    /// Riskiest files first, at most [`TOP_RISK_FILES`]
    pub files: Vec<FileStats>,
}

impl Rollups {
    pub fn compute(records: &[TestRecord], global_p95_ms: u64) -> Self {
        let mut files: Vec<FileStats> = rollup_by(records, TestRecord::file_label)
            .into_iter()
            .map(|stats| FileStats {
                avg_duration_ms: stats.avg_duration_ms(),
                risk_score: file_risk_score(&stats, global_p95_ms),
                stats,
            })
            .collect();
        files.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
        files.truncate(TOP_RISK_FILES);

        Rollups {
            browsers: rollup_by(records, TestRecord::browser_label),
            suites: rollup_by(records, TestRecord::suite_label),
            files,
        }
    }
}
