//! Basic aggregation over flat test records

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::{TestRecord, TestStatus};
use crate::trend::RunSummary;

/// Upper bound (exclusive) of the fast bucket
pub const FAST_THRESHOLD_MS: u64 = 1_000;
/// Upper bound (exclusive) of the medium bucket
pub const MEDIUM_THRESHOLD_MS: u64 = 5_000;
/// Upper bound (exclusive) of the slow bucket; anything above is very slow
pub const SLOW_THRESHOLD_MS: u64 = 15_000;

/// Length of the internal ranking lists
pub const TOP_N: usize = 10;

/// `100 * count / total`, or 0 for an empty population
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

/// Four fixed duration buckets partitioning the test set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBuckets {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
    pub very_slow: usize,
}

impl DurationBuckets {
    pub fn add(&mut self, duration_ms: u64) {
        match duration_ms {
            ms if ms < FAST_THRESHOLD_MS => self.fast += 1,
            ms if ms < MEDIUM_THRESHOLD_MS => self.medium += 1,
            ms if ms < SLOW_THRESHOLD_MS => self.slow += 1,
            _ => self.very_slow += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.fast + self.medium + self.slow + self.very_slow
    }
}

/// Counters and distributions of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub timed_out: usize,
    pub flaky: usize,
    /// Tests with at least one retry, whatever their final status
    pub retried: usize,
    /// Sum of all retries
    pub retry_burden: u64,
    pub total_duration_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub avg_duration_ms: f64,
    pub pass_rate: f64,
    pub fail_rate: f64,
    pub skip_rate: f64,
    pub flaky_rate: f64,
    pub timed_out_rate: f64,
    pub duration_buckets: DurationBuckets,
    /// Record count per exact retry count
    pub retries_histogram: BTreeMap<u32, usize>,
}

impl Aggregates {
    /// Reduce a record sequence. An empty sequence yields all zeros.
    pub fn compute(records: &[TestRecord]) -> Self {
        let mut agg = Aggregates {
            total: records.len(),
            min_duration_ms: records.iter().map(|r| r.duration_ms).min().unwrap_or(0),
            max_duration_ms: records.iter().map(|r| r.duration_ms).max().unwrap_or(0),
            ..Default::default()
        };

        for record in records {
            match record.status {
                TestStatus::Passed => agg.passed += 1,
                TestStatus::Failed => agg.failed += 1,
                TestStatus::Skipped => agg.skipped += 1,
                TestStatus::TimedOut => agg.timed_out += 1,
                TestStatus::Interrupted | TestStatus::Unknown => {}
            }
            if record.is_flaky() {
                agg.flaky += 1;
            }
            if record.was_retried() {
                agg.retried += 1;
            }
            agg.retry_burden += u64::from(record.retries);
            agg.total_duration_ms += record.duration_ms;
            agg.duration_buckets.add(record.duration_ms);
            *agg.retries_histogram.entry(record.retries).or_insert(0) += 1;
        }

        if agg.total > 0 {
            agg.avg_duration_ms = agg.total_duration_ms as f64 / agg.total as f64;
        }
        agg.pass_rate = percent(agg.passed, agg.total);
        agg.fail_rate = percent(agg.failed, agg.total);
        agg.skip_rate = percent(agg.skipped, agg.total);
        agg.flaky_rate = percent(agg.flaky, agg.total);
        agg.timed_out_rate = percent(agg.timed_out, agg.total);

        agg
    }

    /// Rolled-up counters of this run for the history window
    pub fn run_summary(&self, generated_at: DateTime<Utc>) -> RunSummary {
        RunSummary {
            total: self.total,
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
            flaky: self.flaky,
            timed_out: self.timed_out,
            duration_ms: self.total_duration_ms,
            pass_rate: self.pass_rate,
            generated_at: Some(generated_at),
        }
    }
}

/// Up to `n` records by duration descending; ties keep encounter order
pub fn top_by_duration<'a, I>(records: I, n: usize) -> Vec<&'a TestRecord>
where
    I: IntoIterator<Item = &'a TestRecord>,
{
    let mut ranked: Vec<&TestRecord> = records.into_iter().collect();
    ranked.sort_by_key(|r| Reverse(r.duration_ms));
    ranked.truncate(n);
    ranked
}

pub fn slowest_tests(records: &[TestRecord]) -> Vec<&TestRecord> {
    top_by_duration(records, TOP_N)
}

/// Failed and timed-out tests
pub fn failed_tests(records: &[TestRecord]) -> Vec<&TestRecord> {
    top_by_duration(records.iter().filter(|r| r.status.is_failure()), TOP_N)
}

pub fn flaky_tests(records: &[TestRecord]) -> Vec<&TestRecord> {
    top_by_duration(records.iter().filter(|r| r.is_flaky()), TOP_N)
}
