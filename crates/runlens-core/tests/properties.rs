//! Property-based tests for the analytics core.
//!
//! Covers:
//! - Status counts and duration buckets partition the record set
//! - Percentile monotonicity and the single-element case
//! - Every composite score and file risk score stays in [0, 100]
//! - Failures always block the release gate
//! - A one-run history window has no baseline

use proptest::prelude::*;

use runlens_core::aggregate::Aggregates;
use runlens_core::record::{TestRecord, TestStatus};
use runlens_core::rollup::Rollups;
use runlens_core::score::{nearest_rank, Insights, Percentiles, ReleaseGate};
use runlens_core::trend::{RunSummary, TrendContext};

// =============================================================================
// Strategies
// =============================================================================

fn arb_status() -> impl Strategy<Value = TestStatus> {
    prop_oneof![
        4 => Just(TestStatus::Passed),
        2 => Just(TestStatus::Failed),
        1 => Just(TestStatus::Skipped),
        1 => Just(TestStatus::TimedOut),
        1 => Just(TestStatus::Interrupted),
        1 => Just(TestStatus::Unknown),
    ]
}

fn arb_record() -> impl Strategy<Value = TestRecord> {
    (
        "[a-z ]{1,12}",
        arb_status(),
        prop_oneof![Just(0_u64), 0_u64..120_000],
        0_u32..4,
        proptest::option::of(prop_oneof![Just("chromium"), Just("firefox"), Just("webkit")]),
        proptest::option::of("[a-z]{1,6}\\.spec\\.ts"),
    )
        .prop_map(|(title, status, duration_ms, retries, browser, file)| {
            let mut record = TestRecord::new(title, status, duration_ms);
            record.retries = retries;
            record.browser = browser.map(str::to_string);
            record.file = file;
            record
        })
}

fn arb_records() -> impl Strategy<Value = Vec<TestRecord>> {
    prop::collection::vec(arb_record(), 0..60)
}

fn arb_summary() -> impl Strategy<Value = RunSummary> {
    (0_usize..500, 0.0_f64..=100.0, 0_u64..600_000).prop_map(|(total, pass_rate, duration_ms)| {
        RunSummary {
            total,
            passed: total / 2,
            failed: total / 4,
            flaky: total / 10,
            duration_ms,
            pass_rate,
            ..Default::default()
        }
    })
}

fn insights_for(records: &[TestRecord], duration_delta_ms: Option<i64>) -> Insights {
    let agg = Aggregates::compute(records);
    let pct = Percentiles::from_durations(records.iter().map(|r| r.duration_ms));
    Insights::compute(&agg, &pct, duration_delta_ms)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn status_counts_partition_total(records in arb_records()) {
        let agg = Aggregates::compute(&records);
        let known = agg.passed + agg.failed + agg.skipped;
        prop_assert!(known <= agg.total);

        let other = records
            .iter()
            .filter(|r| !matches!(r.status, TestStatus::Passed | TestStatus::Failed | TestStatus::Skipped))
            .count();
        prop_assert_eq!(agg.total - known, other);
    }

    #[test]
    fn duration_buckets_partition_total(records in arb_records()) {
        let agg = Aggregates::compute(&records);
        prop_assert_eq!(agg.duration_buckets.total(), agg.total);
        prop_assert_eq!(agg.retries_histogram.values().sum::<usize>(), agg.total);
    }

    #[test]
    fn duration_buckets_with_zero_durations(count in 0_usize..40) {
        let records: Vec<_> = (0..count)
            .map(|i| TestRecord::new(format!("t{i}"), TestStatus::Passed, 0))
            .collect();
        let agg = Aggregates::compute(&records);
        prop_assert_eq!(agg.duration_buckets.fast, count);
        prop_assert_eq!(agg.duration_buckets.total(), count);
    }

    #[test]
    fn percentiles_are_monotonic(values in prop::collection::vec(0_u64..1_000_000, 1..200)) {
        let pct = Percentiles::from_durations(values.iter().copied());
        prop_assert!(pct.p50 <= pct.p90);
        prop_assert!(pct.p90 <= pct.p95);
        prop_assert!(pct.p95 <= *values.iter().max().unwrap());
    }

    #[test]
    fn single_element_percentiles_equal_it(value in 0_u64..1_000_000) {
        let pct = Percentiles::from_durations([value]);
        prop_assert_eq!(pct.p50, value);
        prop_assert_eq!(pct.p90, value);
        prop_assert_eq!(pct.p95, value);
        prop_assert_eq!(nearest_rank(&[value], 0.0), value);
    }

    #[test]
    fn scores_stay_in_range(records in arb_records(), delta in proptest::option::of(-600_000_i64..600_000)) {
        let insights = insights_for(&records, delta);
        for score in [
            insights.quality_score,
            insights.stability_score,
            insights.speed_score,
            insights.retry_health,
            insights.retry_rate,
            insights.effective_pass_rate,
        ] {
            prop_assert!(score <= 100);
        }

        let pct = Percentiles::from_durations(records.iter().map(|r| r.duration_ms));
        for file in Rollups::compute(&records, pct.p95).files {
            prop_assert!(file.risk_score <= 100);
        }
    }

    #[test]
    fn failures_always_block(records in arb_records(), delta in proptest::option::of(-600_000_i64..600_000)) {
        let agg = Aggregates::compute(&records);
        let insights = insights_for(&records, delta);
        if agg.failed > 0 || agg.timed_out > 0 {
            prop_assert_eq!(insights.release_gate, ReleaseGate::Blocked);
        } else {
            prop_assert_ne!(insights.release_gate, ReleaseGate::Blocked);
        }
    }

    #[test]
    fn pathological_sets_stay_in_range(count in 1_usize..50, status in arb_status(), retries in 0_u32..3) {
        let records: Vec<_> = (0..count)
            .map(|i| {
                let mut record = TestRecord::new(format!("t{i}"), status, 30_000);
                record.retries = retries;
                record
            })
            .collect();
        let insights = insights_for(&records, None);
        prop_assert!(insights.quality_score <= 100);
        prop_assert!(insights.stability_score <= 100);
    }

    #[test]
    fn one_entry_window_has_no_baseline(run in arb_summary()) {
        let trend = TrendContext::build(&[run]);
        let cmp = trend.comparison;
        prop_assert!(!cmp.has_baseline);
        prop_assert_eq!(cmp.pass_rate_delta, 0.0);
        prop_assert_eq!(cmp.failed_delta, 0);
        prop_assert_eq!(cmp.flaky_rate_delta, 0.0);
        prop_assert_eq!(cmp.duration_delta_sec, 0);
        prop_assert_eq!(trend.points.len(), 1);
    }

    #[test]
    fn comparison_uses_last_two_entries(runs in prop::collection::vec(arb_summary(), 2..20)) {
        let trend = TrendContext::build(&runs);
        let previous = &runs[runs.len() - 2];
        let latest = &runs[runs.len() - 1];
        prop_assert!(trend.comparison.has_baseline);
        prop_assert_eq!(
            trend.comparison.failed_delta,
            latest.failed as i64 - previous.failed as i64
        );
        prop_assert_eq!(trend.series.labels.len(), runs.len());
    }

    #[test]
    fn test_id_is_short_hex(record in arb_record()) {
        let id = record.test_id();
        prop_assert_eq!(id.len(), 12);
        prop_assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
