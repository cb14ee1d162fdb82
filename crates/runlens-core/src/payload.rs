//! Final payload assembly
//!
//! Second phase of the pipeline. Combines a [`ReportAnalysis`] with the
//! caller's history window into the single document the rendering layer
//! reads: counters, scores, chart series, ranked lists, rollups and trend.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{failed_tests, flaky_tests, slowest_tests, Aggregates};
use crate::analysis::ReportAnalysis;
use crate::record::TestRecord;
use crate::rollup::Rollups;
use crate::score::Insights;
use crate::trend::{RunSummary, TrendContext, TrendSeries};

/// Caller-owned inputs of the payload
#[derive(Debug, Clone)]
pub struct PayloadOptions {
    pub title: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMeta {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub version: String,
    pub suites: Vec<String>,
    pub browsers: Vec<String>,
}

/// One chart-ready series of parallel labels and values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut series = ChartSeries::default();
        for (label, value) in iter {
            series.push(label, value);
        }
        series
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub status_split: ChartSeries,
    pub duration_histogram: ChartSeries,
    pub retries_histogram: ChartSeries,
    pub performance_tiers: ChartSeries,
    pub quality_radar: ChartSeries,
    pub file_risk: ChartSeries,
    pub duration_hotspots: ChartSeries,
    pub browser_share: ChartSeries,
    pub suite_share: ChartSeries,
    pub run_trends: TrendSeries,
}

/// A test record as listed in the payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRow {
    pub id: String,
    #[serde(flatten)]
    pub record: TestRecord,
    pub flaky: bool,
    pub duration_text: String,
}

impl TestRow {
    pub fn from_record(record: &TestRecord) -> Self {
        TestRow {
            id: record.test_id(),
            flaky: record.is_flaky(),
            duration_text: format_duration(record.duration_ms),
            record: record.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedLists {
    pub failed: Vec<TestRow>,
    pub flaky: Vec<TestRow>,
    pub slowest: Vec<TestRow>,
    /// Every record in document order
    pub all: Vec<TestRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub meta: PayloadMeta,
    pub summary: Aggregates,
    pub insights: Insights,
    pub charts: Charts,
    pub lists: RankedLists,
    pub rollups: Rollups,
    /// The history window, oldest first
    pub history: Vec<RunSummary>,
    pub trend: TrendContext,
}

/// Assemble the payload. `window` is the caller's history ordered oldest
/// to newest, with the current run as its last entry.
pub fn build_payload(
    analysis: &ReportAnalysis,
    window: &[RunSummary],
    options: &PayloadOptions,
) -> Payload {
    let trend = TrendContext::build(window);
    let insights = Insights::compute(
        &analysis.aggregates,
        &analysis.percentiles,
        trend.comparison.baseline_duration_delta_ms(),
    );
    let records = analysis.records();

    let lists = RankedLists {
        failed: rows(failed_tests(records)),
        flaky: rows(flaky_tests(records)),
        slowest: rows(slowest_tests(records)),
        all: records.iter().map(TestRow::from_record).collect(),
    };

    let charts = build_charts(analysis, &insights, &trend);

    debug!(
        gate = %insights.release_gate,
        risk = %insights.risk_level,
        history = window.len(),
        "payload"
    );

    Payload {
        meta: PayloadMeta {
            title: options.title.clone(),
            generated_at: options.generated_at,
            started_at: analysis.started_at,
            version: env!("CARGO_PKG_VERSION").to_string(),
            suites: analysis.flattened.suites.iter().cloned().collect(),
            browsers: analysis.flattened.browsers.iter().cloned().collect(),
        },
        summary: analysis.aggregates.clone(),
        insights,
        charts,
        lists,
        rollups: analysis.rollups.clone(),
        history: window.to_vec(),
        trend,
    }
}

fn rows(records: Vec<&TestRecord>) -> Vec<TestRow> {
    records.into_iter().map(TestRow::from_record).collect()
}

fn build_charts(analysis: &ReportAnalysis, insights: &Insights, trend: &TrendContext) -> Charts {
    let agg = &analysis.aggregates;
    let rollups = &analysis.rollups;
    let buckets = &agg.duration_buckets;

    Charts {
        // Flaky tests are shown apart from clean passes
        status_split: [
            ("Passed", agg.passed.saturating_sub(agg.flaky)),
            ("Flaky", agg.flaky),
            ("Failed", agg.failed),
            ("Timed out", agg.timed_out),
            ("Skipped", agg.skipped),
        ]
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect(),
        duration_histogram: [
            ("< 1s", buckets.fast),
            ("1-5s", buckets.medium),
            ("5-15s", buckets.slow),
            ("> 15s", buckets.very_slow),
        ]
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect(),
        retries_histogram: agg
            .retries_histogram
            .iter()
            .map(|(&retries, &count)| (retries_label(retries), count as f64))
            .collect(),
        performance_tiers: [
            ("p50", insights.p50),
            ("p90", insights.p90),
            ("p95", insights.p95),
            ("max", agg.max_duration_ms),
        ]
        .into_iter()
        .map(|(label, ms)| (label, seconds(ms)))
        .collect(),
        quality_radar: [
            ("Pass rate", agg.pass_rate.round()),
            ("Stability", f64::from(insights.stability_score)),
            ("Speed", f64::from(insights.speed_score)),
            ("Retry health", f64::from(insights.retry_health)),
            ("Effective pass rate", f64::from(insights.effective_pass_rate)),
        ]
        .into_iter()
        .collect(),
        file_risk: rollups
            .files
            .iter()
            .map(|f| (f.stats.name.clone(), f64::from(f.risk_score)))
            .collect(),
        duration_hotspots: slowest_tests(analysis.records())
            .into_iter()
            .map(|r| (r.title.clone(), seconds(r.duration_ms)))
            .collect(),
        browser_share: rollups
            .browsers
            .iter()
            .map(|b| (b.name.clone(), b.total as f64))
            .collect(),
        suite_share: rollups
            .suites
            .iter()
            .map(|s| (s.name.clone(), s.total as f64))
            .collect(),
        run_trends: trend.series.clone(),
    }
}

fn retries_label(retries: u32) -> String {
    match retries {
        1 => "1 retry".to_string(),
        n => format!("{n} retries"),
    }
}

/// Milliseconds as seconds with one decimal
fn seconds(ms: u64) -> f64 {
    (ms as f64 / 100.0).round() / 10.0
}

/// Human-readable duration: `850ms`, `4.2s`, `2m 5s`
pub fn format_duration(ms: u64) -> String {
    match ms {
        0..=999 => format!("{ms}ms"),
        1_000..=59_999 => format!("{:.1}s", ms as f64 / 1000.0),
        _ => {
            let secs = ms / 1000;
            format!("{}m {}s", secs / 60, secs % 60)
        }
    }
}
