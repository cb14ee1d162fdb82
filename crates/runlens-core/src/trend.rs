//! Run-over-run trend comparison
//!
//! Works on a caller-supplied window of [`RunSummary`] ordered oldest to
//! newest. The window is only read, never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::percent;

const LABEL_FORMAT: &str = "%b %d %H:%M";

/// Rolled-up counters of one past run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub passed: usize,
    #[serde(default)]
    pub failed: usize,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub flaky: usize,
    #[serde(default)]
    pub timed_out: usize,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub pass_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn flaky_rate(&self) -> f64 {
        percent(self.flaky, self.total)
    }
}

/// One charted history point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub label: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub flaky: usize,
    pub pass_rate: f64,
    pub flaky_rate: f64,
    pub duration_sec: f64,
}

/// Deltas between the two most recent runs.
///
/// When `has_baseline` is false every delta is 0 and means nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendComparison {
    pub has_baseline: bool,
    pub pass_rate_delta: f64,
    pub failed_delta: i64,
    pub flaky_rate_delta: f64,
    pub duration_delta_sec: i64,
    #[serde(skip)]
    pub duration_delta_ms: i64,
}

impl TrendComparison {
    pub fn between(previous: &RunSummary, latest: &RunSummary) -> Self {
        let duration_delta_ms = latest.duration_ms as i64 - previous.duration_ms as i64;
        TrendComparison {
            has_baseline: true,
            pass_rate_delta: round1(latest.pass_rate - previous.pass_rate),
            failed_delta: latest.failed as i64 - previous.failed as i64,
            flaky_rate_delta: round1(latest.flaky_rate() - previous.flaky_rate()),
            duration_delta_sec: (duration_delta_ms as f64 / 1000.0).round() as i64,
            duration_delta_ms,
        }
    }

    /// Duration change against the previous run, when there is one
    pub fn baseline_duration_delta_ms(&self) -> Option<i64> {
        self.has_baseline.then_some(self.duration_delta_ms)
    }
}

/// Parallel arrays for charting the window
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub pass_rates: Vec<f64>,
    pub failed: Vec<usize>,
    pub flaky_rates: Vec<f64>,
    pub durations_sec: Vec<f64>,
}

/// Everything the rendering layer needs about the history window
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendContext {
    pub points: Vec<TrendPoint>,
    pub series: TrendSeries,
    pub comparison: TrendComparison,
}

impl TrendContext {
    pub fn build(window: &[RunSummary]) -> Self {
        let points: Vec<TrendPoint> = window
            .iter()
            .enumerate()
            .map(|(index, run)| trend_point(index, run))
            .collect();

        let series = TrendSeries {
            labels: points.iter().map(|p| p.label.clone()).collect(),
            pass_rates: points.iter().map(|p| p.pass_rate).collect(),
            failed: points.iter().map(|p| p.failed).collect(),
            flaky_rates: points.iter().map(|p| p.flaky_rate).collect(),
            durations_sec: points.iter().map(|p| p.duration_sec).collect(),
        };

        let comparison = match window {
            [.., previous, latest] => TrendComparison::between(previous, latest),
            _ => TrendComparison::default(),
        };

        TrendContext {
            points,
            series,
            comparison,
        }
    }
}

/// Chart label: timestamp when known, else the 1-based run position
pub fn point_label(index: usize, run: &RunSummary) -> String {
    match run.generated_at {
        Some(at) => at.format(LABEL_FORMAT).to_string(),
        None => format!("Run {}", index + 1),
    }
}

fn trend_point(index: usize, run: &RunSummary) -> TrendPoint {
    TrendPoint {
        label: point_label(index, run),
        total: run.total,
        passed: run.passed,
        failed: run.failed,
        flaky: run.flaky,
        pass_rate: round1(run.pass_rate),
        flaky_rate: round1(run.flaky_rate()),
        duration_sec: round1(run.duration_ms as f64 / 1000.0),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
