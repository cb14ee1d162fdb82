//! Percentiles, composite scores, risk level and release gate
//!
//! Every weight and threshold is a named constant. Scores are compared across
//! runs, so the formulas must stay exactly as written here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::{percent, Aggregates};

/// p95 at or above this duration floors the speed score at 0
pub const SPEED_BUDGET_MS: f64 = 15_000.0;

pub const STABILITY_RETRY_WEIGHT: f64 = 0.55;
pub const STABILITY_FAIL_WEIGHT: f64 = 0.75;
pub const STABILITY_TIMEOUT_WEIGHT: f64 = 0.40;

pub const QUALITY_PASS_WEIGHT: f64 = 0.4;
pub const QUALITY_STABILITY_WEIGHT: f64 = 0.3;
pub const QUALITY_SPEED_WEIGHT: f64 = 0.2;
pub const QUALITY_RETRY_HEALTH_WEIGHT: f64 = 0.1;

pub const LOW_RISK_MIN_QUALITY: u32 = 85;
pub const MODERATE_RISK_MIN_QUALITY: u32 = 70;
pub const HIGH_RISK_MIN_QUALITY: u32 = 50;

/// Flaky rate (percent) at which the gate turns risky
pub const RISKY_FLAKY_RATE: f64 = 8.0;
/// Run-over-run duration growth (ms) beyond which the gate turns risky
pub const RISKY_DURATION_INCREASE_MS: i64 = 20_000;

/// Round to the nearest integer and clamp into `[0, 100]`; NaN becomes 0
pub fn round_clamp(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

/// Nearest-rank percentile of an ascending series; 0 for an empty series
pub fn nearest_rank(sorted: &[u64], p: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let n = sorted.len();
    let rank = ((p / 100.0) * n as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, n as i64 - 1) as usize;
    sorted[index]
}

/// Duration percentiles of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Percentiles {
    pub p50: u64,
    pub p90: u64,
    pub p95: u64,
}

impl Percentiles {
    pub fn from_durations(durations: impl IntoIterator<Item = u64>) -> Self {
        let mut sorted: Vec<u64> = durations.into_iter().collect();
        sorted.sort_unstable();
        Self {
            p50: nearest_rank(&sorted, 50.0),
            p90: nearest_rank(&sorted, 90.0),
            p95: nearest_rank(&sorted, 95.0),
        }
    }
}

pub fn retry_rate(retried: usize, total: usize) -> u32 {
    round_clamp(percent(retried, total))
}

pub fn retry_health(retry_rate: u32) -> u32 {
    100u32.saturating_sub(retry_rate)
}

pub fn speed_score(p95_ms: u64) -> u32 {
    round_clamp(100.0 - 100.0 * (p95_ms as f64 / SPEED_BUDGET_MS))
}

pub fn stability_score(retry_rate: u32, fail_rate: f64, timed_out_rate: f64) -> u32 {
    let penalty = STABILITY_RETRY_WEIGHT * f64::from(retry_rate)
        + STABILITY_FAIL_WEIGHT * fail_rate
        + STABILITY_TIMEOUT_WEIGHT * timed_out_rate;
    round_clamp(100.0 - penalty)
}

pub fn quality_score(pass_rate: f64, stability: u32, speed: u32, retry_health: u32) -> u32 {
    round_clamp(
        QUALITY_PASS_WEIGHT * pass_rate
            + QUALITY_STABILITY_WEIGHT * f64::from(stability)
            + QUALITY_SPEED_WEIGHT * f64::from(speed)
            + QUALITY_RETRY_HEALTH_WEIGHT * f64::from(retry_health),
    )
}

/// Passes that needed no retry, as a percentage of all tests
pub fn effective_pass_rate(passed: usize, flaky: usize, total: usize) -> u32 {
    round_clamp(percent(passed.saturating_sub(flaky), total))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_quality(quality: u32) -> Self {
        match quality {
            q if q >= LOW_RISK_MIN_QUALITY => RiskLevel::Low,
            q if q >= MODERATE_RISK_MIN_QUALITY => RiskLevel::Moderate,
            q if q >= HIGH_RISK_MIN_QUALITY => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        f.write_str(label)
    }
}

/// Release recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReleaseGate {
    Ready,
    Risky,
    Blocked,
}

impl ReleaseGate {
    /// Failures block outright; flakiness or a large slowdown against the
    /// previous run make the release risky.
    pub fn evaluate(
        failed: usize,
        timed_out: usize,
        flaky_rate: f64,
        duration_delta_ms: Option<i64>,
    ) -> Self {
        if failed > 0 || timed_out > 0 {
            return ReleaseGate::Blocked;
        }
        let slowed_down = duration_delta_ms.is_some_and(|d| d > RISKY_DURATION_INCREASE_MS);
        if flaky_rate >= RISKY_FLAKY_RATE || slowed_down {
            ReleaseGate::Risky
        } else {
            ReleaseGate::Ready
        }
    }
}

impl fmt::Display for ReleaseGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReleaseGate::Ready => "READY",
            ReleaseGate::Risky => "RISKY",
            ReleaseGate::Blocked => "BLOCKED",
        };
        f.write_str(label)
    }
}

/// Composite scores of one run; percentage fields are integers in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub quality_score: u32,
    pub stability_score: u32,
    pub speed_score: u32,
    pub retry_health: u32,
    pub retry_rate: u32,
    pub retry_burden: u64,
    pub p50: u64,
    pub p90: u64,
    pub p95: u64,
    pub effective_pass_rate: u32,
    pub risk_level: RiskLevel,
    pub release_gate: ReleaseGate,
}

/// The subset of [`Insights`] handed to outbound notification senders
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDigest {
    pub quality_score: u32,
    pub stability_score: u32,
    pub speed_score: u32,
    pub retry_health: u32,
    pub p95: u64,
    pub risk_level: RiskLevel,
    pub release_gate: ReleaseGate,
}

impl Insights {
    /// Derive all scores. `duration_delta_ms` is the run-over-run duration
    /// change when a previous run exists.
    pub fn compute(agg: &Aggregates, pct: &Percentiles, duration_delta_ms: Option<i64>) -> Self {
        let retry_rate = retry_rate(agg.retried, agg.total);
        let retry_health = retry_health(retry_rate);
        let speed = speed_score(pct.p95);
        let stability = stability_score(retry_rate, agg.fail_rate, agg.timed_out_rate);
        let quality = quality_score(agg.pass_rate, stability, speed, retry_health);

        Insights {
            quality_score: quality,
            stability_score: stability,
            speed_score: speed,
            retry_health,
            retry_rate,
            retry_burden: agg.retry_burden,
            p50: pct.p50,
            p90: pct.p90,
            p95: pct.p95,
            effective_pass_rate: effective_pass_rate(agg.passed, agg.flaky, agg.total),
            risk_level: RiskLevel::from_quality(quality),
            release_gate: ReleaseGate::evaluate(
                agg.failed,
                agg.timed_out,
                agg.flaky_rate,
                duration_delta_ms,
            ),
        }
    }

    pub fn notification_digest(&self) -> NotificationDigest {
        NotificationDigest {
            quality_score: self.quality_score,
            stability_score: self.stability_score,
            speed_score: self.speed_score,
            retry_health: self.retry_health,
            p95: self.p95,
            risk_level: self.risk_level,
            release_gate: self.release_gate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{TestRecord, TestStatus};

    fn aggregates(spec: &[(TestStatus, u64, u32)]) -> Aggregates {
        let records: Vec<_> = spec
            .iter()
            .map(|&(status, duration, retries)| {
                let mut record = TestRecord::new("t", status, duration);
                record.retries = retries;
                record
            })
            .collect();
        Aggregates::compute(&records)
    }

    #[test]
    fn test_nearest_rank() {
        let sorted: Vec<u64> = (1..=10).collect();
        assert_eq!(nearest_rank(&sorted, 50.0), 5);
        assert_eq!(nearest_rank(&sorted, 90.0), 9);
        assert_eq!(nearest_rank(&sorted, 95.0), 10);
        assert_eq!(nearest_rank(&sorted, 0.0), 1);
        assert_eq!(nearest_rank(&[], 95.0), 0);
    }

    #[test]
    fn test_single_element_percentiles_are_equal() {
        let pct = Percentiles::from_durations([420]);
        assert_eq!(pct, Percentiles { p50: 420, p90: 420, p95: 420 });
    }

    #[test]
    fn test_percentiles_sort_input() {
        let pct = Percentiles::from_durations([30, 10, 20]);
        assert_eq!(pct.p50, 20);
        assert_eq!(Percentiles::from_durations([5, 5, 5, 1]).p90, 5);
    }

    #[test]
    fn test_speed_score() {
        assert_eq!(speed_score(0), 100);
        assert_eq!(speed_score(7_500), 50);
        assert_eq!(speed_score(15_000), 0);
        assert_eq!(speed_score(60_000), 0);
    }

    #[test]
    fn test_stability_score_weights() {
        // 100 - (0.55*10 + 0.75*10 + 0.40*5) = 100 - 15
        assert_eq!(stability_score(10, 10.0, 5.0), 85);
        assert_eq!(stability_score(100, 100.0, 100.0), 0);
        assert_eq!(stability_score(0, 0.0, 0.0), 100);
    }

    #[test]
    fn test_quality_score_weights() {
        // 0.4*90 + 0.3*80 + 0.2*70 + 0.1*60 = 36 + 24 + 14 + 6 = 80
        assert_eq!(quality_score(90.0, 80, 70, 60), 80);
        assert_eq!(quality_score(100.0, 100, 100, 100), 100);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_quality(85), RiskLevel::Low);
        assert_eq!(RiskLevel::from_quality(84), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_quality(70), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_quality(50), RiskLevel::High);
        assert_eq!(RiskLevel::from_quality(49), RiskLevel::Critical);
    }

    #[test]
    fn test_gate_blocks_on_any_failure() {
        assert_eq!(ReleaseGate::evaluate(1, 0, 0.0, None), ReleaseGate::Blocked);
        assert_eq!(ReleaseGate::evaluate(0, 1, 0.0, None), ReleaseGate::Blocked);
    }

    #[test]
    fn test_gate_risky_conditions() {
        assert_eq!(ReleaseGate::evaluate(0, 0, 8.0, None), ReleaseGate::Risky);
        assert_eq!(ReleaseGate::evaluate(0, 0, 7.9, None), ReleaseGate::Ready);
        assert_eq!(
            ReleaseGate::evaluate(0, 0, 0.0, Some(20_001)),
            ReleaseGate::Risky
        );
        assert_eq!(
            ReleaseGate::evaluate(0, 0, 0.0, Some(20_000)),
            ReleaseGate::Ready
        );
        assert_eq!(
            ReleaseGate::evaluate(0, 0, 0.0, Some(-60_000)),
            ReleaseGate::Ready
        );
    }

    #[test]
    fn test_gate_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ReleaseGate::Blocked).unwrap(),
            "\"BLOCKED\""
        );
        assert_eq!(ReleaseGate::Risky.to_string(), "RISKY");
    }

    #[test]
    fn test_insights_for_empty_run() {
        let agg = Aggregates::default();
        let insights = Insights::compute(&agg, &Percentiles::default(), None);
        assert_eq!(insights.retry_rate, 0);
        assert_eq!(insights.retry_health, 100);
        assert_eq!(insights.speed_score, 100);
        assert_eq!(insights.stability_score, 100);
        // 0.4*0 + 0.3*100 + 0.2*100 + 0.1*100
        assert_eq!(insights.quality_score, 60);
        assert_eq!(insights.effective_pass_rate, 0);
        assert_eq!(insights.release_gate, ReleaseGate::Ready);
    }

    #[test]
    fn test_insights_mixed_run() {
        let agg = aggregates(&[
            (TestStatus::Passed, 100, 0),
            (TestStatus::Passed, 200, 1),
            (TestStatus::Passed, 300, 0),
            (TestStatus::Failed, 400, 0),
            (TestStatus::Skipped, 0, 0),
        ]);
        let pct = Percentiles::from_durations([100, 200, 300, 400, 0]);
        let insights = Insights::compute(&agg, &pct, None);

        assert_eq!(insights.retry_rate, 20);
        assert_eq!(insights.retry_health, 80);
        assert_eq!(insights.p95, 400);
        // 100 - 100*(400/15000) = 97.33 -> 97
        assert_eq!(insights.speed_score, 97);
        // 100 - (0.55*20 + 0.75*20) = 74
        assert_eq!(insights.stability_score, 74);
        // 0.4*60 + 0.3*74 + 0.2*97 + 0.1*80 = 24 + 22.2 + 19.4 + 8 = 73.6 -> 74
        assert_eq!(insights.quality_score, 74);
        assert_eq!(insights.risk_level, RiskLevel::Moderate);
        assert_eq!(insights.effective_pass_rate, 40);
        assert_eq!(insights.release_gate, ReleaseGate::Blocked);
    }

    #[test]
    fn test_all_flaky_run() {
        let agg = aggregates(&[(TestStatus::Passed, 20_000, 2); 4]);
        let pct = Percentiles::from_durations([20_000; 4]);
        let insights = Insights::compute(&agg, &pct, None);

        assert_eq!(insights.retry_rate, 100);
        assert_eq!(insights.retry_health, 0);
        assert_eq!(insights.speed_score, 0);
        assert_eq!(insights.stability_score, 45);
        assert_eq!(insights.retry_burden, 8);
        assert_eq!(insights.effective_pass_rate, 0);
        assert_eq!(insights.release_gate, ReleaseGate::Risky);
    }

    #[test]
    fn test_notification_digest_subset() {
        let insights = Insights::compute(&Aggregates::default(), &Percentiles::default(), None);
        let digest = insights.notification_digest();
        assert_eq!(digest.quality_score, insights.quality_score);
        assert_eq!(digest.release_gate, insights.release_gate);
        let json = serde_json::to_value(digest).unwrap();
        assert!(json.get("retryBurden").is_none());
        assert!(json.get("releaseGate").is_some());
    }
}
