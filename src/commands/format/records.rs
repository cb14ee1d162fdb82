//! Records output: one space-separated `key=value` line per fact, prefixed
//! by a line type (H header, S summary, I insights, F test, T trend).

use std::path::Path;

use runlens_core::payload::{Payload, TestRow};
use runlens_core::trend::TrendComparison;

use super::escape_quotes;

pub fn header_line(mode: &str, report: &Path, payload: &Payload) -> String {
    format!(
        "H runlens=1 mode={} report={} gate={} risk={}",
        mode,
        report.display(),
        payload.insights.release_gate,
        payload.insights.risk_level
    )
}

pub fn summary_line(payload: &Payload) -> String {
    let s = &payload.summary;
    format!(
        "S total={} passed={} failed={} skipped={} timed_out={} flaky={} retried={} pass_rate={:.1} duration_ms={}",
        s.total,
        s.passed,
        s.failed,
        s.skipped,
        s.timed_out,
        s.flaky,
        s.retried,
        s.pass_rate,
        s.total_duration_ms
    )
}

pub fn insights_line(payload: &Payload) -> String {
    let i = &payload.insights;
    format!(
        "I quality={} stability={} speed={} retry_health={} retry_rate={} effective_pass_rate={} p50={} p90={} p95={}",
        i.quality_score,
        i.stability_score,
        i.speed_score,
        i.retry_health,
        i.retry_rate,
        i.effective_pass_rate,
        i.p50,
        i.p90,
        i.p95
    )
}

/// `F` line of a listed test; `label` is the status or `flaky`
pub fn test_line(label: &str, row: &TestRow) -> String {
    format!(
        "F {} \"{}\" id={} duration={} retries={} browser={}",
        label,
        escape_quotes(&row.record.title),
        row.id,
        row.record.duration_ms,
        row.record.retries,
        row.record.browser_label()
    )
}

pub fn trend_line(cmp: &TrendComparison) -> String {
    format!(
        "T has_baseline={} pass_rate_delta={:.1} failed_delta={} flaky_rate_delta={:.1} duration_delta_sec={}",
        cmp.has_baseline,
        cmp.pass_rate_delta,
        cmp.failed_delta,
        cmp.flaky_rate_delta,
        cmp.duration_delta_sec
    )
}

/// All records lines of a payload
pub fn payload_lines(mode: &str, report: &Path, payload: &Payload) -> Vec<String> {
    let mut lines = vec![
        header_line(mode, report, payload),
        summary_line(payload),
        insights_line(payload),
    ];
    lines.extend(
        payload
            .lists
            .failed
            .iter()
            .map(|row| test_line(&row.record.status.to_string(), row)),
    );
    lines.extend(payload.lists.flaky.iter().map(|row| test_line("flaky", row)));
    lines.push(trend_line(&payload.trend.comparison));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlens_core::record::{TestRecord, TestStatus};

    #[test]
    fn test_test_line_escapes_title() {
        let mut record = TestRecord::new(r#"shows "empty" state"#, TestStatus::Failed, 1200);
        record.retries = 1;
        let row = TestRow::from_record(&record);

        let line = test_line("failed", &row);
        assert!(line.starts_with(r#"F failed "shows \"empty\" state" id="#));
        assert!(line.ends_with("duration=1200 retries=1 browser=unknown"));
    }

    #[test]
    fn test_trend_line_without_baseline() {
        assert_eq!(
            trend_line(&TrendComparison::default()),
            "T has_baseline=false pass_rate_delta=0.0 failed_delta=0 flaky_rate_delta=0.0 duration_delta_sec=0"
        );
    }
}
