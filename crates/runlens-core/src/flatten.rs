//! Tree flattening
//!
//! Walks the suite tree depth-first with an explicit worklist, threading the
//! ambient suite title downward, and emits one [`TestRecord`] per scorable
//! test in document order.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::record::{non_empty, TestRecord, TestStatus, UNNAMED_TEST};
use crate::report::{AttemptResult, Report, SpecNode, SuiteNode, TestNode};

/// Flat view of a report
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedReport {
    pub records: Vec<TestRecord>,
    /// Distinct suite grouping labels
    pub suites: BTreeSet<String>,
    /// Distinct execution-variant labels
    pub browsers: BTreeSet<String>,
    /// Tests dropped because they had no attempts
    #[serde(skip)]
    pub unscorable: usize,
}

/// Flatten a validated report into test records
pub fn flatten(report: &Report) -> FlattenedReport {
    let mut out = FlattenedReport::default();
    let mut pending: Vec<(&SuiteNode, Option<&str>)> =
        report.suites.iter().rev().map(|s| (s, None)).collect();

    while let Some((suite, inherited)) = pending.pop() {
        let ambient = non_empty(suite.title.as_deref()).or(inherited);

        for spec in &suite.specs {
            flatten_spec(spec, ambient, &mut out);
        }

        pending.extend(suite.suites.iter().rev().map(|child| (child, ambient)));
    }

    debug!(
        records = out.records.len(),
        suites = out.suites.len(),
        browsers = out.browsers.len(),
        unscorable = out.unscorable,
        "flatten"
    );

    out
}

fn flatten_spec(spec: &SpecNode, ambient: Option<&str>, out: &mut FlattenedReport) {
    for test in &spec.tests {
        let Some(record) = build_record(spec, test, ambient) else {
            out.unscorable += 1;
            continue;
        };

        out.suites.insert(record.suite_label().to_string());
        if let Some(browser) = &record.browser {
            out.browsers.insert(browser.clone());
        }
        out.records.push(record);
    }
}

/// Resolve one test into a record; `None` when it has no attempts
fn build_record(spec: &SpecNode, test: &TestNode, ambient: Option<&str>) -> Option<TestRecord> {
    let last = test.results.last()?;

    let title = non_empty(spec.title.as_deref())
        .or(non_empty(test.title.as_deref()))
        .unwrap_or(UNNAMED_TEST);

    let mut record = TestRecord::new(
        title,
        TestStatus::from_report(last.status.as_deref()),
        duration_ms(last.duration),
    );
    record.retries = u32::try_from(test.results.len() - 1).unwrap_or(u32::MAX);
    record.browser = non_empty(test.project_name.as_deref()).map(str::to_string);
    record.suite = ambient.map(str::to_string);
    record.file = non_empty(spec.file.as_deref())
        .or(non_empty(test.file.as_deref()))
        .map(str::to_string);
    record.line = spec.line.or(test.line);
    record.column = spec.column.or(test.column);

    if let Some(error) = last.primary_error() {
        record.error_message = error.message.clone();
        record.error_stack = error.stack.clone();
    }
    record.steps = steps_from_output(last);

    Some(record)
}

/// Non-negative whole milliseconds; missing or non-finite durations are 0
fn duration_ms(raw: Option<f64>) -> u64 {
    match raw {
        Some(ms) if ms.is_finite() && ms > 0.0 => ms.round() as u64,
        _ => 0,
    }
}

/// Trimmed, non-empty lines of the attempt's captured output
fn steps_from_output(attempt: &AttemptResult) -> Option<Vec<String>> {
    let steps: Vec<String> = attempt
        .stdout
        .iter()
        .filter_map(|chunk| chunk.text())
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    (!steps.is_empty()).then_some(steps)
}
