//! Normalized test records
//!
//! A [`TestRecord`] is the outcome of one test after retries are resolved.
//! All default-resolution rules for absent labels live here so consumers
//! never re-derive them.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Title used when neither the spec nor the test carries one
pub const UNNAMED_TEST: &str = "Unnamed test";
/// Suite label used when no suite title or file is known
pub const UNKNOWN_SUITE: &str = "Unknown Suite";
/// Browser label used when the test has no execution-variant label
pub const UNKNOWN_BROWSER: &str = "unknown";
/// File label used when no source file is known
pub const UNKNOWN_FILE: &str = "unknown-file";

const TEST_ID_LEN: usize = 12;

/// Final status of a test (status of its last attempt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    TimedOut,
    /// The run was cut short while the test was executing
    Interrupted,
    /// Missing or unrecognised status string
    Unknown,
}

impl TestStatus {
    /// Map a reporter status string; anything unrecognised is `Unknown`
    pub fn from_report(status: Option<&str>) -> Self {
        match status {
            Some("passed") => TestStatus::Passed,
            Some("failed") => TestStatus::Failed,
            Some("skipped") => TestStatus::Skipped,
            Some("timedOut") => TestStatus::TimedOut,
            Some("interrupted") => TestStatus::Interrupted,
            _ => TestStatus::Unknown,
        }
    }

    /// Failed or timed out
    pub fn is_failure(self) -> bool {
        matches!(self, TestStatus::Failed | TestStatus::TimedOut)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
            TestStatus::TimedOut => "timedOut",
            TestStatus::Interrupted => "interrupted",
            TestStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One test execution outcome after retries are resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub title: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    /// Attempts before the last one
    pub retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
}

impl TestRecord {
    /// Record with the given outcome and every optional field absent
    pub fn new(title: impl Into<String>, status: TestStatus, duration_ms: u64) -> Self {
        Self {
            title: title.into(),
            status,
            duration_ms,
            retries: 0,
            browser: None,
            suite: None,
            file: None,
            line: None,
            column: None,
            error_message: None,
            error_stack: None,
            steps: None,
        }
    }

    /// Passed on its last attempt after at least one retry.
    ///
    /// A test that retried and still failed is not flaky.
    pub fn is_flaky(&self) -> bool {
        self.retries > 0 && self.status == TestStatus::Passed
    }

    pub fn was_retried(&self) -> bool {
        self.retries > 0
    }

    /// Grouping label: ambient suite title, then file, then [`UNKNOWN_SUITE`]
    pub fn suite_label(&self) -> &str {
        self.suite
            .as_deref()
            .or(self.file.as_deref())
            .unwrap_or(UNKNOWN_SUITE)
    }

    pub fn browser_label(&self) -> &str {
        self.browser.as_deref().unwrap_or(UNKNOWN_BROWSER)
    }

    pub fn file_label(&self) -> &str {
        self.file.as_deref().unwrap_or(UNKNOWN_FILE)
    }

    /// Short stable identifier derived from file, suite, title and browser.
    ///
    /// Two runs of the same test in the same project share an id, which is
    /// as close to cross-run identity as a report allows.
    pub fn test_id(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            self.file_label(),
            self.suite_label(),
            self.title.as_str(),
            self.browser_label(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        let mut id = hex::encode(hasher.finalize());
        id.truncate(TEST_ID_LEN);
        id
    }
}

/// Treat empty or whitespace-only labels as absent
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
