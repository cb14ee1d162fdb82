//! Input model of a hierarchical test-run report
//!
//! Every field is optional or defaulted: reports arrive partially populated
//! and the flattener resolves absent values through the fallback rules in
//! [`crate::record`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Root of a report document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub suites: Vec<SuiteNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ReportStats>,
}

/// Run-level statistics emitted by the reporter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    /// RFC 3339 start time of the run
    #[serde(default)]
    pub start_time: Option<String>,

    /// Wall-clock duration of the run in milliseconds
    #[serde(default)]
    pub duration: Option<f64>,
}

/// A suite: optionally titled, holding specs and/or nested suites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteNode {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub specs: Vec<SpecNode>,

    #[serde(default)]
    pub suites: Vec<SuiteNode>,
}

/// A spec: one declared test case, executed once per project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecNode {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub file: Option<String>,

    #[serde(default, deserialize_with = "lenient_position")]
    pub line: Option<u32>,

    #[serde(default, deserialize_with = "lenient_position")]
    pub column: Option<u32>,

    #[serde(default)]
    pub tests: Vec<TestNode>,
}

/// One execution variant of a spec (e.g. one browser project)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNode {
    #[serde(default)]
    pub title: Option<String>,

    /// Execution-variant label
    #[serde(default)]
    pub project_name: Option<String>,

    #[serde(default)]
    pub file: Option<String>,

    #[serde(default, deserialize_with = "lenient_position")]
    pub line: Option<u32>,

    #[serde(default, deserialize_with = "lenient_position")]
    pub column: Option<u32>,

    /// Attempts in execution order; the last one is authoritative
    #[serde(default)]
    pub results: Vec<AttemptResult>,
}

/// Outcome of one attempt of a test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    #[serde(default)]
    pub status: Option<String>,

    /// Milliseconds
    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(default)]
    pub error: Option<AttemptError>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub errors: Vec<AttemptError>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub stdout: Vec<OutputChunk>,
}

impl AttemptResult {
    /// Primary error of the attempt, falling back to the first listed error
    pub fn primary_error(&self) -> Option<&AttemptError> {
        self.error.as_ref().or_else(|| self.errors.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptError {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub stack: Option<String>,
}

/// Captured output: either a bare string or an object with a `text` field
/// (binary `buffer` chunks carry no text and are ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputChunk {
    Text(String),
    Entry {
        #[serde(default)]
        text: Option<String>,
    },
}

impl OutputChunk {
    pub fn text(&self) -> Option<&str> {
        match self {
            OutputChunk::Text(text) => Some(text),
            OutputChunk::Entry { text } => text.as_deref(),
        }
    }
}

/// Auxiliary list: `null` or a non-array reads as empty, and entries of the
/// wrong shape are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

/// Source position: anything but a non-negative integer in range reads as
/// absent.
fn lenient_position<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok()))
}
