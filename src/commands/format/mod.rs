//! Shared output formatting helpers for commands

pub mod records;

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use runlens_core::error::Result;
use runlens_core::trend::TrendComparison;

/// Escape double quotes for embedding in a quoted records field
pub fn escape_quotes(s: &str) -> String {
    s.replace('"', r#"\""#)
}

static ANSI_ESCAPE: OnceLock<Option<Regex>> = OnceLock::new();

fn ansi_escape() -> Option<&'static Regex> {
    ANSI_ESCAPE
        .get_or_init(|| match Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]") {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(error = %e, "Failed to compile ANSI escape regex");
                None
            }
        })
        .as_ref()
}

/// Remove terminal color sequences that reporters embed in error messages
pub fn strip_ansi(text: &str) -> String {
    match ansi_escape() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// First non-empty line of a message, without color codes
pub fn headline(message: &str) -> String {
    let plain = strip_ansi(message);
    plain
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line description of the run-over-run comparison
pub fn describe_comparison(cmp: &TrendComparison) -> String {
    if !cmp.has_baseline {
        return "no previous run to compare against".to_string();
    }
    format!(
        "pass rate {:+.1}, failed {:+}, flaky rate {:+.1}, duration {:+}s",
        cmp.pass_rate_delta, cmp.failed_delta, cmp.flaky_rate_delta, cmp.duration_delta_sec
    )
}
