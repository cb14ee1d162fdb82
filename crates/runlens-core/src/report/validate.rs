//! Structural validation of a raw report document
//!
//! Runs on the untyped JSON value before any typing or flattening so that a
//! malformed node is reported with its path instead of failing mid-walk.

use serde_json::{Map, Value};

use crate::bail_invalid;
use crate::error::Result;

/// Check the suite/spec shape of a report document.
///
/// The root must be an object with a `suites` array. Every suite node must be
/// an object whose `specs` (if present) is an array of objects each carrying
/// a `tests` array, and whose `suites` (if present) is an array of suite
/// nodes. A suite with neither key is valid and empty.
pub fn validate_structure(root: &Value) -> Result<()> {
    let Some(root_obj) = root.as_object() else {
        bail_invalid!("$", "report root must be an object");
    };

    let mut pending: Vec<(String, &Value)> = Vec::new();
    push_suites(root_obj, "suites", true, &mut pending)?;

    while let Some((path, node)) = pending.pop() {
        let Some(suite) = node.as_object() else {
            bail_invalid!(path, "suite must be an object");
        };

        if let Some(specs) = suite.get("specs") {
            validate_specs(&format!("{path}.specs"), specs)?;
        }

        push_suites(suite, &format!("{path}.suites"), false, &mut pending)?;
    }

    Ok(())
}

fn push_suites<'a>(
    parent: &'a Map<String, Value>,
    path: &str,
    required: bool,
    pending: &mut Vec<(String, &'a Value)>,
) -> Result<()> {
    match parent.get("suites") {
        Some(Value::Array(children)) => {
            for (index, child) in children.iter().enumerate().rev() {
                pending.push((format!("{path}[{index}]"), child));
            }
            Ok(())
        }
        Some(_) => bail_invalid!(path, "suites must be an array"),
        None if required => bail_invalid!(path, "missing suites array"),
        None => Ok(()),
    }
}

fn validate_specs(path: &str, specs: &Value) -> Result<()> {
    let Some(specs) = specs.as_array() else {
        bail_invalid!(path, "specs must be an array");
    };

    for (index, spec) in specs.iter().enumerate() {
        let spec_path = format!("{path}[{index}]");
        let Some(spec) = spec.as_object() else {
            bail_invalid!(spec_path, "spec must be an object");
        };

        let Some(tests) = spec.get("tests").and_then(Value::as_array) else {
            bail_invalid!(format!("{spec_path}.tests"), "spec must have a tests array");
        };

        for (test_index, test) in tests.iter().enumerate() {
            validate_test(&format!("{spec_path}.tests[{test_index}]"), test)?;
        }
    }

    Ok(())
}

fn validate_test(path: &str, test: &Value) -> Result<()> {
    let Some(test) = test.as_object() else {
        bail_invalid!(path, "test must be an object");
    };

    match test.get("results") {
        None => Ok(()),
        Some(Value::Array(results)) => {
            for (index, result) in results.iter().enumerate() {
                validate_attempt(&format!("{path}.results[{index}]"), result)?;
            }
            Ok(())
        }
        Some(_) => bail_invalid!(format!("{path}.results"), "results must be an array"),
    }
}

/// Status and duration feed every score, so a wrong type is a structural
/// error rather than a defaulted field.
fn validate_attempt(path: &str, result: &Value) -> Result<()> {
    let Some(result) = result.as_object() else {
        bail_invalid!(path, "attempt result must be an object");
    };

    match result.get("status") {
        None | Some(Value::Null | Value::String(_)) => {}
        Some(_) => bail_invalid!(format!("{path}.status"), "status must be a string"),
    }

    match result.get("duration") {
        None | Some(Value::Null | Value::Number(_)) => Ok(()),
        Some(_) => bail_invalid!(format!("{path}.duration"), "duration must be a number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunlensError;
    use serde_json::json;

    fn invalid_path(value: Value) -> String {
        match validate_structure(&value) {
            Err(RunlensError::InvalidReport { path, .. }) => path,
            other => panic!("expected invalid report, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_minimal_report() {
        assert!(validate_structure(&json!({ "suites": [] })).is_ok());
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert_eq!(invalid_path(json!([])), "$");
        assert_eq!(invalid_path(json!("report")), "$");
    }

    #[test]
    fn test_rejects_missing_suites() {
        assert_eq!(invalid_path(json!({ "config": {} })), "suites");
        assert_eq!(invalid_path(json!({ "suites": {} })), "suites");
    }

    #[test]
    fn test_empty_suite_is_valid() {
        let report = json!({ "suites": [ { "title": "empty" } ] });
        assert!(validate_structure(&report).is_ok());
    }

    #[test]
    fn test_spec_without_tests_is_invalid() {
        let report = json!({
            "suites": [ { "title": "a", "specs": [ { "title": "no tests" } ] } ]
        });
        assert_eq!(invalid_path(report), "suites[0].specs[0].tests");
    }

    #[test]
    fn test_reports_path_of_nested_node() {
        let report = json!({
            "suites": [
                { "title": "ok", "specs": [] },
                { "title": "outer", "suites": [ { "title": "inner" }, 42 ] }
            ]
        });
        assert_eq!(invalid_path(report), "suites[1].suites[1]");
    }

    #[test]
    fn test_rejects_non_object_attempt() {
        let report = json!({
            "suites": [ {
                "specs": [ { "title": "t", "tests": [ { "results": [ {}, "oops" ] } ] } ]
            } ]
        });
        assert_eq!(invalid_path(report), "suites[0].specs[0].tests[0].results[1]");
    }

    #[test]
    fn test_rejects_ill_typed_duration_with_path() {
        let report = json!({
            "suites": [ {
                "specs": [ { "title": "t", "tests": [ { "results": [
                    { "status": "passed", "duration": 12 },
                    { "status": "passed", "duration": "slow" }
                ] } ] } ]
            } ]
        });
        assert_eq!(
            invalid_path(report),
            "suites[0].specs[0].tests[0].results[1].duration"
        );
    }

    #[test]
    fn test_rejects_non_string_status_with_path() {
        let report = json!({
            "suites": [ {
                "specs": [ { "title": "t", "tests": [ { "results": [ { "status": 3 } ] } ] } ]
            } ]
        });
        assert_eq!(invalid_path(report), "suites[0].specs[0].tests[0].results[0].status");
    }

    #[test]
    fn test_first_invalid_node_in_document_order_wins() {
        let report = json!({
            "suites": [
                { "suites": [ { "specs": "bad" } ] },
                { "specs": "also bad" }
            ]
        });
        assert_eq!(invalid_path(report), "suites[0].suites[0].specs");
    }
}
