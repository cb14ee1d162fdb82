#![allow(dead_code)]

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};

/// Get a Command for runlens, isolated from the user's config and log settings
pub fn runlens() -> Command {
    let mut cmd = cargo_bin_cmd!("runlens");
    cmd.env("RUNLENS_CONFIG_DIR", std::env::temp_dir().join("runlens-tests-no-config"))
        .env_remove("RUNLENS_CONFIG")
        .env_remove("RUNLENS_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Five tests: three passed (one of them flaky), one failed, one skipped
pub const MIXED_REPORT: &str = r#"{
  "stats": {"startTime": "2026-03-04T10:15:00.000Z", "duration": 6600},
  "suites": [{
    "title": "app.spec.ts",
    "file": "app.spec.ts",
    "specs": [
      {"title": "login", "file": "app.spec.ts", "line": 3, "tests": [
        {"projectName": "chromium", "results": [{"status": "passed", "duration": 800}]}]},
      {"title": "logout", "file": "app.spec.ts", "line": 9, "tests": [
        {"projectName": "chromium", "results": [
          {"status": "failed", "duration": 100},
          {"status": "passed", "duration": 1200}]}]},
      {"title": "profile", "file": "app.spec.ts", "line": 15, "tests": [
        {"projectName": "firefox", "results": [{"status": "passed", "duration": 600}]}]},
      {"title": "billing", "file": "app.spec.ts", "line": 21, "tests": [
        {"projectName": "firefox", "results": [{"status": "failed", "duration": 4000,
          "error": {"message": "\u001b[31mexpected\u001b[39m 3 to be 4", "stack": "at billing.ts:4"}}]}]},
      {"title": "admin", "file": "app.spec.ts", "line": 27, "tests": [
        {"projectName": "firefox", "results": [{"status": "skipped", "duration": 0}]}]}
    ]
  }]
}"#;

/// Three passing tests, no retries
pub const GREEN_REPORT: &str = r#"{
  "suites": [{
    "title": "smoke",
    "specs": [
      {"title": "home", "file": "smoke.spec.ts", "tests": [{"projectName": "chromium", "results": [{"status": "passed", "duration": 300}]}]},
      {"title": "search", "file": "smoke.spec.ts", "tests": [{"projectName": "chromium", "results": [{"status": "passed", "duration": 450}]}]},
      {"title": "about", "file": "smoke.spec.ts", "tests": [{"projectName": "chromium", "results": [{"status": "passed", "duration": 200}]}]}
    ]
  }]
}"#;

/// Two passing tests, one of which needed a retry (flaky rate 50%)
pub const FLAKY_REPORT: &str = r#"{
  "suites": [{
    "title": "cart",
    "specs": [
      {"title": "adds", "tests": [{"results": [{"status": "passed", "duration": 300}]}]},
      {"title": "totals", "tests": [{"results": [
        {"status": "timedOut", "duration": 30000},
        {"status": "passed", "duration": 500}]}]}
    ]
  }]
}"#;

/// `specs` is an object instead of an array in the second suite
pub const INVALID_REPORT: &str = r#"{"suites": [{"title": "ok", "specs": []}, {"title": "bad", "specs": {"title": "x"}}]}"#;

/// Write a fixture into `dir` and return its path
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Parse a command's stdout as JSON
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
