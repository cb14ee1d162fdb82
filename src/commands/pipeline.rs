//! Report loading and the analyze-then-assemble pipeline shared by commands

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::commands::dispatch::macros::trace_command;
use crate::commands::dispatch::CommandContext;
use runlens_core::analysis::analyze;
use runlens_core::error::{Result, RunlensError};
use runlens_core::history::HistoryStore;
use runlens_core::payload::{build_payload, Payload, PayloadOptions};
use runlens_core::report::{parse_report, Report};

/// Whether the current run is written back to the history file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Update,
    ReadOnly,
}

/// Read and validate a report file
pub fn load_report(path: &Path) -> Result<Report> {
    if !path.exists() {
        return Err(RunlensError::not_found("report", path.display()));
    }
    let text = fs::read_to_string(path)
        .map_err(|e| RunlensError::io_operation("read report", path.display(), e))?;
    parse_report(&text)
}

/// Analyze a report against the history window and assemble the payload.
///
/// Without a history file the window holds only the current run.
pub fn run_pipeline(
    ctx: &CommandContext,
    report_path: &Path,
    history_path: Option<&Path>,
    mode: HistoryMode,
    title: String,
) -> Result<Payload> {
    let report = load_report(report_path)?;
    trace_command!(ctx.cli, ctx.start, "load_report");

    let analysis = analyze(&report);
    trace_command!(ctx.cli, ctx.start, "analyze");

    let generated_at = Utc::now();
    let summary = analysis.run_summary(generated_at);

    let window = match history_path {
        Some(path) => {
            let mut store = HistoryStore::load(path, ctx.config.history.max_entries)?;
            store.append(summary);
            if mode == HistoryMode::Update {
                store.save()?;
                info!(
                    path = %store.path().display(),
                    entries = store.window().len(),
                    "history updated"
                );
            }
            store.window().to_vec()
        }
        None => vec![summary],
    };

    let payload = build_payload(
        &analysis,
        &window,
        &PayloadOptions {
            title,
            generated_at,
        },
    );
    trace_command!(ctx.cli, ctx.start, "build_payload");

    Ok(payload)
}
