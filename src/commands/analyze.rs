//! `runlens analyze` command - full analysis with history update

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cli::commands::AnalyzeArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{describe_comparison, headline, print_json, records};
use crate::commands::pipeline::{run_pipeline, HistoryMode};
use crate::output_by_format_result;
use runlens_core::error::{Result, RunlensError};
use runlens_core::payload::{format_duration, Payload, TestRow};

/// Execute the analyze command
pub fn execute(ctx: &CommandContext, args: &AnalyzeArgs) -> Result<()> {
    let mode = if args.no_history_update {
        HistoryMode::ReadOnly
    } else {
        HistoryMode::Update
    };
    let history = ctx.history_path(args.history.as_deref());

    let payload = run_pipeline(
        ctx,
        &args.report,
        history.as_deref(),
        mode,
        ctx.title(args.title.as_deref()),
    )?;

    if let Some(output) = &args.output {
        write_payload(output, &payload)?;
    }

    output_by_format_result!(ctx.cli.format,
        json => print_json(&payload),
        human => {
            if !ctx.cli.quiet {
                print_human(&payload);
            }
        },
        records => {
            for line in records::payload_lines("analyze", &args.report, &payload) {
                println!("{line}");
            }
        }
    )
}

fn write_payload(path: &Path, payload: &Payload) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| RunlensError::io_operation("create directory", parent.display(), e))?;
    }
    let content = serde_json::to_string_pretty(payload)?;
    fs::write(path, content)
        .map_err(|e| RunlensError::io_operation("write payload", path.display(), e))?;
    debug!(path = %path.display(), "payload written");
    Ok(())
}

fn print_human(payload: &Payload) {
    let s = &payload.summary;
    let i = &payload.insights;

    println!("{}", payload.meta.title);
    println!(
        "  {} tests: {} passed, {} failed, {} timed out, {} skipped ({} flaky)",
        s.total, s.passed, s.failed, s.timed_out, s.skipped, s.flaky
    );
    println!(
        "  Pass rate {:.1}%  Duration {}  p50 {}  p95 {}",
        s.pass_rate,
        format_duration(s.total_duration_ms),
        format_duration(i.p50),
        format_duration(i.p95)
    );
    println!(
        "  Quality {}  Stability {}  Speed {}  Retry health {}  Risk {}",
        i.quality_score, i.stability_score, i.speed_score, i.retry_health, i.risk_level
    );
    println!("  Release gate: {}", i.release_gate);

    print_rows("Failed", &payload.lists.failed);
    print_rows("Flaky", &payload.lists.flaky);

    if !payload.lists.slowest.is_empty() {
        println!();
        println!("Slowest:");
        for row in payload.lists.slowest.iter().take(5) {
            println!("  {:>8}  {}", row.duration_text, row.record.title);
        }
    }

    println!();
    println!("Trend: {}", describe_comparison(&payload.trend.comparison));
}

fn print_rows(heading: &str, rows: &[TestRow]) {
    if rows.is_empty() {
        return;
    }
    println!();
    println!("{heading}:");
    for row in rows {
        let record = &row.record;
        let location = match (&record.file, record.line) {
            (Some(file), Some(line)) => format!(" {file}:{line}"),
            (Some(file), None) => format!(" {file}"),
            _ => String::new(),
        };
        println!(
            "  [{}] {} ({}, {} retries){}",
            record.browser_label(),
            record.title,
            row.duration_text,
            record.retries,
            location
        );
        if let Some(message) = &record.error_message {
            let line = headline(message);
            if !line.is_empty() {
                println!("      {line}");
            }
        }
    }
}
