//! `runlens trend` command - inspect a history window

use runlens_core::bail_usage;
use runlens_core::error::{Result, RunlensError};
use runlens_core::history::HistoryStore;
use runlens_core::trend::TrendContext;

use crate::cli::commands::TrendArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{describe_comparison, print_json, records};
use crate::output_by_format_result;

/// Execute the trend command
pub fn execute(ctx: &CommandContext, args: &TrendArgs) -> Result<()> {
    let Some(path) = ctx.history_path(args.history.as_deref()) else {
        bail_usage!("no history file given (use --history or set [history] path in the config)");
    };
    if !path.exists() {
        return Err(RunlensError::not_found("history file", path.display()));
    }

    let store = HistoryStore::load(&path, ctx.config.history.max_entries)?;
    let trend = TrendContext::build(store.window());

    output_by_format_result!(ctx.cli.format,
        json => print_json(&trend),
        human => {
            if !ctx.cli.quiet {
                println!("{} runs in {}", trend.points.len(), path.display());
                for point in &trend.points {
                    println!(
                        "  {:<14} {:>5} tests  pass {:>5.1}%  failed {:>3}  flaky {:>4.1}%  {:>7.1}s",
                        point.label,
                        point.total,
                        point.pass_rate,
                        point.failed,
                        point.flaky_rate,
                        point.duration_sec
                    );
                }
                println!();
                println!("Latest: {}", describe_comparison(&trend.comparison));
            }
        },
        records => {
            println!(
                "H runlens=1 mode=trend history={} runs={}",
                path.display(),
                trend.points.len()
            );
            for point in &trend.points {
                println!(
                    "R label=\"{}\" total={} passed={} failed={} flaky={} pass_rate={:.1} flaky_rate={:.1} duration_sec={:.1}",
                    point.label,
                    point.total,
                    point.passed,
                    point.failed,
                    point.flaky,
                    point.pass_rate,
                    point.flaky_rate,
                    point.duration_sec
                );
            }
            println!("{}", records::trend_line(&trend.comparison));
        }
    )
}
