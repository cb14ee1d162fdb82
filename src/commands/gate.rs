//! `runlens gate` command - release gate for CI pipelines

use tracing::info;

use crate::cli::commands::GateArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{describe_comparison, print_json, records};
use crate::commands::pipeline::{run_pipeline, HistoryMode};
use crate::output_by_format_result;
use runlens_core::error::{Result, RunlensError};
use runlens_core::score::ReleaseGate;

/// Execute the gate command. The history is read but never written.
pub fn execute(ctx: &CommandContext, args: &GateArgs) -> Result<()> {
    let history = ctx.history_path(args.history.as_deref());
    let payload = run_pipeline(
        ctx,
        &args.report,
        history.as_deref(),
        HistoryMode::ReadOnly,
        ctx.title(None),
    )?;

    let insights = &payload.insights;
    let gate = insights.release_gate;
    let passes = gate_passes(gate, args.strict);

    output_by_format_result!(ctx.cli.format,
        json => print_json(&serde_json::json!({
            "gate": gate,
            "passed": passes,
            "strict": args.strict,
            "insights": insights.notification_digest(),
            "failed": payload.summary.failed,
            "timedOut": payload.summary.timed_out,
            "flakyRate": payload.summary.flaky_rate,
            "comparison": payload.trend.comparison,
        })),
        human => {
            if !ctx.cli.quiet {
                println!("Release gate: {gate}");
                println!(
                    "  {} failed, {} timed out, flaky rate {:.1}%",
                    payload.summary.failed, payload.summary.timed_out, payload.summary.flaky_rate
                );
                println!("  Quality {}  Risk {}", insights.quality_score, insights.risk_level);
                println!("  Trend: {}", describe_comparison(&payload.trend.comparison));
            }
        },
        records => {
            println!("{}", records::header_line("gate", &args.report, &payload));
            println!("{}", records::summary_line(&payload));
            println!("{}", records::trend_line(&payload.trend.comparison));
        }
    )?;

    info!(gate = %gate, strict = args.strict, passes, "release gate evaluated");

    if passes {
        Ok(())
    } else {
        Err(RunlensError::GateFailed {
            gate: gate.to_string(),
        })
    }
}

fn gate_passes(gate: ReleaseGate, strict: bool) -> bool {
    match gate {
        ReleaseGate::Ready => true,
        ReleaseGate::Risky => !strict,
        ReleaseGate::Blocked => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_passes() {
        assert!(gate_passes(ReleaseGate::Ready, true));
        assert!(gate_passes(ReleaseGate::Risky, false));
        assert!(!gate_passes(ReleaseGate::Risky, true));
        assert!(!gate_passes(ReleaseGate::Blocked, false));
    }
}
