//! `runlens validate` command - structural check of a report

use runlens_core::error::Result;
use runlens_core::flatten::flatten;

use crate::cli::commands::ValidateArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::print_json;
use crate::commands::pipeline::load_report;
use crate::output_by_format_result;

/// Execute the validate command; an invalid report surfaces as an error
pub fn execute(ctx: &CommandContext, args: &ValidateArgs) -> Result<()> {
    let report = load_report(&args.report)?;
    let flat = flatten(&report);
    let tests = flat.records.len();

    output_by_format_result!(ctx.cli.format,
        json => print_json(&serde_json::json!({
            "valid": true,
            "report": args.report.display().to_string(),
            "tests": tests,
            "suites": flat.suites.len(),
            "unscorable": flat.unscorable,
        })),
        human => {
            if !ctx.cli.quiet {
                println!(
                    "Report is valid: {} tests in {} suites",
                    tests,
                    flat.suites.len()
                );
                if flat.unscorable > 0 {
                    println!("  {} tests have no attempts and are ignored", flat.unscorable);
                }
            }
        },
        records => {
            println!(
                "H runlens=1 mode=validate report={} valid=true tests={} suites={} unscorable={}",
                args.report.display(),
                tests,
                flat.suites.len(),
                flat.unscorable
            );
        }
    )
}
