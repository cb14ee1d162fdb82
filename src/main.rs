//! Runlens - test-run report analytics CLI
//!
//! Turns a hierarchical test report into counts, percentiles, composite
//! scores, rollups and run-over-run trends, and gates releases on them.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use runlens_core::error::{ExitCode as RunlensExitCode, RunlensError};
use runlens_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();
    let wants_json = argv_requests_json(env::args().skip(1));

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // CI wrappers that asked for JSON get the error envelope even when
        // parsing fails before `Cli.format` exists.
        Err(err) if wants_json && !is_informational(err.kind()) => {
            let error = usage_failure(&err);
            eprintln!("{}", error.to_json());
            return exit_with(error.exit_code());
        }
        Err(err) => err.exit(),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit_with(RunlensExitCode::Success),
        Err(e) => {
            report_failure(&cli, &e);
            exit_with(e.exit_code())
        }
    }
}

fn exit_with(code: RunlensExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}

/// Help and version output go through clap unchanged
fn is_informational(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn usage_failure(err: &clap::Error) -> RunlensError {
    match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument => RunlensError::UsageError(err.to_string()),
        _ => RunlensError::Other(err.to_string()),
    }
}

/// Errors go to stderr; stdout carries only command output
fn report_failure(cli: &Cli, error: &RunlensError) {
    if cli.format == OutputFormat::Json {
        eprintln!("{}", error.to_json());
    } else if !cli.quiet {
        eprintln!("error: {}", error);
    }
}

fn argv_requests_json(args: impl IntoIterator<Item = String>) -> bool {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" if args.next().is_some_and(|v| v == "json") => return true,
            "--format=json" => return true,
            _ => {}
        }
    }
    false
}
