//! CLI argument parsing for runlens
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json, --config

pub mod commands;
pub mod format;
pub mod output;

use clap::Parser;
use std::path::PathBuf;

pub use commands::Commands;
pub use output::OutputFormat;

/// Runlens - test-run report analytics
#[derive(Parser, Debug)]
#[command(name = "runlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log pipeline phases at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "RUNLENS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
