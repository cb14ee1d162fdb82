//! Command argument structures

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level runlens commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a report and update the run history
    Analyze(AnalyzeArgs),

    /// Check the structure of a report without analyzing it
    Validate(ValidateArgs),

    /// Show the run-over-run trend of a history file
    Trend(TrendArgs),

    /// Evaluate the release gate; exits 4 when the release is blocked
    Gate(GateArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Test report (JSON)
    pub report: PathBuf,

    /// History file (defaults to [history] path in the config)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Read the history window but do not write the current run back
    #[arg(long)]
    pub no_history_update: bool,

    /// Also write the full payload as JSON to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Payload title (defaults to [report] title in the config)
    #[arg(long, short)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Test report (JSON)
    pub report: PathBuf,
}

#[derive(Args, Debug)]
pub struct TrendArgs {
    /// History file (defaults to [history] path in the config)
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GateArgs {
    /// Test report (JSON)
    pub report: PathBuf,

    /// History file used for the duration comparison; never written
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Treat RISKY as a failure too
    #[arg(long)]
    pub strict: bool,
}
