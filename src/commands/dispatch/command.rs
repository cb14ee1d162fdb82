//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Cli;
use runlens_core::config::RunlensConfig;
use runlens_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub config: &'a RunlensConfig,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, config: &'a RunlensConfig, start: Instant) -> Self {
        Self { cli, config, start }
    }

    /// History file from the command line, else from the config
    pub fn history_path(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.config.history.path.clone())
    }

    /// Payload title from the command line, else from the config
    pub fn title(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.config.report.title.clone())
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("runlens {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Test-run report analytics and release gating.");
        println!();
        println!("Run `runlens --help` for usage information.");
        Ok(())
    }
}
