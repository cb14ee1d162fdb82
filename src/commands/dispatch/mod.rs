//! Command dispatch logic for runlens

use std::time::Instant;

use crate::cli::Cli;
use runlens_core::config::RunlensConfig;
use runlens_core::error::Result;
use tracing::debug;

mod command;
mod commands;
pub(crate) mod macros;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let config = RunlensConfig::load(cli.config.as_deref())?;

    debug!(elapsed = ?start.elapsed(), "load_config");

    let ctx = CommandContext::new(cli, &config, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
