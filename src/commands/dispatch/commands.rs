//! Command implementations for all runlens commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{analyze, gate, trend, validate};
use runlens_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Analyze(args) => analyze::execute(ctx, args),
            Commands::Validate(args) => validate::execute(ctx, args),
            Commands::Trend(args) => trend::execute(ctx, args),
            Commands::Gate(args) => gate::execute(ctx, args),
        }
    }
}
