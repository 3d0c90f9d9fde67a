//! Command implementations for all kbsync commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{config, init, status, sync, watch};
use kbsync_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Init(args) => init::execute(ctx.cli, ctx.root, args),
            Commands::Sync => {
                let mut engine = ctx.open_engine()?;
                sync::execute(ctx.cli, &mut engine)
            }
            Commands::Status => {
                let engine = ctx.open_engine()?;
                status::execute(ctx.cli, &engine)
            }
            Commands::Watch(args) => watch::execute(ctx, args),
            Commands::Config { command } => config::execute(ctx, command),
        }
    }
}
