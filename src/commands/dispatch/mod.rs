//! Command dispatch logic for kbsync

use std::time::Instant;

use crate::cli::Cli;
use kbsync_core::error::Result;
use tracing::debug;

mod command;
mod commands;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = cli.vault_root();

    debug!(elapsed = ?start.elapsed(), vault = %root.display(), "resolve_vault");

    let ctx = CommandContext::new(cli, &root, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
