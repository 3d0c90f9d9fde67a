//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::Cli;
use kbsync_core::config::Settings;
use kbsync_core::error::Result;
use kbsync_core::sync::SyncEngine;
use kbsync_core::vault::Vault;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    pub fn vault(&self) -> Result<Vault> {
        Vault::open(self.root)
    }

    /// Open the vault and its settings without touching the ledger
    pub fn settings(&self) -> Result<(Vault, Settings)> {
        let vault = self.vault()?;
        let settings = Settings::load(&vault)?;
        Ok((vault, settings))
    }

    pub fn open_engine(&self) -> Result<SyncEngine> {
        let engine = SyncEngine::open(self.root)?;
        tracing::debug!(elapsed = ?self.start.elapsed(), "open_engine");
        Ok(engine)
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
        println!("kbsync {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Mirror a markdown vault into a remote knowledge base.");
        println!();
        println!("Run `kbsync --help` for usage information.");
        Ok(())
    }
}
