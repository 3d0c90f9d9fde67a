//! CLI argument parsing for kbsync
//!
//! Global flags: --vault, --format, --quiet, --verbose, --log-level, --log-json

pub mod args;
pub mod config;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{InitArgs, WatchArgs};
pub use config::ConfigCommands;
pub use output::OutputFormat;

/// kbsync - mirror a markdown vault into a remote knowledge base
#[derive(Parser, Debug)]
#[command(name = "kbsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Vault directory (defaults to the current directory)
    #[arg(long, global = true, env = "KBSYNC_VAULT")]
    pub vault: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter (error, warn, info, debug, trace, or a full directive)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Vault root: `--vault` if given, else the current directory
    pub fn vault_root(&self) -> PathBuf {
        self.vault
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update the vault's sync settings
    Init(InitArgs),

    /// Upload new and changed documents to the knowledge base
    Sync,

    /// Show which documents the next sync would upload
    Status,

    /// Sync periodically while auto-sync is enabled
    Watch(WatchArgs),

    /// Read and change sync settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}
