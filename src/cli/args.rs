//! Argument structs for kbsync subcommands

use clap::Args;

/// Arguments for `kbsync init`
#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Base URL of the knowledge base API
    #[arg(long)]
    pub api_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long)]
    pub api_key: Option<String>,

    /// Dataset that receives the documents
    #[arg(long)]
    pub dataset_id: Option<String>,

    /// Limit syncing to a vault folder (repeatable)
    #[arg(long = "folder", action = clap::ArgAction::Append)]
    pub folders: Vec<String>,
}

/// Arguments for `kbsync watch`
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Run a pass immediately instead of waiting one interval first
    #[arg(long)]
    pub now: bool,

    /// Stop after this many passes
    #[arg(long)]
    pub max_passes: Option<u32>,
}
