//! `kbsync config` subcommands

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings (API key masked)
    Show,

    /// Set a single setting
    Set {
        /// One of: api-url, api-key, dataset-id, auto-sync, sync-interval, timeout
        key: String,

        /// New value
        value: String,
    },

    /// Add a folder to the sync scope
    AddFolder {
        /// Vault-relative folder path
        folder: String,
    },

    /// Remove a folder from the sync scope
    RemoveFolder {
        /// Vault-relative folder path
        folder: String,
    },

    /// Sync the whole vault again
    ClearFolders,

    /// List vault folders, marking the ones in scope
    Folders,
}
