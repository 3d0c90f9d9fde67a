//! Configuration type definitions

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::DocumentRecord;
use crate::sync::PassState;

/// Default knowledge base API location (a local deployment)
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default auto-sync interval in minutes
pub const DEFAULT_SYNC_INTERVAL_MINUTES: u32 = 30;

/// Default timeout for each HTTP request
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Bounds applied to the per-request timeout
pub const MIN_TIMEOUT_SECONDS: u64 = 5;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Sync settings stored in `.kbsync/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the knowledge base API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer credential for the API
    #[serde(default)]
    pub api_key: String,

    /// Dataset (knowledge base) receiving the documents
    #[serde(default)]
    pub dataset_id: String,

    /// Vault folders to sync; empty means the whole vault
    #[serde(default)]
    pub folders: Vec<String>,

    /// Run passes periodically from `kbsync watch`
    #[serde(default)]
    pub auto_sync: bool,

    /// Minutes between auto-sync passes
    #[serde(default = "default_sync_interval")]
    pub sync_interval: u32,

    /// Timeout for each HTTP request, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Completion time of the last successful pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_time: Option<DateTime<Utc>>,

    /// Outcome of the most recent pass, successful or not
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pass: Option<LastPass>,

    /// Sync history written by older releases; migrated into the ledger file
    #[serde(
        rename = "fileHashes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_file_hashes: Option<BTreeMap<String, DocumentRecord>>,
}

/// Recorded outcome of a finished pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastPass {
    pub state: PassState,
    pub finished_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LastPass {
    pub fn completed(finished_at: DateTime<Utc>) -> Self {
        LastPass {
            state: PassState::Completed,
            finished_at,
            error: None,
        }
    }

    pub fn failed(finished_at: DateTime<Utc>, error: impl ToString) -> Self {
        LastPass {
            state: PassState::Failed,
            finished_at,
            error: Some(error.to_string()),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_sync_interval() -> u32 {
    DEFAULT_SYNC_INTERVAL_MINUTES
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            api_url: default_api_url(),
            api_key: String::new(),
            dataset_id: String::new(),
            folders: Vec::new(),
            auto_sync: false,
            sync_interval: default_sync_interval(),
            timeout_seconds: default_timeout_seconds(),
            last_sync_time: None,
            last_pass: None,
            legacy_file_hashes: None,
        }
    }
}
