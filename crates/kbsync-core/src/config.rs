//! Sync settings for kbsync
//!
//! Settings live in `<vault>/.kbsync/config.toml`. Credentials may also come
//! from the environment (`KBSYNC_API_KEY` and friends); those overrides are
//! applied to the effective configuration only and never written back.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KbsyncError, Result};
use crate::sync::PassState;
use crate::vault::Vault;
use crate::bail_invalid;

pub use types::{
    LastPass, SyncConfig, DEFAULT_API_URL, DEFAULT_SYNC_INTERVAL_MINUTES, DEFAULT_TIMEOUT_SECONDS,
    MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS,
};

/// Settings directory at the vault root
pub const SETTINGS_DIR: &str = ".kbsync";

/// Settings file inside [`SETTINGS_DIR`]
pub const SETTINGS_FILE: &str = "config.toml";

pub const ENV_API_URL: &str = "KBSYNC_API_URL";
pub const ENV_API_KEY: &str = "KBSYNC_API_KEY";
pub const ENV_DATASET_ID: &str = "KBSYNC_DATASET_ID";
pub const ENV_TIMEOUT: &str = "KBSYNC_TIMEOUT";

/// Keys accepted by [`SyncConfig::set_value`]
pub const SETTABLE_KEYS: &str = "api-url, api-key, dataset-id, auto-sync, sync-interval, timeout";

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => bail_invalid!(key, value),
    }
}

/// Normalize a scope folder (`notes/` and `notes` are the same folder)
pub fn normalize_folder(folder: &str) -> String {
    folder.trim().trim_end_matches('/').to_string()
}

impl SyncConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SyncConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| KbsyncError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| KbsyncError::io_operation("write settings", path.display(), e))?;
        Ok(())
    }

    /// Apply environment overrides from `lookup` (normally `std::env::var`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(dataset) = non_empty(ENV_DATASET_ID) {
            self.dataset_id = dataset;
        }
        if let Some(seconds) = non_empty(ENV_TIMEOUT).and_then(|v| v.parse::<u64>().ok()) {
            self.timeout_seconds = seconds;
        }
    }

    /// Check that a pass can start: credentials, dataset and endpoint present
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(KbsyncError::MissingSetting { setting: "API key" });
        }
        if self.dataset_id.trim().is_empty() {
            return Err(KbsyncError::MissingSetting {
                setting: "dataset ID",
            });
        }
        if self.api_url.trim().is_empty() {
            return Err(KbsyncError::MissingSetting { setting: "API URL" });
        }
        if self.sync_interval == 0 {
            bail_invalid!("sync interval", self.sync_interval);
        }
        Ok(())
    }

    /// Per-request timeout, clamped to sane bounds
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
            .clamp(MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS)
    }

    /// Whether a vault-relative path falls under the configured folders
    pub fn in_scope(&self, path: &str) -> bool {
        if self.folders.is_empty() {
            return true;
        }

        self.folders.iter().any(|folder| {
            let folder = normalize_folder(folder);
            folder.is_empty()
                || path == folder
                || path
                    .strip_prefix(folder.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Add a scope folder; returns false if it was already present
    pub fn add_folder(&mut self, folder: &str) -> bool {
        let folder = normalize_folder(folder);
        if self.folders.iter().any(|f| normalize_folder(f) == folder) {
            return false;
        }
        self.folders.push(folder);
        self.folders.sort();
        true
    }

    /// Remove a scope folder; returns false if it was not present
    pub fn remove_folder(&mut self, folder: &str) -> bool {
        let folder = normalize_folder(folder);
        let before = self.folders.len();
        self.folders.retain(|f| normalize_folder(f) != folder);
        self.folders.len() != before
    }

    /// Set a single value by its CLI key name
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key.replace('_', "-").as_str() {
            "api-url" => self.api_url = value.trim().to_string(),
            "api-key" => self.api_key = value.trim().to_string(),
            "dataset-id" => self.dataset_id = value.trim().to_string(),
            "auto-sync" => self.auto_sync = parse_bool(key, value)?,
            "sync-interval" => match value.parse::<u32>() {
                Ok(minutes) if minutes > 0 => self.sync_interval = minutes,
                _ => bail_invalid!("sync interval", value),
            },
            "timeout" => match value.parse::<u64>() {
                Ok(seconds) if (MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&seconds) => {
                    self.timeout_seconds = seconds
                }
                _ => bail_invalid!("timeout", value),
            },
            _ => return Err(KbsyncError::unsupported("setting", key, SETTABLE_KEYS)),
        }
        Ok(())
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let visible = chars.len().saturating_sub(4);
        chars
            .iter()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { *c })
            .collect()
    }
}

/// The settings file of one vault
#[derive(Debug, Clone)]
pub struct Settings {
    path: PathBuf,
    /// Configuration as stored on disk (no environment overrides)
    pub config: SyncConfig,
}

impl Settings {
    /// Location of the settings file for a vault
    pub fn path_for(vault: &Vault) -> PathBuf {
        vault.root().join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    /// Load the settings of an initialized vault
    pub fn load(vault: &Vault) -> Result<Self> {
        let path = Self::path_for(vault);
        if !path.exists() {
            return Err(KbsyncError::SettingsNotFound { path });
        }

        let config = SyncConfig::load(&path)?;
        Ok(Settings { path, config })
    }

    /// Create (or overwrite) the settings file for a vault
    pub fn create(vault: &Vault, config: SyncConfig) -> Result<Self> {
        let path = Self::path_for(vault);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| KbsyncError::io_operation("create", dir.display(), e))?;
        }

        let settings = Settings { path, config };
        settings.save()?;
        Ok(settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        self.config.save(&self.path)
    }

    /// Record a pass outcome, leaving every other setting as it is on disk.
    ///
    /// The file is re-read first so edits made while the pass ran are kept;
    /// `last_sync_time` only moves for a completed pass.
    pub fn record_pass(&mut self, outcome: LastPass) -> Result<()> {
        let mut config = SyncConfig::load(&self.path)?;
        if outcome.state == PassState::Completed {
            config.last_sync_time = Some(outcome.finished_at);
        }
        config.last_pass = Some(outcome);
        config.save(&self.path)?;

        self.config = config;
        Ok(())
    }

    /// Configuration with environment overrides applied
    pub fn effective(&self) -> SyncConfig {
        let mut config = self.config.clone();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }
}
