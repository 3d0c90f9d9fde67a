//! Change ledger: the durable record of what was last synced
//!
//! The ledger lives inside the vault as `historyContentHash`, a JSON object
//! mapping each vault-relative path to `{path, hash, lastModified}`. Earlier
//! releases kept the same map under a `fileHashes` key in the settings
//! file; [`Ledger::open`] migrates that once and removes it from settings.
//!
//! Loading never fails: a missing, empty or corrupt file yields an empty
//! ledger, which means the next pass re-syncs every document.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{KbsyncError, Result};
use crate::vault::Vault;

/// Well-known name of the ledger file at the vault root
pub const LEDGER_FILE_NAME: &str = "historyContentHash";

const LEDGER_TEMP_SUFFIX: &str = ".tmp";

/// Last-synced state of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Vault-relative path
    pub path: String,
    /// Fingerprint of the content that was uploaded
    #[serde(rename = "hash")]
    pub fingerprint: String,
    /// Modification time (ms since epoch) of the uploaded revision
    #[serde(rename = "lastModified")]
    pub last_modified: i64,
}

impl DocumentRecord {
    pub fn new(path: impl Into<String>, fingerprint: impl Into<String>, last_modified: i64) -> Self {
        Self {
            path: path.into(),
            fingerprint: fingerprint.into(),
            last_modified,
        }
    }
}

/// Path-keyed set of [`DocumentRecord`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: BTreeMap<String, DocumentRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from a serialized map, keyed by the map keys
    pub fn from_records(records: BTreeMap<String, DocumentRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|(key, mut record)| {
                if record.path != key {
                    tracing::debug!(key = %key, path = %record.path, "Ledger entry path differs from its key");
                    record.path = key.clone();
                }
                (key, record)
            })
            .collect();
        Self { records }
    }

    /// Location of the ledger file for a vault
    pub fn file_path(vault: &Vault) -> PathBuf {
        vault.root().join(LEDGER_FILE_NAME)
    }

    pub fn get(&self, path: &str) -> Option<&DocumentRecord> {
        self.records.get(path)
    }

    /// Replace the record for `record.path` wholesale
    pub fn record(&mut self, record: DocumentRecord) {
        self.records.insert(record.path.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.values()
    }

    /// Load the vault's ledger, migrating the legacy settings copy first.
    pub fn open(vault: &Vault, settings: &mut Settings) -> Self {
        let path = Self::file_path(vault);

        if !path.exists() {
            if let Err(e) = Self::migrate_legacy(&path, settings) {
                tracing::warn!(error = %e, "Ledger migration from settings failed");
            }
        }

        Self::load(&path)
    }

    /// Move a `fileHashes` table out of settings into the ledger file.
    ///
    /// Returns whether anything was migrated. The settings entry is only
    /// removed once the ledger file has been written.
    pub fn migrate_legacy(path: &Path, settings: &mut Settings) -> Result<bool> {
        let Some(legacy) = settings.config.legacy_file_hashes.clone() else {
            return Ok(false);
        };

        let ledger = Self::from_records(legacy);
        ledger.save(path)?;

        settings.config.legacy_file_hashes = None;
        settings.save()?;

        tracing::info!(records = ledger.len(), "Migrated sync history out of settings");
        Ok(true)
    }

    /// Load a ledger file, recovering to an empty ledger on any problem
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No ledger file, starting empty");
                return Self::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read ledger, starting empty");
                return Self::new();
            }
        };

        if content.trim().is_empty() {
            return Self::new();
        }

        match serde_json::from_str::<BTreeMap<String, DocumentRecord>>(&content) {
            Ok(records) => {
                let ledger = Self::from_records(records);
                tracing::debug!(records = ledger.len(), "Loaded ledger");
                ledger
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ledger is corrupt, starting empty");
                Self::new()
            }
        }
    }

    /// Persist the ledger atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.records)?;

        let mut temp = path.as_os_str().to_owned();
        temp.push(LEDGER_TEMP_SUFFIX);
        let temp = PathBuf::from(temp);

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            drop(file);
            fs::rename(&temp, path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&temp);
            KbsyncError::io_operation("save sync history", path.display(), e)
        })?;

        tracing::debug!(records = self.len(), path = %path.display(), "Saved ledger");
        Ok(())
    }
}
