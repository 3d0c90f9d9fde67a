//! Change detection against the ledger

use std::fmt;

use serde::Serialize;

use crate::fingerprint::fingerprint;
use crate::ledger::Ledger;
use crate::vault::VaultFile;

/// Why a document does (or does not) need syncing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// No ledger record: never synced
    New,
    /// Fingerprint differs from the last synced content
    ContentChanged,
    /// Same content but a different modification time
    Touched,
    /// Matches the ledger exactly
    Unchanged,
}

impl ChangeStatus {
    pub fn needs_sync(self) -> bool {
        self != ChangeStatus::Unchanged
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeStatus::New => "new",
            ChangeStatus::ContentChanged => "content_changed",
            ChangeStatus::Touched => "touched",
            ChangeStatus::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one document plus the fingerprint it was checked with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCheck {
    pub status: ChangeStatus,
    pub fingerprint: String,
}

/// Classify a document against its ledger record
pub fn check(file: &VaultFile, content: &str, ledger: &Ledger) -> ChangeCheck {
    let current = fingerprint(content);

    let status = match ledger.get(&file.path) {
        None => ChangeStatus::New,
        Some(record) if record.fingerprint != current => ChangeStatus::ContentChanged,
        Some(record) if record.last_modified != file.modified_ms => ChangeStatus::Touched,
        Some(_) => ChangeStatus::Unchanged,
    };

    ChangeCheck {
        status,
        fingerprint: current,
    }
}

/// Whether a document must be uploaded
pub fn needs_sync(file: &VaultFile, content: &str, ledger: &Ledger) -> bool {
    check(file, content, ledger).status.needs_sync()
}
