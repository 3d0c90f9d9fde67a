//! Sync orchestration
//!
//! A pass walks the in-scope vault documents in path order, skips the ones
//! the ledger says are unchanged and reconciles the rest one at a time.
//! The first failing document aborts the pass; ledger records for documents
//! already uploaded in that pass are kept. The ledger is written back after
//! every pass, while `last_sync_time` only moves on a completed one.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::config::{LastPass, Settings, SyncConfig, SETTINGS_DIR};
use crate::detect::{self, ChangeStatus};
use crate::error::{KbsyncError, Result};
use crate::ledger::{DocumentRecord, Ledger};
use crate::reconcile::reconcile;
use crate::remote::KnowledgeBase;
use crate::trace_time;
use crate::vault::{Vault, VaultFile};

/// Lock file inside the settings directory held while a pass runs
pub const LOCK_FILE: &str = "sync.lock";

/// Progress callback: `(current, total, file)`, 1-based
pub type Progress<'a> = &'a mut dyn FnMut(usize, usize, &VaultFile);

/// Lifecycle of the most recent pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Counts produced by a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub synced: usize,
    pub skipped: usize,
}

/// Outcome of a completed pass
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    #[serde(flatten)]
    pub summary: SyncSummary,
    pub completed_at: DateTime<Utc>,
    /// Set when the results could not be written back to disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

/// Pending-change classification of one in-scope document
#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub status: ChangeStatus,
    pub fingerprint: String,
}

/// Shared flag checked between documents
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Exclusive advisory lock on the vault's pass lock file
#[derive(Debug)]
pub struct PassLock {
    file: File,
}

impl PassLock {
    /// Take the lock, failing immediately if another pass holds it
    pub fn acquire(vault: &Vault) -> Result<Self> {
        let dir = vault.root().join(SETTINGS_DIR);
        fs::create_dir_all(&dir)
            .map_err(|e| KbsyncError::io_operation("create", dir.display(), e))?;

        let path = dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| KbsyncError::io_operation("open", path.display(), e))?;

        file.try_lock_exclusive()
            .map_err(|_| KbsyncError::PassInProgress)?;

        Ok(Self { file })
    }
}

impl Drop for PassLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Documents a pass would consider, in processing order
pub fn in_scope_files(vault: &Vault, config: &SyncConfig) -> Result<Vec<VaultFile>> {
    Ok(vault
        .markdown_files()?
        .into_iter()
        .filter(|f| config.in_scope(&f.path))
        .collect())
}

/// Run one pass over the vault, recording each upload in `ledger`.
///
/// Does not validate `config`, take the pass lock or persist anything; see
/// [`SyncEngine::sync`] for the full lifecycle.
pub fn run_pass<K: KnowledgeBase + ?Sized>(
    vault: &Vault,
    config: &SyncConfig,
    ledger: &mut Ledger,
    remote: &K,
    cancel: &CancelToken,
    mut progress: Option<Progress<'_>>,
) -> Result<SyncSummary> {
    let files = in_scope_files(vault, config)?;
    let total = files.len();
    let mut summary = SyncSummary::default();

    tracing::info!(total, folders = ?config.folders, "Starting sync pass");

    for (index, file) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(
                synced = summary.synced,
                skipped = summary.skipped,
                remaining = total - index,
                "Sync pass interrupted"
            );
            return Err(KbsyncError::Interrupted);
        }

        if let Some(callback) = progress.as_mut() {
            callback(index + 1, total, file);
        }

        let content = vault.read(file).map_err(|e| {
            KbsyncError::pass_failed(&file.path, summary.synced, summary.skipped, e)
        })?;

        let check = detect::check(file, &content, ledger);
        if !check.status.needs_sync() {
            tracing::debug!(path = %file.path, "Unchanged, skipping");
            summary.skipped += 1;
            continue;
        }

        let start = Instant::now();
        let outcome = reconcile(remote, file, &content).map_err(|e| {
            tracing::error!(path = %file.path, error = %e, "Sync failed");
            KbsyncError::pass_failed(&file.path, summary.synced, summary.skipped, e.into())
        })?;
        trace_time!(start, "reconcile", path = file.path.as_str());

        ledger.record(DocumentRecord::new(
            file.path.clone(),
            check.fingerprint,
            file.modified_ms,
        ));
        summary.synced += 1;

        tracing::debug!(
            path = %file.path,
            status = %check.status,
            outcome = outcome.as_str(),
            "Synced document"
        );
    }

    tracing::info!(
        synced = summary.synced,
        skipped = summary.skipped,
        "Sync pass complete"
    );
    Ok(summary)
}

/// The engine for one vault: settings, ledger and pass state
#[derive(Debug)]
pub struct SyncEngine {
    vault: Vault,
    settings: Settings,
    ledger: Ledger,
    state: PassState,
}

impl SyncEngine {
    /// Open an initialized vault, loading (and if needed migrating) its ledger
    pub fn open(root: &Path) -> Result<Self> {
        let vault = Vault::open(root)?;
        let mut settings = Settings::load(&vault)?;
        let ledger = Ledger::open(&vault, &mut settings);

        Ok(Self {
            vault,
            settings,
            ledger,
            state: PassState::Idle,
        })
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Effective configuration (settings plus environment overrides)
    pub fn config(&self) -> SyncConfig {
        self.settings.effective()
    }

    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        self.settings.config.last_sync_time
    }

    /// Outcome of the most recent pass recorded for this vault
    pub fn last_pass(&self) -> Option<&LastPass> {
        self.settings.config.last_pass.as_ref()
    }

    /// Classify every in-scope document without touching the remote side
    pub fn preview(&self) -> Result<Vec<FileStatus>> {
        let config = self.config();
        let files = in_scope_files(&self.vault, &config)?;

        files
            .iter()
            .map(|file| {
                let content = self.vault.read(file)?;
                let check = detect::check(file, &content, &self.ledger);
                Ok(FileStatus {
                    path: file.path.clone(),
                    status: check.status,
                    fingerprint: check.fingerprint,
                })
            })
            .collect()
    }

    /// Run a full pass: validate, lock, sync, then persist the results.
    pub fn sync<K: KnowledgeBase + ?Sized>(
        &mut self,
        remote: &K,
        cancel: &CancelToken,
        progress: Option<Progress<'_>>,
    ) -> Result<SyncReport> {
        let config = self.config();
        config.validate()?;

        let _lock = PassLock::acquire(&self.vault)?;
        self.state = PassState::Running;

        let start = Instant::now();
        let result = run_pass(
            &self.vault,
            &config,
            &mut self.ledger,
            remote,
            cancel,
            progress,
        );
        trace_time!(start, "sync_pass");

        let mut persist_error = self.persist_ledger();
        let finished_at = Utc::now();

        match result {
            Ok(summary) => {
                self.state = PassState::Completed;
                if let Err(e) = self.record_pass(LastPass::completed(finished_at)) {
                    persist_error.get_or_insert(e);
                }

                Ok(SyncReport {
                    summary,
                    completed_at: finished_at,
                    persist_error,
                })
            }
            Err(e) => {
                self.state = PassState::Failed;
                let recorded = self.record_pass(LastPass::failed(finished_at, &e));
                if let Some(persist) = persist_error.or(recorded.err()) {
                    tracing::error!(error = %persist, "Sync results not saved after failed pass");
                }
                Err(e)
            }
        }
    }

    /// Store the pass outcome in settings; called while the pass lock is held
    fn record_pass(&mut self, outcome: LastPass) -> std::result::Result<(), String> {
        self.settings.record_pass(outcome).map_err(|e| {
            tracing::warn!(error = %e, "Failed to record pass outcome");
            e.to_string()
        })
    }

    /// Write the ledger back; the in-memory copy stays current either way
    fn persist_ledger(&self) -> Option<String> {
        match self.ledger.save(&Ledger::file_path(&self.vault)) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist sync history");
                Some(e.to_string())
            }
        }
    }
}
