//! Vault access: markdown document enumeration and content reads
//!
//! Document paths are vault-relative and always `/`-separated so ledger
//! keys are identical across platforms. Hidden entries (`.kbsync/`,
//! `.obsidian/`, `.git/`, ...) are never part of the document set.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use walkdir::{DirEntry, WalkDir};

use crate::error::{KbsyncError, Result};

/// A markdown document in the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    /// Vault-relative path, `/`-separated
    pub path: String,
    /// File name including extension; used as the remote display name
    pub name: String,
    /// Modification time in milliseconds since the Unix epoch
    pub modified_ms: i64,
}

/// A local vault rooted at a directory
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Milliseconds since the epoch, saturating at `i64::MAX`
fn epoch_ms(since_epoch: Duration) -> i64 {
    i64::try_from(since_epoch.as_millis()).unwrap_or(i64::MAX)
}

fn modified_ms(metadata: &fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(epoch_ms)
        .unwrap_or(0)
}

impl Vault {
    /// Open an existing vault directory
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(KbsyncError::VaultNotFound {
                path: root.to_path_buf(),
            });
        }

        Ok(Vault {
            root: root.to_path_buf(),
        })
    }

    /// Root directory of the vault
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a vault-relative path
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    fn walk(&self) -> impl Iterator<Item = DirEntry> {
        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable vault entry");
                    None
                }
            })
    }

    /// List every markdown document in the vault, sorted by path
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn markdown_files(&self) -> Result<Vec<VaultFile>> {
        let mut files = Vec::new();

        for entry in self.walk() {
            let path = entry.path();
            if !entry.file_type().is_file() || !path.extension().is_some_and(|e| e == "md") {
                continue;
            }

            let Some(relative) = relative_path(&self.root, path) else {
                continue;
            };
            let metadata = entry
                .metadata()
                .map_err(|e| KbsyncError::io_operation("stat", path.display(), e))?;

            files.push(VaultFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: relative,
                modified_ms: modified_ms(&metadata),
            });
        }

        tracing::debug!(count = files.len(), "Enumerated vault documents");
        Ok(files)
    }

    /// List every folder in the vault (vault-relative, sorted)
    pub fn folders(&self) -> Result<Vec<String>> {
        let folders = self
            .walk()
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| relative_path(&self.root, e.path()))
            .collect();
        Ok(folders)
    }

    /// Read a document's content.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so one odd file cannot
    /// block every later pass.
    pub fn read(&self, file: &VaultFile) -> Result<String> {
        let path = self.resolve(&file.path);
        let bytes =
            fs::read(&path).map_err(|e| KbsyncError::io_operation("read", path.display(), e))?;
        Ok(match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}
