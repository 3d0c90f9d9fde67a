//! Create-or-update decision for a single document
//!
//! Remote documents are matched by display name (the local file name),
//! exact and case-sensitive, first match wins. A listing that fails is not
//! an error: the document is created instead, which can leave a duplicate
//! behind if the listing failed spuriously.

use crate::remote::{KnowledgeBase, RemoteDocumentRef, RemoteError};
use crate::vault::VaultFile;

/// Result of looking a document up in the remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(RemoteDocumentRef),
    NotFound,
    /// The listing call itself failed
    Failed(String),
}

/// What reconcile did for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    Created,
    Updated,
    /// Created because the listing could not be fetched
    CreatedAfterLookupFailure,
}

impl RemoteOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteOutcome::Created => "created",
            RemoteOutcome::Updated => "updated",
            RemoteOutcome::CreatedAfterLookupFailure => "created_after_lookup_failure",
        }
    }
}

/// Find the remote document whose name equals `name`
pub fn lookup_remote<K: KnowledgeBase + ?Sized>(remote: &K, name: &str) -> Lookup {
    match remote.list_documents() {
        Ok(documents) => documents
            .into_iter()
            .find(|doc| doc.name == name)
            .map_or(Lookup::NotFound, Lookup::Found),
        Err(e) => Lookup::Failed(e.to_string()),
    }
}

/// Upload `content` for `file`, updating a same-named remote document if one exists
pub fn reconcile<K: KnowledgeBase + ?Sized>(
    remote: &K,
    file: &VaultFile,
    content: &str,
) -> Result<RemoteOutcome, RemoteError> {
    match lookup_remote(remote, &file.name) {
        Lookup::Found(existing) => {
            tracing::debug!(path = %file.path, remote_id = %existing.id, "Updating remote document");
            remote.update_by_text(&existing.id, &file.name, content)?;
            Ok(RemoteOutcome::Updated)
        }
        Lookup::NotFound => {
            tracing::debug!(path = %file.path, "Creating remote document");
            remote.create_by_text(&file.name, content)?;
            Ok(RemoteOutcome::Created)
        }
        Lookup::Failed(reason) => {
            tracing::warn!(path = %file.path, reason = %reason, "Remote listing failed, creating document");
            remote.create_by_text(&file.name, content)?;
            Ok(RemoteOutcome::CreatedAfterLookupFailure)
        }
    }
}
