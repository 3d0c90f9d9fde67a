//! Remote knowledge base access
//!
//! The engine talks to the knowledge base through the [`KnowledgeBase`]
//! trait so passes can run against the HTTP client in production and an
//! in-memory fake in tests.

pub mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpKnowledgeBase;

/// Indexing mode requested for newly created documents
pub const INDEXING_TECHNIQUE: &str = "high_quality";

/// Processing rule mode requested for newly created documents
pub const PROCESS_RULE_MODE: &str = "automatic";

/// Errors from a single remote call
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

/// A document already present in the remote dataset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteDocumentRef {
    pub id: String,
    pub name: String,
}

/// Body of the listing response; fields beyond `id` and `name` are ignored
#[derive(Debug, Deserialize)]
pub struct DocumentListing {
    #[serde(default)]
    pub data: Vec<RemoteDocumentRef>,
}

#[derive(Debug, Serialize)]
pub struct ProcessRule<'a> {
    pub mode: &'a str,
}

/// Body of a create-by-text call
#[derive(Debug, Serialize)]
pub struct CreateByText<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub indexing_technique: &'a str,
    pub process_rule: ProcessRule<'a>,
}

impl<'a> CreateByText<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        Self {
            name,
            text,
            indexing_technique: INDEXING_TECHNIQUE,
            process_rule: ProcessRule {
                mode: PROCESS_RULE_MODE,
            },
        }
    }
}

/// Body of an update-by-text call
#[derive(Debug, Serialize)]
pub struct UpdateByText<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

/// Operations the engine needs from the knowledge base
pub trait KnowledgeBase {
    /// List the documents of the configured dataset
    fn list_documents(&self) -> Result<Vec<RemoteDocumentRef>, RemoteError>;

    /// Create a new document from text
    fn create_by_text(&self, name: &str, text: &str) -> Result<(), RemoteError>;

    /// Replace the text of an existing document
    fn update_by_text(&self, document_id: &str, name: &str, text: &str)
        -> Result<(), RemoteError>;
}
