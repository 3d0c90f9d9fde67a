//! Blocking HTTP client for the knowledge base document API

use std::time::Duration;

use ureq::http::Response;
use ureq::{Agent, Body};

use super::{
    CreateByText, DocumentListing, KnowledgeBase, RemoteDocumentRef, RemoteError, UpdateByText,
};
use crate::config::SyncConfig;

/// Crate version reported in the User-Agent header
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP implementation of [`KnowledgeBase`]
pub struct HttpKnowledgeBase {
    agent: Agent,
    base_url: String,
    api_key: String,
    dataset_id: String,
    timeout_seconds: u64,
    user_agent: String,
}

fn map_error(error: ureq::Error, timeout_seconds: u64) -> RemoteError {
    match error {
        ureq::Error::Timeout(_) => RemoteError::Timeout {
            seconds: timeout_seconds,
        },
        ureq::Error::StatusCode(status) => RemoteError::Status {
            status,
            body: String::new(),
        },
        other => RemoteError::Transport(other.to_string()),
    }
}

impl HttpKnowledgeBase {
    /// Build a client for the endpoint and dataset in `config`
    pub fn new(config: &SyncConfig) -> Self {
        let timeout_seconds = config.timeout_seconds();
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_seconds)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: Agent::new_with_config(agent_config),
            base_url: config.api_url.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            dataset_id: config.dataset_id.clone(),
            timeout_seconds,
            user_agent: format!("kbsync/{} ({})", APP_VERSION, std::env::consts::OS),
        }
    }

    fn dataset_url(&self, suffix: &str) -> String {
        format!("{}/v1/datasets/{}/{}", self.base_url, self.dataset_id, suffix)
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Read the body and turn it into a status error unless `status` is accepted
    fn check(
        &self,
        mut response: Response<Body>,
        accepted: &[u16],
    ) -> Result<String, RemoteError> {
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| map_error(e, self.timeout_seconds))?;

        if accepted.contains(&status) {
            Ok(body)
        } else {
            Err(RemoteError::Status { status, body })
        }
    }

    fn post_json(&self, url: &str, payload: String) -> Result<(), RemoteError> {
        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.authorization())
            .header("Content-Type", "application/json")
            .header("User-Agent", &self.user_agent)
            .send(payload)
            .map_err(|e| map_error(e, self.timeout_seconds))?;

        self.check(response, &[200, 201])?;
        Ok(())
    }
}

impl KnowledgeBase for HttpKnowledgeBase {
    #[tracing::instrument(skip(self), fields(dataset = %self.dataset_id))]
    fn list_documents(&self) -> Result<Vec<RemoteDocumentRef>, RemoteError> {
        let response = self
            .agent
            .get(&self.dataset_url("documents"))
            .header("Authorization", &self.authorization())
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| map_error(e, self.timeout_seconds))?;

        let body = self.check(response, &[200])?;
        let listing: DocumentListing =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;

        tracing::debug!(count = listing.data.len(), "Listed remote documents");
        Ok(listing.data)
    }

    #[tracing::instrument(skip(self, text), fields(dataset = %self.dataset_id))]
    fn create_by_text(&self, name: &str, text: &str) -> Result<(), RemoteError> {
        let payload = serde_json::to_string(&CreateByText::new(name, text))
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        self.post_json(&self.dataset_url("document/create_by_text"), payload)
    }

    #[tracing::instrument(skip(self, text), fields(dataset = %self.dataset_id))]
    fn update_by_text(
        &self,
        document_id: &str,
        name: &str,
        text: &str,
    ) -> Result<(), RemoteError> {
        let payload = serde_json::to_string(&UpdateByText { name, text })
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        let url = self.dataset_url(&format!("documents/{}/update_by_text", document_id));
        self.post_json(&url, payload)
    }
}
