use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::{matchers, Mock, MockServer, Request, ResponseTemplate};

/// Get a Command for kbsync with no ambient configuration leaking in
pub fn kbsync() -> Command {
    let mut cmd = cargo_bin_cmd!("kbsync");
    for var in [
        "KBSYNC_VAULT",
        "KBSYNC_API_URL",
        "KBSYNC_API_KEY",
        "KBSYNC_DATASET_ID",
        "KBSYNC_TIMEOUT",
        "KBSYNC_LOG",
        "RUST_LOG",
        "HTTP_PROXY",
        "http_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Get a Command for kbsync pointed at `vault`
pub fn kbsync_in(vault: &Path) -> Command {
    let mut cmd = kbsync();
    cmd.arg("--vault").arg(vault);
    cmd
}

/// Write a vault-relative file, creating parent folders
pub fn write_note(vault: &Path, relative: &str, content: &str) {
    let path = vault.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Create a vault with settings pointing at `api_url`
pub fn setup_vault(api_url: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    kbsync_in(dir.path())
        .args(["init", "--api-url", api_url])
        .args(["--api-key", "test-key", "--dataset-id", "ds-1"])
        .assert()
        .success();
    dir
}

/// Mock knowledge base document API for the binary under test
pub struct FakeKnowledgeBase {
    pub url: String,
    server: MockServer,
    runtime: Runtime,
}

#[allow(dead_code)]
impl FakeKnowledgeBase {
    /// An empty dataset accepting every create and update
    pub fn start() -> Self {
        Self::with_documents(&[])
    }

    /// A dataset already holding `(id, name)` documents
    pub fn with_documents(documents: &[(&str, &str)]) -> Self {
        let fake = Self::serve(documents);
        fake.mount(Mock::given(matchers::method("POST")).respond_with(ResponseTemplate::new(200)));
        fake
    }

    /// An empty dataset answering every create and update with `status`
    pub fn failing_writes(status: u16) -> Self {
        let fake = Self::serve(&[]);
        fake.mount(
            Mock::given(matchers::method("POST")).respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({"message": "internal error"})),
            ),
        );
        fake
    }

    fn serve(documents: &[(&str, &str)]) -> Self {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        let fake = Self {
            url: server.uri(),
            server,
            runtime,
        };

        let data: Vec<_> = documents
            .iter()
            .map(|(id, name)| serde_json::json!({"id": id, "name": name}))
            .collect();
        fake.mount(
            Mock::given(matchers::method("GET"))
                .and(matchers::path_regex(r"^/v1/datasets/[^/]+/documents$"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })),
                ),
        );
        fake
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// Create and update calls, in arrival order
    pub fn writes(&self) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.as_str() == "POST")
            .collect()
    }
}

/// Value of a request header, if present and printable
#[allow(dead_code)]
pub fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
