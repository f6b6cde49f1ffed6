use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;

use survey_intake::config::{Config, CorsOrigins, SyncPolicy};
use survey_intake::models::StoredRecord;
use survey_intake::storage::{JsonlLog, PersistenceError, RecordLog};

/// A running test server appending to a log inside a temporary directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub log_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a JSON survey body, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/survey"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit arbitrary bytes as the request body, return (body, status).
    pub async fn submit_raw(&self, body: &'static str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/survey"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Every line of the log, parsed.
    pub fn frames(&self) -> Vec<StoredRecord> {
        read_frames(&self.log_path)
    }
}

pub fn read_frames(path: &std::path::Path) -> Vec<StoredRecord> {
    let contents = std::fs::read_to_string(path).unwrap_or_default();
    contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("log line is not a stored record"))
        .collect()
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_path: PathBuf::new(),
        sync: SyncPolicy::Flush,
        max_body_size: 65_536,
        trusted_proxies: vec![],
        cors_origins: CorsOrigins::Any,
        require_consent: true,
        log_level: "warn".to_string(),
    }
}

/// The body from the first end-to-end scenario.
pub fn valid_submission() -> Value {
    json!({
        "name": "A",
        "email": "a@x.com",
        "age": 30,
        "consent": true,
        "rating": 5,
        "source": "web"
    })
}

/// Spawn a test app with a fresh log file.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(mut config: Config) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let log_path = dir.path().join("logs").join("survey.ndjson");
    config.log_path = log_path.clone();

    let log = JsonlLog::open(&log_path, config.sync)
        .await
        .expect("Failed to open log");

    let addr = serve(config, Arc::new(log)).await;

    TestApp {
        addr,
        client: Client::new(),
        log_path,
        _dir: dir,
    }
}

/// Bind the router to a random port and serve it in the background.
pub async fn serve(config: Config, log: Arc<dyn RecordLog>) -> SocketAddr {
    let app = survey_intake::build_app(config, log);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    addr
}

/// A log whose storage always rejects the write.
pub struct FailingLog;

#[async_trait]
impl RecordLog for FailingLog {
    async fn append(&self, _record: &StoredRecord) -> Result<(), PersistenceError> {
        Err(PersistenceError::Write(std::io::Error::other(
            "no space left on device",
        )))
    }
}
