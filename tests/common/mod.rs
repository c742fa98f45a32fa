#![allow(dead_code)]

use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use students_api_rust::config::AppConfig;
use students_api_rust::database::MemoryStudentStore;
use students_api_rust::{app, AppState};

/// One server per test, backed by a fresh in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a body to /api and return the response
    pub async fn create(&self, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url("/api")).json(body).send().await?)
    }

    /// POST /api, assert 201, return the created record
    pub async fn create_ok(&self, body: &Value) -> Result<Value> {
        let res = self.create(body).await?;
        anyhow::ensure!(
            res.status() == reqwest::StatusCode::CREATED,
            "expected 201 Created, got {}",
            res.status()
        );
        Ok(res.json().await?)
    }

    pub async fn seed(&self) -> Result<()> {
        let res = self.client.post(self.url("/api/seed-students")).send().await?;
        anyhow::ensure!(res.status() == reqwest::StatusCode::CREATED, "seed failed: {}", res.status());
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        Ok(self.client.get(self.url("/api")).send().await?.json().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

static TRACING: Once = Once::new();

/// Route server logs through the test harness; RUST_LOG=students_api_rust=debug to see them
fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub async fn spawn_server() -> Result<TestServer> {
    init_tracing();

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let state = AppState::new(Arc::new(MemoryStudentStore::new()), AppConfig::development());
    let router = app(state);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {e}");
        }
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        handle,
    })
}

pub fn student_body(national_code: &str) -> Value {
    json!({
        "firstName": "New First Name",
        "lastName": "New Last Name",
        "nationalCode": national_code,
        "phoneNumber": "123456789",
        "fatherName": "New Father Name",
        "schoolName": "New School Name",
        "educationalLevel": "New Educational Name"
    })
}

/// Assert the uniform error shape and return the messages
pub fn error_messages(body: &Value) -> Vec<String> {
    let errors = body
        .get("errors")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("missing errors array: {}", body));
    assert!(!errors.is_empty(), "errors array is empty: {}", body);
    errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .unwrap_or_else(|| panic!("error entry without message: {}", e))
                .to_string()
        })
        .collect()
}
