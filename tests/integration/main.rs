//! Rendezvous integration test harness.
//!
//! Each test starts the real API router on a loopback socket with its own
//! registry and talks to it over HTTP. Registries run on a manual clock, so
//! expiry is driven by advancing time rather than sleeping.
//!
//!   cargo test --test integration


use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use rendezvous_api::ApiState;
use rendezvous_core::ManualClock;
use rendezvous_services::{Registry, SharedRegistry};

// ── Harness ───────────────────────────────────────────────────────────────────

pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(300);
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A running API server bound to an ephemeral loopback port.
pub struct TestServer {
    pub base: String,
    pub registry: SharedRegistry,
    pub clock: ManualClock,
    client: reqwest::Client,
    shutdown_tx: broadcast::Sender<()>,
    task: tokio::task::JoinHandle<Result<()>>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let clock = ManualClock::new(1_700_000_000_000);
        let registry = Arc::new(Registry::with_clock(
            LIVENESS_TIMEOUT,
            Arc::new(clock.clone()),
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind loopback listener")?;
        let base = format!("http://{}", listener.local_addr()?);

        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        let state = ApiState::new(registry.clone(), SWEEP_INTERVAL);
        let task = tokio::spawn(rendezvous_api::serve(
            listener,
            state,
            shutdown_tx.subscribe(),
        ));

        Ok(Self {
            base,
            registry,
            clock,
            client: reqwest::Client::new(),
            shutdown_tx,
            task,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// GET a path, returning status and parsed JSON body.
    pub async fn get(&self, path: &str) -> Result<(u16, Value)> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await.context("response was not JSON")?))
    }

    /// POST a JSON body, returning status and parsed JSON body.
    pub async fn post(&self, path: &str, body: Value) -> Result<(u16, Value)> {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await.context("response was not JSON")?))
    }

    pub async fn register(
        &self,
        address: &str,
        name: &str,
        description: &str,
    ) -> Result<(u16, Value)> {
        self.post(
            "/communities",
            serde_json::json!({
                "name": name,
                "description": description,
                "onionAddress": address,
            }),
        )
        .await
    }

    pub async fn heartbeat(&self, address: &str) -> Result<(u16, Value)> {
        self.post(
            "/communities/heartbeat",
            serde_json::json!({ "onionAddress": address }),
        )
        .await
    }

    /// Signal shutdown without waiting.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Signal shutdown and wait for the server to drain.
    pub async fn stop(self) -> Result<()> {
        self.signal_shutdown();
        self.task.await.context("server task panicked")?
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_starts_and_stops() {
    let server = TestServer::start().await.unwrap();
    let resp = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let text = resp.text().await.unwrap();
    assert!(text.contains("running"), "unexpected banner: {text}");
    server.stop().await.unwrap();
}

/// A request already in flight when shutdown is signalled still gets its
/// response before the server task finishes.
#[tokio::test]
async fn test_shutdown_drains_in_flight_request() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let server = TestServer::start().await.unwrap();
    let addr = server.base.trim_start_matches("http://").to_string();
    let body = r#"{"name":"Alice","onionAddress":"alice.onion"}"#;

    let mut stream = tokio::net::TcpStream::connect(&addr).await.unwrap();
    let head = format!(
        "POST /communities HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    server.signal_shutdown();
    tokio::time::sleep(Duration::from_millis(50)).await;
    stream.write_all(body.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.contains(r#""status":"registered""#));

    assert_eq!(server.registry.count().await, 1);
    server.stop().await.unwrap();
}
