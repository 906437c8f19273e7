//! Test helpers for integration tests
//!
//! Spawns the gateway on an ephemeral port over the in-memory store.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chat_common::AppConfig;
use chat_db::{FaultyStore, MemoryStore};
use chat_gateway::{create_app, GatewayState};
use chat_service::{RoomDirectory, ServiceContextBuilder};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::ws::WsClient;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: GatewayState,
    pub store: Arc<MemoryStore>,
    pub faults: Arc<FaultyStore>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the default test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with extra environment-style overrides
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(overrides)?;

        let store = Arc::new(MemoryStore::new());
        let faults = Arc::new(FaultyStore::new(Arc::clone(&store)));
        let ctx = ServiceContextBuilder::new()
            .store(Arc::clone(&faults))
            .build()?;

        let directory = RoomDirectory::new(ctx.clone());
        directory.load().await?;

        let state = GatewayState::new(ctx, Arc::new(directory), config);
        let app = create_app(state.clone())?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            state,
            store,
            faults,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL of the gateway
    pub fn ws_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Open a WebSocket without joining
    pub async fn connect(&self) -> Result<WsClient> {
        WsClient::connect(&self.ws_url()).await
    }

    /// Open a WebSocket and join as `username`, draining the join replies
    pub async fn join(&self, username: &str, room: Option<&str>) -> Result<WsClient> {
        let mut client = self.connect().await?;
        let mut data = serde_json::json!({ "username": username });
        if let Some(room) = room {
            data["room"] = Value::from(room);
        }
        client.send("join", data).await?;
        client.expect("message-history").await?;
        Ok(client)
    }
}

/// Configuration built from defaults plus `overrides`
///
/// The rate limit is raised so tests never trip it unless they ask to.
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "1000"),
        ("HEARTBEAT_INTERVAL_MS", "200"),
        ("HEARTBEAT_TIMEOUT_MS", "5000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json(response: Response, expected_status: StatusCode) -> Result<Value> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Poll until `check` holds or a second passes
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
