
use async_trait::async_trait;
use quorumtask_types::{QuorumTaskError, Result};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::gateway::{default_gateways, GatewayTemplate};

pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of immutable content blobs addressed by content id
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, cid: &str, file: &str) -> Result<String>;
}

/// Retrieves content from an ordered gateway list, one gateway at a time.
///
/// The first gateway whose body does not look like an HTML error page wins.
/// Each attempt is aborted after `timeout`; there is no retry within a gateway.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    gateways: Vec<GatewayTemplate>,
    timeout: Duration,
}

impl ContentFetcher {
    pub fn new(gateways: Vec<GatewayTemplate>, timeout: Duration) -> Self {
        ContentFetcher {
            client: Client::new(),
            gateways,
            timeout,
        }
    }

    async fn fetch_one(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QuorumTaskError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(QuorumTaskError::Transport(format!("status {}", status)));
        }
        resp.text()
            .await
            .map_err(|e| QuorumTaskError::Transport(e.to_string()))
    }
}

impl Default for ContentFetcher {
    fn default() -> Self {
        Self::new(default_gateways(), DEFAULT_GATEWAY_TIMEOUT)
    }
}

/// Gateways answer missing content with an HTML page instead of an error
fn looks_like_error_page(body: &str) -> bool {
    body.starts_with('<')
}

#[async_trait]
impl ContentSource for ContentFetcher {
    async fn fetch(&self, cid: &str, file: &str) -> Result<String> {
        for gateway in &self.gateways {
            let url = gateway.render(cid, file);
            match tokio::time::timeout(self.timeout, self.fetch_one(&url)).await {
                Ok(Ok(body)) if !looks_like_error_page(&body) => {
                    debug!(cid, gateway = gateway.as_str(), "content fetched");
                    return Ok(body);
                }
                Ok(Ok(_)) => warn!(cid, gateway = gateway.as_str(), "gateway returned an HTML page"),
                Ok(Err(e)) => warn!(cid, gateway = gateway.as_str(), error = %e, "gateway request failed"),
                Err(_) => warn!(
                    cid,
                    gateway = gateway.as_str(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "gateway timed out"
                ),
            }
        }
        Err(QuorumTaskError::GatewayExhausted(cid.to_string()))
    }
}

/// Content held in memory, keyed by (cid, file)
#[derive(Debug, Clone, Default)]
pub struct MemoryContent {
    blobs: BTreeMap<(String, String), String>,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cid: &str, file: &str, body: impl Into<String>) {
        self.blobs
            .insert((cid.to_string(), file.to_string()), body.into());
    }

    pub fn with(mut self, cid: &str, file: &str, body: impl Into<String>) -> Self {
        self.insert(cid, file, body);
        self
    }
}

#[async_trait]
impl ContentSource for MemoryContent {
    async fn fetch(&self, cid: &str, file: &str) -> Result<String> {
        self.blobs
            .get(&(cid.to_string(), file.to_string()))
            .cloned()
            .ok_or_else(|| QuorumTaskError::GatewayExhausted(cid.to_string()))
    }
}
