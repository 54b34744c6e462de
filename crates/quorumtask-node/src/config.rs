use quorumtask_audit::{SamplingMode, DEFAULT_SUBMISSION_FILE};
use quorumtask_content::{default_gateways, GatewayTemplate, DEFAULT_GATEWAY_TIMEOUT};
use quorumtask_payout::RewardPolicy;
use quorumtask_types::{NodeId, OperatingMode, QuorumTaskError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Node configuration, read from a JSON file. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Whether the node may vote on its own submissions
    pub mode: OperatingMode,

    /// Base URL of the host process serving the ledger
    pub rpc_url: String,

    /// Timeout for a single ledger call
    pub rpc_timeout_ms: u64,

    /// Local submitter identity (hex ed25519 public key)
    pub identity: String,

    /// Content gateways, tried in order
    pub gateways: Vec<GatewayTemplate>,

    /// Per-gateway fetch timeout
    pub gateway_timeout_ms: u64,

    /// File fetched from a submission's content id
    pub submission_file: String,

    pub sampling: SamplingMode,

    /// Fetch and verify off-chain payloads before validating
    pub verify_content: bool,

    /// Reward parameters used to generate and check distribution lists
    pub rewards: RewardPolicy,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            mode: OperatingMode::Administered,
            rpc_url: "http://127.0.0.1:8899".to_string(),
            rpc_timeout_ms: 10_000,
            identity: String::new(),
            gateways: default_gateways(),
            gateway_timeout_ms: DEFAULT_GATEWAY_TIMEOUT.as_millis() as u64,
            submission_file: DEFAULT_SUBMISSION_FILE.to_string(),
            sampling: SamplingMode::default(),
            verify_content: true,
            rewards: RewardPolicy::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl NodeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| QuorumTaskError::Config(format!("{}: {}", path.display(), e)))?;
        let config: NodeConfig = serde_json::from_str(&raw)
            .map_err(|e| QuorumTaskError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateways.is_empty() {
            return Err(QuorumTaskError::Config("at least one gateway is required".to_string()));
        }
        if self.gateway_timeout_ms == 0 || self.rpc_timeout_ms == 0 {
            return Err(QuorumTaskError::Config("timeouts must be non-zero".to_string()));
        }
        if self.submission_file.is_empty() {
            return Err(QuorumTaskError::Config("submission_file is empty".to_string()));
        }
        if self.sampling == SamplingMode::Random(0) {
            return Err(QuorumTaskError::Config("random sampling needs k > 0".to_string()));
        }
        Ok(())
    }

    /// Configured identity; required for anything that talks to the ledger
    pub fn node_id(&self) -> Result<NodeId> {
        let identity = self.identity.trim();
        if identity.is_empty() {
            return Err(QuorumTaskError::Config("identity is not set".to_string()));
        }
        Ok(NodeId::new(identity))
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
