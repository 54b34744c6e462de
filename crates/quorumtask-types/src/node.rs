
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public identity of a node (hex-encoded ed25519 public key on the network)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

/// How the node is hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Running under a host process on the live network
    #[default]
    Administered,
    /// Single-process test flows against in-memory state
    Standalone,
}

impl OperatingMode {
    /// Standalone flows are allowed to vote on their own submissions
    pub fn allows_self_votes(&self) -> bool {
        matches!(self, OperatingMode::Standalone)
    }
}

/// Leader chosen for a round's distribution list. Never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedNode {
    pub score: u64,
    pub node: NodeId,
}
