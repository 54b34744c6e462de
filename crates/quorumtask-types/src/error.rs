
use thiserror::Error;

use crate::round::Round;

#[derive(Debug, Error)]
pub enum QuorumTaskError {
    #[error("No submissions for round {0}")]
    NoSubmissions(Round),

    #[error("No distribution info for round {0}")]
    DistributionNotFound(Round),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Content mismatch: signed={expected}, computed={actual}")]
    ContentMismatch { expected: String, actual: String },

    #[error("Round timing unavailable: {0}")]
    TimingUnavailable(String),

    #[error("All gateways failed for content: {0}")]
    GatewayExhausted(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuorumTaskError {
    /// True for the "nothing recorded for this round" family of errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QuorumTaskError::NoSubmissions(_) | QuorumTaskError::DistributionNotFound(_)
        )
    }
}

impl From<serde_json::Error> for QuorumTaskError {
    fn from(e: serde_json::Error) -> Self {
        QuorumTaskError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuorumTaskError>;
