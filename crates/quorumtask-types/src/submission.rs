
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::node::NodeId;
use crate::round::Round;

/// A node's reported result for a round. `value` is either the result
/// itself or a content id pointing at an off-chain payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub value: String,
    pub slot: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<Round>,
}

impl Submission {
    pub fn new(value: impl Into<String>, slot: u64) -> Self {
        Submission {
            value: value.into(),
            slot,
            round: None,
        }
    }

    pub fn with_round(mut self, round: Round) -> Self {
        self.round = Some(round);
        self
    }
}

/// One round's submissions, keyed by submitter. At most one entry per node.
pub type RoundSubmissions = BTreeMap<NodeId, Submission>;

/// All recorded rounds
pub type SubmissionsPerRound = BTreeMap<Round, RoundSubmissions>;
