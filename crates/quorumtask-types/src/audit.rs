
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::node::NodeId;
use crate::round::Round;
use crate::submission::{RoundSubmissions, SubmissionsPerRound};

/// A single verdict on a candidate's submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditVote {
    pub is_valid: bool,
    pub voter: NodeId,
    pub slot: u64,
}

impl AuditVote {
    pub fn new(is_valid: bool, voter: NodeId, slot: u64) -> Self {
        AuditVote {
            is_valid,
            voter,
            slot,
        }
    }
}

/// Audit opened against one candidate in one round. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTriggerState {
    pub triggered_by: NodeId,
    pub slot: u64,
    pub votes: Vec<AuditVote>,
}

impl AuditTriggerState {
    fn open(first: AuditVote) -> Self {
        AuditTriggerState {
            triggered_by: first.voter.clone(),
            slot: first.slot,
            votes: vec![first],
        }
    }

    pub fn positive_votes(&self) -> usize {
        self.votes.iter().filter(|v| v.is_valid).count()
    }

    pub fn negative_votes(&self) -> usize {
        self.votes.iter().filter(|v| !v.is_valid).count()
    }

    /// Strictly more negative than positive votes
    pub fn is_rejected(&self) -> bool {
        self.negative_votes() > self.positive_votes()
    }
}

/// Audit triggers for a single round, keyed by candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTriggers(BTreeMap<NodeId, AuditTriggerState>);

impl AuditTriggers {
    pub fn new() -> Self {
        AuditTriggers(BTreeMap::new())
    }

    pub fn get(&self, candidate: &NodeId) -> Option<&AuditTriggerState> {
        self.0.get(candidate)
    }

    /// Whether an audit has already been raised against `candidate`
    pub fn is_open(&self, candidate: &NodeId) -> bool {
        self.0.contains_key(candidate)
    }

    /// Record a vote under the open-trigger rule.
    ///
    /// A negative vote opens the trigger if needed and is always appended.
    /// A positive vote is only appended to an already open trigger.
    /// Returns whether anything was written.
    pub fn record_vote(&mut self, candidate: &NodeId, vote: AuditVote) -> bool {
        match self.0.get_mut(candidate) {
            Some(trigger) => {
                trigger.votes.push(vote);
                true
            }
            None if !vote.is_valid => {
                self.0.insert(candidate.clone(), AuditTriggerState::open(vote));
                true
            }
            None => false,
        }
    }

    /// Candidates whose audit ended with a negative majority
    pub fn rejected(&self) -> impl Iterator<Item = &NodeId> {
        self.0
            .iter()
            .filter(|(_, trigger)| trigger.is_rejected())
            .map(|(node, _)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &AuditTriggerState)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submission-side task state, as held by the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSubmissionState {
    pub submissions: SubmissionsPerRound,
    pub audit_triggers: BTreeMap<Round, AuditTriggers>,
}

impl TaskSubmissionState {
    pub fn submissions_for(&self, round: Round) -> Option<&RoundSubmissions> {
        self.submissions.get(&round)
    }

    pub fn triggers_for(&self, round: Round) -> AuditTriggers {
        self.audit_triggers.get(&round).cloned().unwrap_or_default()
    }
}
