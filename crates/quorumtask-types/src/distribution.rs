
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::audit::AuditTriggers;
use crate::node::NodeId;
use crate::round::Round;
use crate::submission::{RoundSubmissions, SubmissionsPerRound};

/// Payout outcome of a round's distribution audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditRecord {
    #[default]
    Uninitialized,
    PayoutSuccessful,
    PayoutFailed,
}

impl AuditRecord {
    pub fn is_final(&self) -> bool {
        !matches!(self, AuditRecord::Uninitialized)
    }

    /// Move out of `Uninitialized`. A finalized record never changes again.
    pub fn finalize(&mut self, outcome: AuditRecord) -> bool {
        if self.is_final() || !outcome.is_final() {
            return false;
        }
        *self = outcome;
        true
    }
}

/// Distribution-side task state, as held by the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDistributionInfo {
    pub distribution_submissions: SubmissionsPerRound,
    pub distribution_audit_triggers: BTreeMap<Round, AuditTriggers>,
    pub audit_record: BTreeMap<Round, AuditRecord>,
}

impl TaskDistributionInfo {
    pub fn submissions_for(&self, round: Round) -> Option<&RoundSubmissions> {
        self.distribution_submissions.get(&round)
    }

    pub fn triggers_for(&self, round: Round) -> AuditTriggers {
        self.distribution_audit_triggers
            .get(&round)
            .cloned()
            .unwrap_or_default()
    }

    pub fn record_for(&self, round: Round) -> AuditRecord {
        self.audit_record.get(&round).copied().unwrap_or_default()
    }
}

/// Reward allocation produced by a round's leader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionList {
    pub round: Round,
    pub rewards: BTreeMap<NodeId, u64>,
    pub slashed: BTreeMap<NodeId, u64>,
}

impl DistributionList {
    pub fn new(round: Round) -> Self {
        DistributionList {
            round,
            rewards: BTreeMap::new(),
            slashed: BTreeMap::new(),
        }
    }

    pub fn total_rewards(&self) -> u64 {
        self.rewards.values().sum()
    }

    /// Canonical JSON form stored as the leader's distribution submission
    pub fn to_canonical_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
