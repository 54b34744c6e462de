
use async_trait::async_trait;
use quorumtask_types::{
    AuditRecord, AuditTriggers, AuditVote, DistributionList, NodeId, OperatingMode,
    QuorumTaskError, Result, Round, RoundSubmissions, RoundTiming, Submission,
    TaskDistributionInfo, TaskSubmissionState,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ledger::{IdentityProvider, LedgerClient, StateProvider};

/// Starting state for a `MemoryLedger`, built per test
#[derive(Debug, Clone)]
pub struct LedgerFixture {
    pub identity: NodeId,
    pub mode: OperatingMode,
    pub task_state: TaskSubmissionState,
    pub distribution: TaskDistributionInfo,
    pub distribution_lists: BTreeMap<Round, BTreeMap<NodeId, DistributionList>>,
    pub timing: Option<RoundTiming>,
    pub average_slot_time_ms: Option<u64>,
    pub slot: u64,
}

impl LedgerFixture {
    /// Standalone fixture for the given local identity
    pub fn new(identity: impl Into<NodeId>) -> Self {
        LedgerFixture {
            identity: identity.into(),
            mode: OperatingMode::Standalone,
            task_state: TaskSubmissionState::default(),
            distribution: TaskDistributionInfo::default(),
            distribution_lists: BTreeMap::new(),
            timing: Some(RoundTiming::new(10, 10)),
            average_slot_time_ms: Some(400),
            slot: 1,
        }
    }

    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_submission(mut self, round: Round, node: &str, value: &str) -> Self {
        let slot = self.next_slot();
        self.task_state
            .submissions
            .entry(round)
            .or_default()
            .insert(NodeId::new(node), Submission::new(value, slot).with_round(round));
        self
    }

    pub fn with_distribution_submission(mut self, round: Round, node: &str, value: &str) -> Self {
        let slot = self.next_slot();
        self.distribution
            .distribution_submissions
            .entry(round)
            .or_default()
            .insert(NodeId::new(node), Submission::new(value, slot).with_round(round));
        self
    }

    /// Pre-open an audit trigger with a negative vote from `voter`
    pub fn with_audit_trigger(mut self, round: Round, candidate: &str, voter: &str) -> Self {
        let slot = self.next_slot();
        self.task_state
            .audit_triggers
            .entry(round)
            .or_default()
            .record_vote(&NodeId::new(candidate), AuditVote::new(false, NodeId::new(voter), slot));
        self
    }

    pub fn with_audit_record(mut self, round: Round, record: AuditRecord) -> Self {
        self.distribution.audit_record.insert(round, record);
        self
    }

    pub fn with_timing(mut self, timing: Option<RoundTiming>) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_average_slot_time(mut self, ms: Option<u64>) -> Self {
        self.average_slot_time_ms = ms;
        self
    }

    fn next_slot(&mut self) -> u64 {
        let slot = self.slot;
        self.slot += 1;
        slot
    }
}

#[derive(Debug)]
struct MemoryState {
    fixture: LedgerFixture,
    writes: usize,
    payouts: Vec<Round>,
}

/// In-memory ledger for standalone runs and tests.
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    state: Arc<RwLock<MemoryState>>,
    mode: OperatingMode,
    identity: Option<NodeId>,
}

impl MemoryLedger {
    pub fn new(fixture: LedgerFixture) -> Self {
        let mode = fixture.mode;
        MemoryLedger {
            state: Arc::new(RwLock::new(MemoryState {
                fixture,
                writes: 0,
                payouts: Vec::new(),
            })),
            mode,
            identity: None,
        }
    }

    /// A view of the same state acting as another node
    pub fn as_node(&self, identity: impl Into<NodeId>) -> Self {
        MemoryLedger {
            state: self.state.clone(),
            mode: self.mode,
            identity: Some(identity.into()),
        }
    }

    /// Number of writes that actually changed state
    pub async fn writes(&self) -> usize {
        self.state.read().await.writes
    }

    /// Rounds for which payout was triggered, in call order
    pub async fn payouts(&self) -> Vec<Round> {
        self.state.read().await.payouts.clone()
    }

    pub async fn add_submission(&self, round: Round, node: &NodeId, value: &str) {
        let mut state = self.state.write().await;
        let slot = state.fixture.next_slot();
        state
            .fixture
            .task_state
            .submissions
            .entry(round)
            .or_default()
            .insert(node.clone(), Submission::new(value, slot).with_round(round));
    }
}

#[async_trait]
impl StateProvider for MemoryLedger {
    async fn get_submissions(&self, round: Round) -> Result<RoundSubmissions> {
        let state = self.state.read().await;
        state
            .fixture
            .task_state
            .submissions_for(round)
            .cloned()
            .ok_or(QuorumTaskError::NoSubmissions(round))
    }

    async fn get_audit_triggers(&self, round: Round) -> Result<AuditTriggers> {
        Ok(self.state.read().await.fixture.task_state.triggers_for(round))
    }

    async fn get_distribution_info(&self, _round: Round) -> Result<TaskDistributionInfo> {
        Ok(self.state.read().await.fixture.distribution.clone())
    }

    async fn get_distribution_list(&self, round: Round, node: &NodeId) -> Result<DistributionList> {
        let state = self.state.read().await;
        if let Some(list) = state
            .fixture
            .distribution_lists
            .get(&round)
            .and_then(|lists| lists.get(node))
        {
            return Ok(list.clone());
        }

        let submission = state
            .fixture
            .distribution
            .submissions_for(round)
            .and_then(|subs| subs.get(node))
            .ok_or(QuorumTaskError::DistributionNotFound(round))?;
        DistributionList::from_json(&submission.value)
    }

    async fn get_round_timing(&self) -> Result<RoundTiming> {
        self.state
            .read()
            .await
            .fixture
            .timing
            .ok_or_else(|| QuorumTaskError::TimingUnavailable("round timing not set".to_string()))
    }

    async fn get_average_slot_time_ms(&self) -> Result<u64> {
        self.state
            .read()
            .await
            .fixture
            .average_slot_time_ms
            .ok_or_else(|| {
                QuorumTaskError::TimingUnavailable("average slot time not set".to_string())
            })
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn cast_audit_vote(
        &self,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
        round: Round,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let slot = state.fixture.next_slot();
        let written = state
            .fixture
            .task_state
            .audit_triggers
            .entry(round)
            .or_default()
            .record_vote(candidate, AuditVote::new(is_valid, voter.clone(), slot));
        if written {
            state.writes += 1;
        }
        Ok(())
    }

    async fn cast_distribution_audit_vote(
        &self,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
        round: Round,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let slot = state.fixture.next_slot();
        let written = state
            .fixture
            .distribution
            .distribution_audit_triggers
            .entry(round)
            .or_default()
            .record_vote(candidate, AuditVote::new(is_valid, voter.clone(), slot));
        if written {
            state.writes += 1;
        }
        Ok(())
    }

    async fn submit_distribution_list(
        &self,
        round: Round,
        submitter: &NodeId,
        list: &DistributionList,
    ) -> Result<()> {
        let value = list.to_canonical_json()?;
        let mut state = self.state.write().await;
        let slot = state.fixture.next_slot();
        state
            .fixture
            .distribution
            .distribution_submissions
            .entry(round)
            .or_default()
            .insert(submitter.clone(), Submission::new(value, slot).with_round(round));
        state
            .fixture
            .distribution_lists
            .entry(round)
            .or_default()
            .insert(submitter.clone(), list.clone());
        state.writes += 1;
        Ok(())
    }

    async fn trigger_payout(&self, round: Round) -> Result<AuditRecord> {
        let mut state = self.state.write().await;
        let outcome = if state
            .fixture
            .distribution
            .triggers_for(round)
            .rejected()
            .next()
            .is_some()
        {
            AuditRecord::PayoutFailed
        } else {
            AuditRecord::PayoutSuccessful
        };

        let record = state
            .fixture
            .distribution
            .audit_record
            .entry(round)
            .or_default();
        let changed = record.finalize(outcome);
        let current = *record;
        if changed {
            state.writes += 1;
        }
        state.payouts.push(round);
        Ok(current)
    }
}

#[async_trait]
impl IdentityProvider for MemoryLedger {
    async fn local_submitter_identity(&self) -> Result<NodeId> {
        if let Some(identity) = &self.identity {
            return Ok(identity.clone());
        }
        Ok(self.state.read().await.fixture.identity.clone())
    }

    fn operating_mode(&self) -> OperatingMode {
        self.mode
    }
}
