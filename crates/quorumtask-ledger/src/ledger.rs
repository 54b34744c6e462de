
use async_trait::async_trait;
use quorumtask_types::{
    AuditRecord, AuditTriggers, DistributionList, NodeId, OperatingMode, Result, Round,
    RoundSubmissions, RoundTiming, TaskDistributionInfo,
};

/// Read side of the task state held by the ledger.
/// Every call returns a fresh snapshot; nothing here is cached by callers.
#[async_trait]
pub trait StateProvider: Send + Sync {
    /// Submissions for a round, or `NoSubmissions` if the round has none
    async fn get_submissions(&self, round: Round) -> Result<RoundSubmissions>;

    /// Submission audit triggers for a round (empty if none were raised)
    async fn get_audit_triggers(&self, round: Round) -> Result<AuditTriggers>;

    /// Distribution submissions, distribution audit triggers and payout records
    async fn get_distribution_info(&self, round: Round) -> Result<TaskDistributionInfo>;

    /// A submitted distribution list, decoded
    async fn get_distribution_list(&self, round: Round, node: &NodeId) -> Result<DistributionList>;

    /// Submission and audit window lengths
    async fn get_round_timing(&self) -> Result<RoundTiming>;

    /// Network average slot duration in milliseconds
    async fn get_average_slot_time_ms(&self) -> Result<u64>;
}

/// Write side: votes, distribution lists and payout.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Cast a vote on a candidate's task submission
    async fn cast_audit_vote(
        &self,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
        round: Round,
    ) -> Result<()>;

    /// Cast a vote on a candidate's distribution list
    async fn cast_distribution_audit_vote(
        &self,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
        round: Round,
    ) -> Result<()>;

    /// Record `list` as `submitter`'s distribution submission for `round`
    async fn submit_distribution_list(
        &self,
        round: Round,
        submitter: &NodeId,
        list: &DistributionList,
    ) -> Result<()>;

    /// Finalize the round's payout and return the resulting record
    async fn trigger_payout(&self, round: Round) -> Result<AuditRecord>;
}

/// Who the local node is, and how it is hosted
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn local_submitter_identity(&self) -> Result<NodeId>;

    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Administered
    }
}

/// Everything a node needs from the ledger
pub trait TaskLedger: StateProvider + LedgerClient + IdentityProvider {}

impl<T> TaskLedger for T where T: StateProvider + LedgerClient + IdentityProvider {}
