use async_trait::async_trait;
use quorumtask_ledger::TaskLedger;
use quorumtask_types::{NodeId, Result, Round};
use std::sync::Arc;
use tracing::info;

use crate::rewards::{generate_distribution_list, RewardPolicy};

/// Invoked on the leader to publish the round's distribution list
#[async_trait]
pub trait DistributionListSubmitter: Send + Sync {
    async fn submit_distribution_list(&self, round: Round, leader: &NodeId) -> Result<()>;
}

/// Generates the list from ledger state and submits it through the same ledger
pub struct LedgerListSubmitter<L: ?Sized> {
    ledger: Arc<L>,
    policy: RewardPolicy,
}

impl<L: ?Sized> LedgerListSubmitter<L> {
    pub fn new(ledger: Arc<L>, policy: RewardPolicy) -> Self {
        LedgerListSubmitter { ledger, policy }
    }
}

#[async_trait]
impl<L> DistributionListSubmitter for LedgerListSubmitter<L>
where
    L: TaskLedger + ?Sized,
{
    async fn submit_distribution_list(&self, round: Round, leader: &NodeId) -> Result<()> {
        let submissions = self.ledger.get_submissions(round).await?;
        let triggers = self.ledger.get_audit_triggers(round).await?;
        let list = generate_distribution_list(round, &submissions, &triggers, &self.policy);

        self.ledger
            .submit_distribution_list(round, leader, &list)
            .await?;
        info!(
            round,
            rewarded = list.rewards.len(),
            slashed = list.slashed.len(),
            total = list.total_rewards(),
            "distribution list submitted"
        );
        Ok(())
    }
}
