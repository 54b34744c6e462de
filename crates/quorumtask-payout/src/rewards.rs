use async_trait::async_trait;
use quorumtask_audit::SubmissionValidator;
use quorumtask_ledger::TaskLedger;
use quorumtask_types::{AuditTriggers, DistributionList, NodeId, Result, Round, RoundSubmissions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Reward parameters for distribution lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Split equally among the round's accepted submitters
    pub bounty_per_round: u64,
    /// Listed against every submitter whose audit ended in rejection
    pub slash_amount: u64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        RewardPolicy {
            bounty_per_round: 1_000_000,
            slash_amount: 0,
        }
    }
}

/// Build the distribution list for a round.
///
/// Submitters whose audit trigger has a negative majority are slashed and
/// get nothing. The rest share the bounty equally; the remainder of the
/// integer division is not paid out.
pub fn generate_distribution_list(
    round: Round,
    submissions: &RoundSubmissions,
    triggers: &AuditTriggers,
    policy: &RewardPolicy,
) -> DistributionList {
    let rejected: BTreeSet<&NodeId> = triggers.rejected().collect();
    let mut list = DistributionList::new(round);

    let accepted: Vec<&NodeId> = submissions
        .keys()
        .filter(|node| !rejected.contains(node))
        .collect();
    for node in submissions.keys().filter(|node| rejected.contains(node)) {
        list.slashed.insert(node.clone(), policy.slash_amount);
    }

    if !accepted.is_empty() {
        let share = policy.bounty_per_round / accepted.len() as u64;
        for node in accepted {
            list.rewards.insert(node.clone(), share);
        }
    }
    list
}

/// Judges a submitted distribution list by regenerating it from ledger state
pub struct DistributionListValidator<L: ?Sized> {
    ledger: Arc<L>,
    policy: RewardPolicy,
}

impl<L: ?Sized> DistributionListValidator<L> {
    pub fn new(ledger: Arc<L>, policy: RewardPolicy) -> Self {
        DistributionListValidator { ledger, policy }
    }
}

#[async_trait]
impl<L> SubmissionValidator for DistributionListValidator<L>
where
    L: TaskLedger + ?Sized,
{
    async fn validate(&self, value: &str, round: Round, node: &NodeId) -> Result<bool> {
        let submitted = match DistributionList::from_json(value) {
            Ok(list) => list,
            Err(e) => {
                debug!(round, %node, error = %e, "distribution list does not parse");
                return Ok(false);
            }
        };

        let submissions = self.ledger.get_submissions(round).await?;
        let triggers = self.ledger.get_audit_triggers(round).await?;
        let expected = generate_distribution_list(round, &submissions, &triggers, &self.policy);
        Ok(submitted == expected)
    }
}
