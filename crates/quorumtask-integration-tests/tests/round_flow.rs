// End-to-end round scenarios: audit, leader selection, distribution audit, payout

use async_trait::async_trait;
use quorumtask_audit::{DistributionAuditor, SamplingMode, SubmissionValidator};
use quorumtask_integration_tests::Network;
use quorumtask_ledger::{LedgerClient, MemoryLedger, StateProvider};
use quorumtask_payout::{
    DistributionListSubmitter, DistributionListValidator, LedgerListSubmitter, PayoutPhase,
    RewardPolicy,
};
use quorumtask_selection::NodeSelector;
use quorumtask_types::{AuditRecord, DistributionList, NodeId, QuorumTaskError, Result, Round};
use std::sync::Arc;

const ROUND: Round = 3;

/// Accepts any submission that decoded from a verified payload
struct AcceptAll;

#[async_trait]
impl SubmissionValidator for AcceptAll {
    async fn validate(&self, _value: &str, _round: Round, _node: &NodeId) -> Result<bool> {
        Ok(true)
    }
}

/// Submits a list paying everything to the leader
struct GreedySubmitter {
    ledger: MemoryLedger,
}

#[async_trait]
impl DistributionListSubmitter for GreedySubmitter {
    async fn submit_distribution_list(&self, round: Round, leader: &NodeId) -> Result<()> {
        let mut list = DistributionList::new(round);
        list.rewards.insert(leader.clone(), RewardPolicy::default().bounty_per_round);
        self.ledger
            .submit_distribution_list(round, leader, &list)
            .await
    }
}

/// Four nodes submitting for rounds 1..=3, node 3 tampering with its round 3 payload
async fn network() -> Network {
    let mut network = Network::new(4);
    for round in 1..=ROUND {
        for index in 0..3 {
            network
                .submit(round, index, &format!("result-{}-{}", round, index))
                .await
                .unwrap();
        }
    }
    network.submit(1, 3, "result-1-3").await.unwrap();
    network.submit(2, 3, "result-2-3").await.unwrap();
    network
        .submit_tampered(ROUND, 3, "result-3-3", "something else")
        .await
        .unwrap();
    network
}

async fn audit_everywhere(network: &Network) {
    for index in 0..network.size() {
        network
            .auditor(index)
            .audit_round(ROUND, &AcceptAll, SamplingMode::Exhaustive, true)
            .await
            .unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_round_pays_out() {
    let network = network().await;
    audit_everywhere(&network).await;

    let triggers = network.ledger.get_audit_triggers(ROUND).await.unwrap();
    let cheater = network.node(3);
    assert_eq!(triggers.len(), 1);
    let state = triggers.get(&cheater).unwrap();
    assert_eq!(state.negative_votes(), 3);
    assert!(state.votes.iter().all(|v| v.voter != cheater));
    assert!(state.is_rejected());

    // every node runs the coordinator; only the leader gets past selection
    let policy = RewardPolicy {
        bounty_per_round: 900,
        slash_amount: 10,
    };
    let mut scheduled = Vec::new();
    let mut leaders = Vec::new();
    for index in 0..network.size() {
        let view = Arc::new(network.view(index));
        let outcome = network
            .coordinator(index)
            .select_and_generate_distribution_list(ROUND, false, &LedgerListSubmitter::new(view, policy))
            .await
            .unwrap();
        leaders.push(outcome.leader.node.clone());
        if outcome.phase == PayoutPhase::PayoutScheduled {
            scheduled.push(outcome);
        } else {
            assert_eq!(outcome.phase, PayoutPhase::LeaderSelected);
        }
    }
    leaders.dedup();
    assert_eq!(leaders.len(), 1);
    assert_eq!(scheduled.len(), 1);
    let leader = leaders[0].clone();

    let list = network.ledger.get_distribution_list(ROUND, &leader).await.unwrap();
    assert_eq!(list.slashed.get(&cheater), Some(&10));
    assert!(!list.rewards.contains_key(&cheater));
    assert_eq!(list.total_rewards(), 900);

    // everyone else checks the list and finds nothing to dispute
    for index in 0..network.size() {
        let view = Arc::new(network.view(index));
        let validator = DistributionListValidator::new(view.clone(), policy);
        DistributionAuditor::new(view)
            .audit_distribution_round(ROUND, &validator, SamplingMode::Exhaustive)
            .await
            .unwrap();
    }
    let info = network.ledger.get_distribution_info(ROUND).await.unwrap();
    assert!(info.triggers_for(ROUND).is_empty());

    let (phase, record) = scheduled.remove(0).wait().await.unwrap();
    assert_eq!(phase, PayoutPhase::PayoutTriggered);
    assert_eq!(record, Some(AuditRecord::PayoutSuccessful));
    assert_eq!(network.ledger.payouts().await, vec![ROUND]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_payout_retry_picks_new_leader() {
    let network = network().await;
    audit_everywhere(&network).await;

    let leader = NodeSelector::new(Arc::new(network.view(0)))
        .select(ROUND, false)
        .await
        .unwrap()
        .node;
    let leader_index = network.index_of(&leader).unwrap();

    let greedy = GreedySubmitter {
        ledger: network.view(leader_index),
    };
    let outcome = network
        .coordinator(leader_index)
        .select_and_generate_distribution_list(ROUND, false, &greedy)
        .await
        .unwrap();
    assert_eq!(outcome.phase, PayoutPhase::PayoutScheduled);

    let policy = RewardPolicy::default();
    for index in 0..network.size() {
        let view = Arc::new(network.view(index));
        let validator = DistributionListValidator::new(view.clone(), policy);
        DistributionAuditor::new(view)
            .audit_distribution_round(ROUND, &validator, SamplingMode::Exhaustive)
            .await
            .unwrap();
    }

    let (_, record) = outcome.wait().await.unwrap();
    assert_eq!(record, Some(AuditRecord::PayoutFailed));

    // the failed leader is out of the running on retry
    for previous_failed in [true, false] {
        let retry = NodeSelector::new(Arc::new(network.view(0)))
            .select(ROUND, previous_failed)
            .await
            .unwrap();
        assert_ne!(retry.node, leader);
    }
}

#[tokio::test]
async fn test_empty_round_changes_nothing() {
    let network = network().await;
    let writes = network.ledger.writes().await;

    let err = network
        .auditor(0)
        .audit_round(42, &AcceptAll, SamplingMode::Exhaustive, true)
        .await
        .unwrap_err();
    assert!(matches!(err, QuorumTaskError::NoSubmissions(42)));

    let err = network
        .coordinator(0)
        .selector()
        .select(42, false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(network.ledger.writes().await, writes);
    assert!(network.ledger.get_audit_triggers(42).await.unwrap().is_empty());
}
