use quorumtask_ledger::TaskLedger;
use quorumtask_selection::NodeSelector;
use quorumtask_types::{AuditRecord, QuorumTaskError, Result, Round, SelectedNode};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::phase::PayoutPhase;
use crate::submitter::DistributionListSubmitter;

/// Result of driving one round through the payout flow
#[derive(Debug)]
pub struct RoundOutcome {
    pub leader: SelectedNode,
    /// Phase reached when the call returned
    pub phase: PayoutPhase,
    /// Pending payout timer. Dropping the handle does not cancel it.
    pub payout: Option<JoinHandle<Result<AuditRecord>>>,
}

impl RoundOutcome {
    /// Wait for the scheduled payout, if there is one
    pub async fn wait(self) -> Result<(PayoutPhase, Option<AuditRecord>)> {
        match self.payout {
            None => Ok((self.phase, None)),
            Some(handle) => {
                let record = handle
                    .await
                    .map_err(|e| QuorumTaskError::Internal(format!("payout task: {}", e)))??;
                Ok((PayoutPhase::PayoutTriggered, Some(record)))
            }
        }
    }
}

/// Runs leader selection, list submission and the delayed payout trigger
pub struct PayoutCoordinator<L: ?Sized> {
    ledger: Arc<L>,
    selector: NodeSelector<L>,
}

impl<L> PayoutCoordinator<L>
where
    L: TaskLedger + ?Sized + 'static,
{
    pub fn new(ledger: Arc<L>) -> Self {
        PayoutCoordinator {
            selector: NodeSelector::new(ledger.clone()),
            ledger,
        }
    }

    pub fn selector(&self) -> &NodeSelector<L> {
        &self.selector
    }

    /// Select the round's leader and, if that is us, submit the list and
    /// schedule payout once both round windows have passed.
    ///
    /// Fails only when no leader can be selected or the submission itself
    /// fails. Missing timing leaves the round at `ListSubmitted`.
    pub async fn select_and_generate_distribution_list<S>(
        &self,
        round: Round,
        previous_failed: bool,
        submitter: &S,
    ) -> Result<RoundOutcome>
    where
        S: DistributionListSubmitter + ?Sized,
    {
        let leader = self.selector.select(round, previous_failed).await?;
        let local = self.ledger.local_submitter_identity().await?;

        if leader.node != local {
            info!(round, leader = %leader.node, "not the leader for this round");
            return Ok(RoundOutcome {
                leader,
                phase: PayoutPhase::LeaderSelected,
                payout: None,
            });
        }

        submitter.submit_distribution_list(round, &local).await?;

        let delay_ms = match self.payout_delay_ms().await {
            Ok(ms) => ms,
            Err(e) => {
                warn!(round, error = %e, "round timing unavailable, payout not scheduled");
                return Ok(RoundOutcome {
                    leader,
                    phase: PayoutPhase::ListSubmitted,
                    payout: None,
                });
            }
        };

        info!(round, delay_ms, "payout scheduled");
        let ledger = self.ledger.clone();
        let payout = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            trigger(ledger.as_ref(), round).await
        });

        Ok(RoundOutcome {
            leader,
            phase: PayoutPhase::PayoutScheduled,
            payout: Some(payout),
        })
    }

    /// Trigger payout for `round` right away
    pub async fn payout_trigger(&self, round: Round) -> Result<AuditRecord> {
        trigger(self.ledger.as_ref(), round).await
    }

    async fn payout_delay_ms(&self) -> Result<u64> {
        let timing = self.ledger.get_round_timing().await?;
        let average = self.ledger.get_average_slot_time_ms().await?;
        Ok(timing.payout_delay_ms(average))
    }
}

async fn trigger<L>(ledger: &L, round: Round) -> Result<AuditRecord>
where
    L: TaskLedger + ?Sized,
{
    match ledger.trigger_payout(round).await {
        Ok(record) => {
            info!(round, ?record, "payout triggered");
            Ok(record)
        }
        Err(e) => {
            warn!(round, error = %e, "payout trigger failed");
            Err(e)
        }
    }
}
