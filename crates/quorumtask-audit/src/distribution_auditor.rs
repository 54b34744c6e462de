use quorumtask_ledger::TaskLedger;
use quorumtask_types::{NodeId, QuorumTaskError, Result, Round, Submission};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::sampling::SamplingMode;
use crate::submission_auditor::AuditSummary;
use crate::validator::SubmissionValidator;

/// Audits the distribution lists submitted for a round.
/// Values are handed to the validator as stored; there is no content fetch.
pub struct DistributionAuditor<L: ?Sized> {
    ledger: Arc<L>,
}

impl<L> DistributionAuditor<L>
where
    L: TaskLedger + ?Sized,
{
    pub fn new(ledger: Arc<L>) -> Self {
        DistributionAuditor { ledger }
    }

    pub async fn audit_distribution_round<V>(
        &self,
        round: Round,
        validator: &V,
        sampling: SamplingMode,
    ) -> Result<AuditSummary>
    where
        V: SubmissionValidator + ?Sized,
    {
        let info = self.ledger.get_distribution_info(round).await?;
        let submissions = info
            .submissions_for(round)
            .cloned()
            .ok_or(QuorumTaskError::DistributionNotFound(round))?;
        let local = self.ledger.local_submitter_identity().await?;
        let allow_self = self.ledger.operating_mode().allows_self_votes();

        let candidates: Vec<(NodeId, Submission)> = submissions.into_iter().collect();
        let picked = sampling.select_indices(candidates.len());
        info!(
            round,
            submissions = candidates.len(),
            sampled = picked.len(),
            "auditing distribution lists"
        );

        let mut summary = AuditSummary::new(round);
        for index in picked {
            let (candidate, submission) = &candidates[index];
            if candidate == &local && !allow_self {
                summary.skipped_self += 1;
                continue;
            }

            let verdict = match validator.validate(&submission.value, round, candidate).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(round, %candidate, error = %e, "could not evaluate distribution list");
                    summary.failures += 1;
                    continue;
                }
            };

            summary.tally(verdict);

            match self.cast_vote(round, candidate, verdict, &local).await {
                Ok(true) => summary.recorded += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(round, %candidate, error = %e, "distribution audit vote failed");
                    summary.failures += 1;
                }
            }
        }

        info!(
            round,
            evaluated = summary.evaluated,
            negative = summary.negative,
            recorded = summary.recorded,
            "distribution audit finished"
        );
        Ok(summary)
    }

    async fn cast_vote(
        &self,
        round: Round,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
    ) -> Result<bool> {
        if is_valid {
            let info = self.ledger.get_distribution_info(round).await?;
            if !info.triggers_for(round).is_open(candidate) {
                debug!(round, %candidate, "distribution valid, no open audit");
                return Ok(false);
            }
        }

        self.ledger
            .cast_distribution_audit_vote(candidate, is_valid, voter, round)
            .await?;
        Ok(true)
    }
}
