use quorumtask_ledger::TaskLedger;
use quorumtask_types::{
    AuditRecord, NodeId, QuorumTaskError, Result, Round, RoundSubmissions, SelectedNode,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::scoring::{pick, score_candidates};

/// Deterministic leader election for a round's distribution list
pub struct NodeSelector<L: ?Sized> {
    ledger: Arc<L>,
}

impl<L> NodeSelector<L>
where
    L: TaskLedger + ?Sized,
{
    pub fn new(ledger: Arc<L>) -> Self {
        NodeSelector { ledger }
    }

    /// Choose the node that produces the distribution list for `round`.
    ///
    /// `previous_failed` moves the choice to the runner-up score.
    pub async fn select(&self, round: Round, previous_failed: bool) -> Result<SelectedNode> {
        let candidates = self.candidates(round).await?;
        let scored = score_candidates(&candidates)?;
        let selected = pick(&scored, previous_failed).ok_or(QuorumTaskError::NoSubmissions(round))?;

        info!(
            round,
            previous_failed,
            candidates = candidates.len(),
            leader = %selected.node,
            score = selected.score,
            "leader selected"
        );
        Ok(selected)
    }

    /// Candidate submissions for `round` after the history and failure filters
    pub async fn candidates(&self, round: Round) -> Result<RoundSubmissions> {
        let current = self.ledger.get_submissions(round).await?;

        let mut stable: BTreeSet<NodeId> = current.keys().cloned().collect();
        for back in 1..=2 {
            let history = match round.checked_sub(back) {
                Some(previous) => self.history_keys(previous).await,
                None => BTreeSet::new(),
            };
            stable.retain(|node| history.contains(node));
        }

        let mut candidates: RoundSubmissions = if stable.is_empty() {
            debug!(round, "no node submitted in all three rounds, using current round");
            current
        } else {
            current
                .into_iter()
                .filter(|(node, _)| stable.contains(node))
                .collect()
        };

        let info = match self.ledger.get_distribution_info(round).await {
            Ok(info) => Some(info),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        if let Some(info) = info {
            if info.record_for(round) == AuditRecord::PayoutFailed {
                if let Some(failed) = info.submissions_for(round) {
                    candidates.retain(|node, _| !failed.contains_key(node));
                    debug!(round, excluded = failed.len(), "excluding previous list submitters");
                }
            }
        }

        if candidates.is_empty() {
            return Err(QuorumTaskError::NoSubmissions(round));
        }
        Ok(candidates)
    }

    async fn history_keys(&self, round: Round) -> BTreeSet<NodeId> {
        match self.ledger.get_submissions(round).await {
            Ok(subs) => subs.into_keys().collect(),
            Err(e) => {
                debug!(round, error = %e, "no submission history");
                BTreeSet::new()
            }
        }
    }
}
