use quorumtask_content::{verify_signed_submission, ContentSource, SignatureVerifier};
use quorumtask_ledger::TaskLedger;
use quorumtask_types::{NodeId, QuorumTaskError, Result, Round, Submission};
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::sampling::SamplingMode;
use crate::validator::SubmissionValidator;

/// File fetched from a content id when verifying off-chain submissions
pub const DEFAULT_SUBMISSION_FILE: &str = "submission.json";

/// What one audit pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub round: Round,
    /// Candidates whose verdict was reached
    pub evaluated: usize,
    pub positive: usize,
    pub negative: usize,
    /// Votes actually sent to the ledger
    pub recorded: usize,
    pub skipped_self: usize,
    /// Candidates dropped because evaluation or the vote write failed
    pub failures: usize,
}

impl AuditSummary {
    pub(crate) fn new(round: Round) -> Self {
        AuditSummary {
            round,
            ..Default::default()
        }
    }

    pub(crate) fn tally(&mut self, verdict: bool) {
        self.evaluated += 1;
        if verdict {
            self.positive += 1;
        } else {
            self.negative += 1;
        }
    }
}

/// Samples a round's task submissions, checks them and votes.
pub struct SubmissionAuditor<L: ?Sized> {
    ledger: Arc<L>,
    content: Arc<dyn ContentSource>,
    verifier: Arc<dyn SignatureVerifier>,
    file_name: String,
}

impl<L> SubmissionAuditor<L>
where
    L: TaskLedger + ?Sized,
{
    pub fn new(
        ledger: Arc<L>,
        content: Arc<dyn ContentSource>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        SubmissionAuditor {
            ledger,
            content,
            verifier,
            file_name: DEFAULT_SUBMISSION_FILE.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Audit `round`: validate the sampled candidates and cast votes.
    ///
    /// Fails only with `NoSubmissions` (or an identity lookup error); every
    /// per-candidate problem is logged and counted in the summary instead.
    pub async fn audit_round<V>(
        &self,
        round: Round,
        validator: &V,
        sampling: SamplingMode,
        verify_content: bool,
    ) -> Result<AuditSummary>
    where
        V: SubmissionValidator + ?Sized,
    {
        let submissions = self.ledger.get_submissions(round).await?;
        let local = self.ledger.local_submitter_identity().await?;
        let allow_self = self.ledger.operating_mode().allows_self_votes();

        let candidates: Vec<(NodeId, Submission)> = submissions.into_iter().collect();
        let picked = sampling.select_indices(candidates.len());
        info!(
            round,
            submissions = candidates.len(),
            sampled = picked.len(),
            verify_content,
            "auditing submissions"
        );

        let mut summary = AuditSummary::new(round);
        for index in picked {
            let (candidate, submission) = &candidates[index];
            if candidate == &local && !allow_self {
                debug!(round, %candidate, "skipping own submission");
                summary.skipped_self += 1;
                continue;
            }

            let verdict = match self
                .evaluate(round, candidate, submission, validator, verify_content)
                .await
            {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(round, %candidate, error = %e, "could not evaluate submission");
                    summary.failures += 1;
                    continue;
                }
            };

            summary.tally(verdict);

            match self.cast_vote(round, candidate, verdict, &local).await {
                Ok(true) => summary.recorded += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(round, %candidate, error = %e, "audit vote failed");
                    summary.failures += 1;
                }
            }
        }

        info!(
            round,
            evaluated = summary.evaluated,
            negative = summary.negative,
            recorded = summary.recorded,
            failures = summary.failures,
            "submission audit finished"
        );
        Ok(summary)
    }

    async fn evaluate<V>(
        &self,
        round: Round,
        candidate: &NodeId,
        submission: &Submission,
        validator: &V,
        verify_content: bool,
    ) -> Result<bool>
    where
        V: SubmissionValidator + ?Sized,
    {
        if !verify_content {
            return validator.validate(&submission.value, round, candidate).await;
        }

        let body = self.content.fetch(&submission.value, &self.file_name).await?;
        match verify_signed_submission(&body, candidate, self.verifier.as_ref()) {
            Ok(raw) => validator.validate(&raw, round, candidate).await,
            Err(e @ QuorumTaskError::InvalidSignature(_))
            | Err(e @ QuorumTaskError::ContentMismatch { .. }) => {
                debug!(round, %candidate, reason = %e, "off-chain content rejected");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Negative votes always go out. Positive votes only when someone has
    /// already opened an audit on this candidate.
    async fn cast_vote(
        &self,
        round: Round,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
    ) -> Result<bool> {
        if is_valid {
            let triggers = self.ledger.get_audit_triggers(round).await?;
            if !triggers.is_open(candidate) {
                debug!(round, %candidate, "valid, no open audit");
                return Ok(false);
            }
        }

        self.ledger
            .cast_audit_vote(candidate, is_valid, voter, round)
            .await?;
        debug!(round, %candidate, is_valid, "audit vote cast");
        Ok(true)
    }
}
