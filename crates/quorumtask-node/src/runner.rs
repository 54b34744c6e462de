use async_trait::async_trait;
use quorumtask_audit::{AuditSummary, DistributionAuditor, SubmissionAuditor, SubmissionValidator};
use quorumtask_content::{ContentSource, SignatureVerifier};
use quorumtask_ledger::TaskLedger;
use quorumtask_payout::{
    DistributionListValidator, LedgerListSubmitter, PayoutCoordinator, PayoutPhase,
};
use quorumtask_types::{AuditRecord, NodeId, Result, Round, SelectedNode};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::cli::Command;
use crate::config::NodeConfig;

/// Rejects blank submissions, accepts everything else.
/// Hosts with a real task check pass their own validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyValidator;

#[async_trait]
impl SubmissionValidator for NonEmptyValidator {
    async fn validate(&self, value: &str, _round: Round, _node: &NodeId) -> Result<bool> {
        Ok(!value.trim().is_empty())
    }
}

/// What a command did, printed as JSON by the binary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandReport {
    Audit {
        summary: AuditSummary,
    },
    AuditDistribution {
        summary: AuditSummary,
    },
    Select {
        leader: SelectedNode,
    },
    Distribute {
        leader: SelectedNode,
        phase: PayoutPhase,
        record: Option<AuditRecord>,
    },
    Payout {
        round: Round,
        record: AuditRecord,
    },
}

/// Wires one ledger into every protocol component and runs commands against it
pub struct RoundRunner<L: ?Sized> {
    ledger: Arc<L>,
    auditor: SubmissionAuditor<L>,
    distribution_auditor: DistributionAuditor<L>,
    coordinator: PayoutCoordinator<L>,
    config: NodeConfig,
}

impl<L> RoundRunner<L>
where
    L: TaskLedger + ?Sized + 'static,
{
    pub fn new(
        ledger: Arc<L>,
        content: Arc<dyn ContentSource>,
        verifier: Arc<dyn SignatureVerifier>,
        config: NodeConfig,
    ) -> Self {
        RoundRunner {
            auditor: SubmissionAuditor::new(ledger.clone(), content, verifier)
                .with_file_name(config.submission_file.clone()),
            distribution_auditor: DistributionAuditor::new(ledger.clone()),
            coordinator: PayoutCoordinator::new(ledger.clone()),
            ledger,
            config,
        }
    }

    /// Run `command` for `round`. `validator` judges task submissions.
    pub async fn execute<V>(
        &self,
        command: Command,
        round: Round,
        previous_failed: bool,
        validator: &V,
    ) -> Result<CommandReport>
    where
        V: SubmissionValidator + ?Sized,
    {
        info!(?command, round, previous_failed, "running command");
        match command {
            Command::Audit => {
                let summary = self
                    .auditor
                    .audit_round(round, validator, self.config.sampling, self.config.verify_content)
                    .await?;
                Ok(CommandReport::Audit { summary })
            }
            Command::AuditDistribution => {
                let lists = DistributionListValidator::new(self.ledger.clone(), self.config.rewards);
                let summary = self
                    .distribution_auditor
                    .audit_distribution_round(round, &lists, self.config.sampling)
                    .await?;
                Ok(CommandReport::AuditDistribution { summary })
            }
            Command::Select => {
                let leader = self
                    .coordinator
                    .selector()
                    .select(round, previous_failed)
                    .await?;
                Ok(CommandReport::Select { leader })
            }
            Command::Distribute => {
                let submitter = LedgerListSubmitter::new(self.ledger.clone(), self.config.rewards);
                let outcome = self
                    .coordinator
                    .select_and_generate_distribution_list(round, previous_failed, &submitter)
                    .await?;
                let leader = outcome.leader.clone();
                let (phase, record) = outcome.wait().await?;
                info!(round, %phase, ?record, "distribution flow finished");
                Ok(CommandReport::Distribute {
                    leader,
                    phase,
                    record,
                })
            }
            Command::Payout => {
                let record = self.coordinator.payout_trigger(round).await?;
                Ok(CommandReport::Payout { round, record })
            }
        }
    }
}
