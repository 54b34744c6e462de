mod node;
mod round;
mod submission;
mod audit;
mod distribution;
mod error;

pub use node::{NodeId, OperatingMode, SelectedNode};
pub use round::{Round, RoundTiming};
pub use submission::{RoundSubmissions, Submission, SubmissionsPerRound};
pub use audit::{AuditTriggerState, AuditTriggers, AuditVote, TaskSubmissionState};
pub use distribution::{AuditRecord, DistributionList, TaskDistributionInfo};
pub use error::{QuorumTaskError, Result};

#[cfg(test)]
mod tests;
