mod sampling;
mod validator;
mod submission_auditor;
mod distribution_auditor;

pub use sampling::{SamplingMode, MAX_RANDOM_SAMPLE};
pub use validator::SubmissionValidator;
pub use submission_auditor::{AuditSummary, SubmissionAuditor, DEFAULT_SUBMISSION_FILE};
pub use distribution_auditor::DistributionAuditor;
