mod phase;
mod rewards;
mod submitter;
mod coordinator;

pub use phase::PayoutPhase;
pub use rewards::{generate_distribution_list, DistributionListValidator, RewardPolicy};
pub use submitter::{DistributionListSubmitter, LedgerListSubmitter};
pub use coordinator::{PayoutCoordinator, RoundOutcome};
