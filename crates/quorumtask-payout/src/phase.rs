use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a round stands in the payout flow.
///
/// `Idle -> LeaderSelected -> ListSubmitted -> PayoutScheduled -> PayoutTriggered`.
/// Nodes that are not the leader stop at `LeaderSelected`; a timing lookup
/// failure stops the leader at `ListSubmitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutPhase {
    Idle,
    LeaderSelected,
    ListSubmitted,
    PayoutScheduled,
    PayoutTriggered,
}

impl fmt::Display for PayoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayoutPhase::Idle => "idle",
            PayoutPhase::LeaderSelected => "leader_selected",
            PayoutPhase::ListSubmitted => "list_submitted",
            PayoutPhase::PayoutScheduled => "payout_scheduled",
            PayoutPhase::PayoutTriggered => "payout_triggered",
        };
        f.write_str(name)
    }
}
