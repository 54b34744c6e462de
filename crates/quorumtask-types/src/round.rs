
use serde::{Deserialize, Serialize};

/// Round identifier (sequential counter, never negative)
pub type Round = u64;

/// Window lengths for a round, in slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTiming {
    pub submission_window_slots: u64,
    pub audit_window_slots: u64,
}

impl RoundTiming {
    pub fn new(submission_window_slots: u64, audit_window_slots: u64) -> Self {
        RoundTiming {
            submission_window_slots,
            audit_window_slots,
        }
    }

    /// Milliseconds to wait before triggering payout: both windows at the given slot time
    pub fn payout_delay_ms(&self, average_slot_time_ms: u64) -> u64 {
        self.audit_window_slots
            .saturating_add(self.submission_window_slots)
            .saturating_mul(average_slot_time_ms)
    }
}
