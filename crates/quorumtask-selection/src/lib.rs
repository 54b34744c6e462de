mod scoring;
mod selector;

pub use scoring::{ascii_sum, candidate_hash, pick, reference_hash, score_candidates};
pub use selector::NodeSelector;
