//! Content-entangled leader scoring.
//!
//! Every candidate is scored by how far the character sum of its own
//! submission digest lies from the character sum of the digest over the
//! whole candidate set. Nothing here is secret, so any node holding the same
//! submission map arrives at the same leader.

use quorumtask_content::{compute_json_hash, HashRef};
use quorumtask_types::{NodeId, Result, RoundSubmissions, SelectedNode, Submission};
use std::collections::BTreeMap;

/// Sum of the character codes of `s`
pub fn ascii_sum(s: &str) -> u64 {
    s.chars().map(|c| c as u64).sum()
}

/// SHA-256 over the JSON of the full candidate map, in key order
pub fn reference_hash(candidates: &RoundSubmissions) -> Result<HashRef> {
    Ok(compute_json_hash(candidates)?)
}

/// SHA-256 over the JSON of the singleton map `{node: submission}`
pub fn candidate_hash(node: &NodeId, submission: &Submission) -> Result<HashRef> {
    let single: BTreeMap<&NodeId, &Submission> = BTreeMap::from([(node, submission)]);
    Ok(compute_json_hash(&single)?)
}

/// Scores in enumeration order
pub fn score_candidates(candidates: &RoundSubmissions) -> Result<Vec<SelectedNode>> {
    let reference = ascii_sum(&reference_hash(candidates)?);
    candidates
        .iter()
        .map(|(node, submission)| {
            let own = ascii_sum(&candidate_hash(node, submission)?);
            Ok(SelectedNode {
                score: reference.abs_diff(own),
                node: node.clone(),
            })
        })
        .collect()
}

/// Highest score, or on a retry the best score strictly below it.
///
/// Ties go to the first candidate seen. A retry where every candidate has
/// the same score falls back to the highest.
pub fn pick(scored: &[SelectedNode], previous_failed: bool) -> Option<SelectedNode> {
    let mut highest: Option<&SelectedNode> = None;
    for entry in scored {
        if highest.map_or(true, |best| entry.score > best.score) {
            highest = Some(entry);
        }
    }
    let highest = highest?;
    if !previous_failed {
        return Some(highest.clone());
    }

    let mut runner_up: Option<&SelectedNode> = None;
    for entry in scored.iter().filter(|e| e.score < highest.score) {
        if runner_up.map_or(true, |best| entry.score > best.score) {
            runner_up = Some(entry);
        }
    }
    Some(runner_up.unwrap_or(highest).clone())
}
