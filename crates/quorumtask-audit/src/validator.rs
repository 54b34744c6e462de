use async_trait::async_trait;
use quorumtask_types::{NodeId, Result, Round};
use std::future::Future;

/// Caller-supplied check of a single submission value.
///
/// `Ok(false)` is a negative verdict; `Err` means the check itself failed
/// and the candidate is skipped without a vote.
#[async_trait]
pub trait SubmissionValidator: Send + Sync {
    async fn validate(&self, value: &str, round: Round, node: &NodeId) -> Result<bool>;
}

#[async_trait]
impl<F, Fut> SubmissionValidator for F
where
    F: Fn(String, Round, NodeId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool>> + Send,
{
    async fn validate(&self, value: &str, round: Round, node: &NodeId) -> Result<bool> {
        (self)(value.to_string(), round, node.clone()).await
    }
}
