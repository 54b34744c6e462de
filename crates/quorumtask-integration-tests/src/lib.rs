//! Multi-node fixtures over one shared in-memory ledger.

use quorumtask_audit::{SubmissionAuditor, DEFAULT_SUBMISSION_FILE};
use quorumtask_content::{node_id_for, Ed25519Verifier, MemoryContent, SignedSubmission, SigningKey};
use quorumtask_ledger::{LedgerFixture, MemoryLedger};
use quorumtask_payout::PayoutCoordinator;
use quorumtask_types::{NodeId, OperatingMode, Result, Round};
use std::sync::Arc;

/// Nodes with real signing keys sharing a ledger and a content store
pub struct Network {
    pub ledger: MemoryLedger,
    pub content: MemoryContent,
    keys: Vec<SigningKey>,
}

impl Network {
    /// `size` administered nodes with deterministic keys
    pub fn new(size: u8) -> Self {
        let keys: Vec<SigningKey> = (1..=size).map(|i| SigningKey::from_bytes(&[i; 32])).collect();
        let observer = NodeId::new("observer");
        let ledger = MemoryLedger::new(LedgerFixture::new(observer).with_mode(OperatingMode::Administered));
        Network {
            ledger,
            content: MemoryContent::new(),
            keys,
        }
    }

    pub fn size(&self) -> usize {
        self.keys.len()
    }

    pub fn node(&self, index: usize) -> NodeId {
        node_id_for(&self.keys[index])
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        (0..self.size()).map(|i| self.node(i)).collect()
    }

    pub fn index_of(&self, node: &NodeId) -> Option<usize> {
        self.nodes().iter().position(|n| n == node)
    }

    /// Publish a signed payload for `data` and record its content id on the ledger
    pub async fn submit(&mut self, round: Round, index: usize, data: &str) -> Result<String> {
        let payload = SignedSubmission::sign(serde_json::Value::String(data.to_string()), &self.keys[index])?;
        self.publish(round, index, payload).await
    }

    /// Sign `signed` but publish `shown` as the payload data
    pub async fn submit_tampered(
        &mut self,
        round: Round,
        index: usize,
        signed: &str,
        shown: &str,
    ) -> Result<String> {
        let mut payload =
            SignedSubmission::sign(serde_json::Value::String(signed.to_string()), &self.keys[index])?;
        payload.data = serde_json::Value::String(shown.to_string());
        self.publish(round, index, payload).await
    }

    async fn publish(&mut self, round: Round, index: usize, payload: SignedSubmission) -> Result<String> {
        let cid = format!("cid-{}-{}", round, index);
        self.content
            .insert(&cid, DEFAULT_SUBMISSION_FILE, serde_json::to_string(&payload)?);
        self.ledger.add_submission(round, &self.node(index), &cid).await;
        Ok(cid)
    }

    /// The ledger as seen by node `index`
    pub fn view(&self, index: usize) -> MemoryLedger {
        self.ledger.as_node(self.node(index))
    }

    pub fn auditor(&self, index: usize) -> SubmissionAuditor<MemoryLedger> {
        SubmissionAuditor::new(
            Arc::new(self.view(index)),
            Arc::new(self.content.clone()),
            Arc::new(Ed25519Verifier),
        )
    }

    pub fn coordinator(&self, index: usize) -> PayoutCoordinator<MemoryLedger> {
        PayoutCoordinator::new(Arc::new(self.view(index)))
    }
}
