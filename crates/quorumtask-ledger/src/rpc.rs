
use async_trait::async_trait;
use quorumtask_types::{
    AuditRecord, AuditTriggers, DistributionList, NodeId, OperatingMode, QuorumTaskError, Result,
    Round, RoundSubmissions, RoundTiming, TaskDistributionInfo,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use crate::ledger::{IdentityProvider, LedgerClient, StateProvider};

/// Ledger backed by the host process, spoken to as JSON over HTTP.
///
/// Every method is a `POST {base}/{method}` with a JSON body. A 404 means
/// the requested round state does not exist.
#[derive(Clone)]
pub struct RpcLedger {
    base: String,
    client: Client,
    identity: NodeId,
    mode: OperatingMode,
}

impl RpcLedger {
    pub fn new(base: impl Into<String>, identity: NodeId, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuorumTaskError::Transport(format!("failed to build client: {}", e)))?;
        Ok(RpcLedger {
            base: base.into().trim_end_matches('/').to_string(),
            client,
            identity,
            mode: OperatingMode::Administered,
        })
    }

    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }

    async fn post(&self, method: &str, body: serde_json::Value) -> Result<Option<reqwest::Response>> {
        let url = format!("{}/{}", self.base, method);
        tracing::debug!(method, "ledger rpc call");
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| QuorumTaskError::Transport(format!("{} failed: {}", method, e)))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(QuorumTaskError::Transport(format!(
                "{} failed {} {}",
                method, status, text
            )));
        }
        Ok(Some(resp))
    }

    async fn query<T: DeserializeOwned>(&self, method: &str, body: serde_json::Value) -> Result<Option<T>> {
        match self.post(method, body).await? {
            Some(resp) => {
                let value = resp.json::<T>().await.map_err(|e| {
                    QuorumTaskError::Serialization(format!("{} response: {}", method, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn command(&self, method: &str, body: serde_json::Value) -> Result<()> {
        self.post(method, body)
            .await?
            .map(|_| ())
            .ok_or_else(|| QuorumTaskError::Transport(format!("{} not available on host", method)))
    }
}

#[async_trait]
impl StateProvider for RpcLedger {
    async fn get_submissions(&self, round: Round) -> Result<RoundSubmissions> {
        self.query("getSubmissions", json!({ "round": round }))
            .await?
            .ok_or(QuorumTaskError::NoSubmissions(round))
    }

    async fn get_audit_triggers(&self, round: Round) -> Result<AuditTriggers> {
        Ok(self
            .query("getAuditTriggers", json!({ "round": round }))
            .await?
            .unwrap_or_default())
    }

    async fn get_distribution_info(&self, round: Round) -> Result<TaskDistributionInfo> {
        self.query("getDistributionInfo", json!({ "round": round }))
            .await?
            .ok_or(QuorumTaskError::DistributionNotFound(round))
    }

    async fn get_distribution_list(&self, round: Round, node: &NodeId) -> Result<DistributionList> {
        self.query("getDistributionList", json!({ "round": round, "node": node }))
            .await?
            .ok_or(QuorumTaskError::DistributionNotFound(round))
    }

    async fn get_round_timing(&self) -> Result<RoundTiming> {
        self.query("getRoundTiming", json!({}))
            .await
            .map_err(|e| QuorumTaskError::TimingUnavailable(e.to_string()))?
            .ok_or_else(|| QuorumTaskError::TimingUnavailable("host has no round timing".to_string()))
    }

    async fn get_average_slot_time_ms(&self) -> Result<u64> {
        self.query("getAverageSlotTime", json!({}))
            .await
            .map_err(|e| QuorumTaskError::TimingUnavailable(e.to_string()))?
            .ok_or_else(|| {
                QuorumTaskError::TimingUnavailable("host has no average slot time".to_string())
            })
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn cast_audit_vote(
        &self,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
        round: Round,
    ) -> Result<()> {
        self.command(
            "auditSubmission",
            json!({ "candidate": candidate, "isValid": is_valid, "voter": voter, "round": round }),
        )
        .await
    }

    async fn cast_distribution_audit_vote(
        &self,
        candidate: &NodeId,
        is_valid: bool,
        voter: &NodeId,
        round: Round,
    ) -> Result<()> {
        self.command(
            "distributionListAuditSubmission",
            json!({ "candidate": candidate, "isValid": is_valid, "voter": voter, "round": round }),
        )
        .await
    }

    async fn submit_distribution_list(
        &self,
        round: Round,
        submitter: &NodeId,
        list: &DistributionList,
    ) -> Result<()> {
        self.command(
            "distributionListSubmission",
            json!({ "round": round, "submitter": submitter, "list": list }),
        )
        .await
    }

    async fn trigger_payout(&self, round: Round) -> Result<AuditRecord> {
        self.query("payoutTrigger", json!({ "round": round }))
            .await?
            .ok_or(QuorumTaskError::DistributionNotFound(round))
    }
}

#[async_trait]
impl IdentityProvider for RpcLedger {
    async fn local_submitter_identity(&self) -> Result<NodeId> {
        Ok(self.identity.clone())
    }

    fn operating_mode(&self) -> OperatingMode {
        self.mode
    }
}
