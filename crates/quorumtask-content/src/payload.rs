//! Off-chain submission payloads.
//!
//! A content-addressed submission is a JSON document
//! `{ "data": <raw submission>, "signature": "<hex signed message>" }`
//! where the signed message is the SHA-256 of the raw submission.

use ed25519_dalek::SigningKey;
use quorumtask_types::{NodeId, QuorumTaskError, Result};
use serde::{Deserialize, Serialize};

use crate::hashing::{compute_hash, normalize_hash};
use crate::signature::{sign_message, SignatureVerifier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedSubmission {
    pub data: serde_json::Value,
    pub signature: String,
}

impl SignedSubmission {
    /// Sign `data` the way submitters publish it
    pub fn sign(data: serde_json::Value, key: &SigningKey) -> Result<Self> {
        let hash = compute_hash(raw_of(&data).as_bytes());
        let message = serde_json::to_string(&hash)?;
        Ok(SignedSubmission {
            data,
            signature: sign_message(key, message.as_bytes()),
        })
    }

    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| QuorumTaskError::MalformedPayload(e.to_string()))
    }

    /// The submission as the validator sees it: strings verbatim, anything else as JSON text
    pub fn raw_submission(&self) -> String {
        raw_of(&self.data)
    }
}

fn raw_of(data: &serde_json::Value) -> String {
    match data {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Check a fetched payload against the candidate's identity and return the raw submission.
///
/// Fails with `InvalidSignature` when the signature does not hold and with
/// `ContentMismatch` when the signed hash differs from the payload's hash.
pub fn verify_signed_submission<V>(body: &str, claimed: &NodeId, verifier: &V) -> Result<String>
where
    V: SignatureVerifier + ?Sized,
{
    let payload = SignedSubmission::parse(body)?;
    let message = verifier.verify(&payload.signature, claimed)?;
    let signed_hash = String::from_utf8(message).map_err(|_| {
        QuorumTaskError::InvalidSignature("signed message is not UTF-8".to_string())
    })?;

    let raw = payload.raw_submission();
    let computed = compute_hash(raw.as_bytes());
    let expected = normalize_hash(&signed_hash);
    if expected != normalize_hash(&computed) {
        return Err(QuorumTaskError::ContentMismatch {
            expected,
            actual: computed,
        });
    }
    Ok(raw)
}
