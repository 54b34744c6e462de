use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, SIGNATURE_LENGTH};
use quorumtask_types::{NodeId, QuorumTaskError, Result};

/// Verifies a signed message against a node's claimed identity
pub trait SignatureVerifier: Send + Sync {
    /// Returns the signed message when the signature holds for `claimed`
    fn verify(&self, signed: &str, claimed: &NodeId) -> Result<Vec<u8>>;
}

/// Ed25519 verifier. Identities are hex public keys; signed messages are
/// hex of `signature || message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Ed25519Verifier {
    fn verifying_key(claimed: &NodeId) -> Result<VerifyingKey> {
        let bytes = hex::decode(claimed.as_str()).map_err(|_| {
            QuorumTaskError::InvalidSignature(format!("identity {} is not hex", claimed))
        })?;
        let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            QuorumTaskError::InvalidSignature(format!("identity {} is not 32 bytes", claimed))
        })?;
        VerifyingKey::from_bytes(&key).map_err(|e| QuorumTaskError::InvalidSignature(e.to_string()))
    }
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, signed: &str, claimed: &NodeId) -> Result<Vec<u8>> {
        let key = Self::verifying_key(claimed)?;
        let bytes = hex::decode(signed.trim()).map_err(|_| {
            QuorumTaskError::InvalidSignature("signed message is not hex".to_string())
        })?;
        if bytes.len() < SIGNATURE_LENGTH {
            return Err(QuorumTaskError::InvalidSignature(
                "signed message too short".to_string(),
            ));
        }

        let (sig_bytes, message) = bytes.split_at(SIGNATURE_LENGTH);
        let signature = Signature::from_slice(sig_bytes)
            .map_err(|e| QuorumTaskError::InvalidSignature(e.to_string()))?;
        key.verify(message, &signature).map_err(|_| {
            QuorumTaskError::InvalidSignature(format!("signature does not match {}", claimed))
        })?;
        Ok(message.to_vec())
    }
}

/// Produce the hex `signature || message` form checked by `Ed25519Verifier`
pub fn sign_message(key: &SigningKey, message: &[u8]) -> String {
    let signature = key.sign(message);
    let mut signed = signature.to_bytes().to_vec();
    signed.extend_from_slice(message);
    hex::encode(signed)
}

/// Node identity for a signing key
pub fn node_id_for(key: &SigningKey) -> NodeId {
    NodeId::new(hex::encode(key.verifying_key().to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let signed = sign_message(&key, b"hello");

        let message = Ed25519Verifier.verify(&signed, &node_id_for(&key)).unwrap();
        assert_eq!(message, b"hello");
    }

    #[test]
    fn test_wrong_identity_rejected() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let other = SigningKey::from_bytes(&[8u8; 32]);
        let signed = sign_message(&key, b"hello");

        let err = Ed25519Verifier.verify(&signed, &node_id_for(&other)).unwrap_err();
        assert!(matches!(err, QuorumTaskError::InvalidSignature(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let id = node_id_for(&key);
        assert!(Ed25519Verifier.verify("zz", &id).is_err());
        assert!(Ed25519Verifier.verify("abcd", &id).is_err());
        assert!(Ed25519Verifier.verify(&sign_message(&key, b"x"), &NodeId::new("nothex")).is_err());
    }
}
