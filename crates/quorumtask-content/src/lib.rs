mod gateway;
mod fetcher;
mod hashing;
mod signature;
mod payload;

pub use gateway::{default_gateways, GatewayTemplate};
pub use fetcher::{ContentFetcher, ContentSource, MemoryContent, DEFAULT_GATEWAY_TIMEOUT};
pub use hashing::{compute_hash, compute_json_hash, normalize_hash, HashRef};
pub use signature::{node_id_for, sign_message, Ed25519Verifier, SignatureVerifier};
pub use ed25519_dalek::SigningKey;
pub use payload::{verify_signed_submission, SignedSubmission};

#[cfg(test)]
mod tests;
