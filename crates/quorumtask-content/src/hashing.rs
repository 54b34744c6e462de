use sha2::{Digest, Sha256};

/// Hash reference (hex-encoded SHA256)
pub type HashRef = String;

/// Compute SHA256 hash of data
pub fn compute_hash(data: &[u8]) -> HashRef {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Compute hash of JSON-serialized data
pub fn compute_json_hash<T: serde::Serialize>(data: &T) -> Result<HashRef, serde_json::Error> {
    let json = serde_json::to_vec(data)?;
    Ok(compute_hash(&json))
}

/// Strip whitespace and surrounding quotes, lowercase
pub fn normalize_hash(raw: &str) -> String {
    raw.trim().trim_matches('"').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash(b"hello world");
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_hash("\"ABCdef\""), "abcdef");
        assert_eq!(normalize_hash("  abc \n"), "abc");
    }
}
