//! Artifact checksums.
//!
//! The orchestration layer around the renderer decides whether a
//! workload needs a rolling restart by comparing checksums of rendered
//! documents, so digests must be stable for byte-identical content.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of rendered content.
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_is_stable() {
        let content = "kind: Deployment\n";
        assert_eq!(sha256_hex(content), sha256_hex(content));
    }

    #[test]
    fn test_digest_changes_with_content() {
        assert_ne!(sha256_hex("replicas: 1"), sha256_hex("replicas: 2"));
    }
}
