//! Shared-secret hashing for the reader and admin key headers.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a presented key against the configured secret.
///
/// Both sides are hashed first so the comparison always runs over
/// fixed-length digests rather than the raw key material.
pub fn verify_shared_key(presented: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    sha256_hex(presented) == sha256_hex(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }

    #[test]
    fn test_verify_shared_key_match() {
        assert!(verify_shared_key("reader-secret-1", "reader-secret-1"));
    }

    #[test]
    fn test_verify_shared_key_mismatch() {
        assert!(!verify_shared_key("reader-secret-1", "reader-secret-2"));
        assert!(!verify_shared_key("", "reader-secret-1"));
    }

    #[test]
    fn test_verify_shared_key_unconfigured_secret_rejects_everything() {
        // An empty configured secret must never authenticate, not even an
        // empty presented key.
        assert!(!verify_shared_key("", ""));
        assert!(!verify_shared_key("anything", ""));
    }

    #[test]
    fn test_verify_shared_key_case_sensitive() {
        assert!(!verify_shared_key("Secret", "secret"));
    }
}
