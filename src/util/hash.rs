//! Hashing utilities for wheel RECORD entries.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Compute the SHA256 digest of a byte slice, base64url-encoded without padding.
pub fn sha256_urlsafe(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Hash field of a RECORD line: `sha256=<digest>`.
pub fn record_hash(data: &[u8]) -> String {
    format!("sha256={}", sha256_urlsafe(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_hash_of_empty_input() {
        assert_eq!(
            record_hash(b""),
            "sha256=47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU"
        );
    }

    #[test]
    fn test_record_hash_has_no_padding() {
        let hash = record_hash(b"test content");
        assert!(hash.starts_with("sha256="));
        assert!(!hash["sha256=".len()..].contains('='));
        assert_eq!(hash, record_hash(b"test content"));
    }
}
