// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SDK key generation and hashing.
//!
//! Keys are handed out exactly once; only their SHA-256 digest is stored,
//! so a leaked database cannot be replayed against the API.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix that makes issued keys recognizable in configs and logs.
pub const KEY_PREFIX: &str = "fdk_";

/// Generates a fresh SDK key, returning `(plaintext, digest)`.
pub fn generate_key() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let plaintext = format!("{KEY_PREFIX}{}", hex::encode(bytes));
    let digest = digest(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a key, as stored in `sdk_keys.key_hash`.
pub fn digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_prefixed_and_unique() {
        let (a, _) = generate_key();
        let (b, _) = generate_key();
        assert!(a.starts_with(KEY_PREFIX));
        assert_eq!(a.len(), KEY_PREFIX.len() + 64);
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_deterministic_and_hex() {
        let (plaintext, stored) = generate_key();
        assert_eq!(digest(&plaintext), stored);
        assert_eq!(stored.len(), 64);
        assert!(stored.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_keys_have_different_digests() {
        assert_ne!(digest("fdk_aaa"), digest("fdk_aab"));
    }
}
