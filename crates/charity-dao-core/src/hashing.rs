//! Content digests.
//!
//! The local content store addresses blobs by the SHA-256 of their bytes; the
//! workflows log the same digest next to every staged document so an orphaned
//! upload can be matched to its bytes later.

use sha2::{Digest, Sha256};

use crate::errors::{DaoError, DaoResult};

/// Hash raw bytes and return a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Check that `s` is a lowercase 64-character SHA-256 hex digest.
pub fn require_sha256_hex(s: &str) -> DaoResult<()> {
    if s.len() == 64 && s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
        Ok(())
    } else {
        Err(DaoError::invalid_argument(format!("not a sha256 digest: {s}")))
    }
}
