//! Bucket selection from a SHA-256 digest of the key.
//!
//! The first four digest bytes are read big-endian and reduced modulo the
//! bucket count. The digest depends only on the key, so an index is stable
//! for a given capacity and is recomputed in full whenever capacity changes.

use crate::error::MapError;
use sha2::{Digest, Sha256};

pub(crate) fn digest_prefix(key: &str) -> u32 {
    let digest = Sha256::digest(key.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Bucket index for `key` in a table of `capacity` buckets.
pub fn bucket_index(capacity: usize, key: &str) -> Result<usize, MapError> {
    if capacity == 0 {
        return Err(MapError::HashError {
            reason: "table has no buckets",
        });
    }
    Ok(digest_prefix(key) as usize % capacity)
}
