//! Hashing for the outbox execution layer.
//!
//! Everything the destination domain verifies is hashed with Keccak-256 so
//! that digests match what the origin-domain indexer produces.

use alloy_primitives::keccak256;
use crate::types::Hash;

/// Compute the Keccak-256 hash of the input data.
pub fn hash_keccak(data: &[u8]) -> Hash {
    keccak256(data)
}

/// Hash an internal Merkle node: `H(left || right)`.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left.as_slice());
    data[32..].copy_from_slice(right.as_slice());
    keccak256(data)
}
