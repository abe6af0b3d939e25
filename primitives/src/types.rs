//! Core type aliases and constants for the outbox execution layer.
//!
//! These types are shared by the message encoder, the Merkle verifier, the
//! ledgers, and the orchestrator in `outbox-engine`.

pub use alloy_primitives::{Address, Bytes, B256, U256};

/// 32-byte digest used for item hashes, Merkle nodes, and epoch roots.
pub type Hash = B256;

/// Position of a message within a committed tree. Doubles as the replay key.
pub type LeafIndex = u64;

/// Identifier of a published root: the cumulative leaf count it commits.
pub type EpochId = u64;

/// Decimal precision of values inside the origin domain.
pub const CANONICAL_DECIMALS: u8 = 18;

/// Deepest tree a proof may describe. Bounded by the bit-width of [`LeafIndex`].
pub const MAX_PROOF_DEPTH: usize = 64;

/// A zero-valued hash (32 zero bytes). Padding leaf of the reference tree.
pub const ZERO_HASH: Hash = B256::ZERO;

/// Encode a u64 as a 32-byte big-endian word, the width every integer field
/// occupies in the item encoding.
pub fn u64_to_word(v: u64) -> [u8; 32] {
    U256::from(v).to_be_bytes::<32>()
}
