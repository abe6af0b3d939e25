//! Merkle inclusion proofs over outbound message items.
//!
//! A committed tree has `2^depth` leaves. Leaf `i` holds `H(item_hash_i)`;
//! unused leaves are `ZERO_HASH`. Internal nodes are `H(left || right)`.
//! Hashing the item once more before it becomes a leaf keeps a 64-byte
//! internal-node preimage from ever being accepted as a 32-byte item.
//!
//! ## Path convention
//!
//! A proof lists sibling digests from the leaf level upward. At level `k`,
//! bit `k` of the leaf index (least-significant first) tells which side the
//! running hash is on:
//!
//! ```text
//! bit = 0  ->  running = H(running || sibling)
//! bit = 1  ->  running = H(sibling || running)
//! ```
//!
//! The proof length is the tree depth. An index with bits set at or above the
//! proof length does not describe a leaf of that tree and is rejected by
//! [`check_proof_shape`] before the walk.

use crate::crypto::{hash_keccak, hash_pair};
use crate::error::{OutboxError, OutboxResult};
use crate::types::{Hash, LeafIndex, MAX_PROOF_DEPTH, ZERO_HASH};

/// Turn an item hash into the leaf stored in the tree.
pub fn hash_leaf(item: &Hash) -> Hash {
    hash_keccak(item.as_slice())
}

/// Recompute the root implied by `leaf` sitting at `index` with siblings `proof`.
///
/// Pure walk; a mismatch is detected by comparing the result to a published
/// root. Shape violations are the caller's job ([`check_proof_shape`]).
pub fn compute_root(proof: &[Hash], index: LeafIndex, leaf: &Hash) -> Hash {
    let mut running = *leaf;
    let mut path = index;
    for sibling in proof {
        running = if path & 1 == 0 {
            hash_pair(&running, sibling)
        } else {
            hash_pair(sibling, &running)
        };
        path >>= 1;
    }
    running
}

/// Root implied by an item hash (rather than a leaf) at `index`.
pub fn compute_item_root(proof: &[Hash], index: LeafIndex, item: &Hash) -> Hash {
    compute_root(proof, index, &hash_leaf(item))
}

/// Reject proofs deeper than `max_depth` and indices that need more bits
/// than the proof has levels.
pub fn check_proof_shape(proof_len: usize, index: LeafIndex, max_depth: usize) -> OutboxResult<()> {
    let max = max_depth.min(MAX_PROOF_DEPTH);
    if proof_len > max {
        return Err(OutboxError::ProofTooLong { len: proof_len, max });
    }
    if proof_len < MAX_PROOF_DEPTH && (index >> proof_len) != 0 {
        return Err(OutboxError::PathNotMinimal { index, len: proof_len });
    }
    Ok(())
}

/// Reference tree over item hashes, padded with `ZERO_HASH` to the smallest
/// power of two that holds every item.
///
/// This is the construction the indexer performs off-core; the engine only
/// ever verifies. Used by tests and tooling to produce proofs the verifier
/// accepts.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `levels[0]` are the leaves, `levels[depth]` is `[root]`.
    levels: Vec<Vec<Hash>>,
    /// Number of real (non-padding) leaves.
    len: usize,
}

impl MerkleTree {
    /// Build the tree from item hashes in send order.
    pub fn from_items(items: &[Hash]) -> Self {
        let len = items.len();
        let width = len.max(1).next_power_of_two();

        let mut leaves: Vec<Hash> = items.iter().map(hash_leaf).collect();
        leaves.resize(width, ZERO_HASH);

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let next: Vec<Hash> = levels[levels.len() - 1]
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], &pair[1]))
                .collect();
            levels.push(next);
        }

        Self { levels, len }
    }

    /// Number of items committed (the epoch id this root is published under).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no items are committed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tree depth, which is also the length of every proof.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Root of the tree.
    pub fn root(&self) -> Hash {
        self.levels[self.depth()][0]
    }

    /// Sibling path for the item at `index`, or `None` past the last item.
    pub fn prove(&self, index: LeafIndex) -> Option<Vec<Hash>> {
        let mut idx = usize::try_from(index).ok()?;
        if idx >= self.len {
            return None;
        }
        let mut proof = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.depth()] {
            proof.push(level[idx ^ 1]);
            idx /= 2;
        }
        Some(proof)
    }
}
