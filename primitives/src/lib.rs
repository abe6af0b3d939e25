//! `outbox-primitives`: foundational types for the outbox execution layer.
//!
//! This crate provides the types, errors, Keccak hashing, message item
//! encoding, Merkle verification, decimal rescaling, and the undo journal
//! shared by the execution engine and by off-core tooling that builds
//! proofs.

pub mod types;
pub mod error;
pub mod crypto;
pub mod message;
pub mod merkle;
pub mod rescale;
pub mod journal;

// Re-export commonly used types at the crate root for convenience.
pub use types::{
    Address, Bytes, EpochId, Hash, LeafIndex, B256, U256, CANONICAL_DECIMALS, MAX_PROOF_DEPTH,
};
pub use error::{HostError, OutboxError, OutboxResult};
pub use message::{hash_item, Message};
pub use merkle::{check_proof_shape, compute_item_root, compute_root, hash_leaf, MerkleTree};
pub use rescale::{rescale, to_canonical};
pub use journal::{Checkpoint, Journal};
