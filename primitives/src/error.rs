//! Error types for the outbox execution layer.
//!
//! Every variant is terminal for the inputs that produced it: the caller has
//! to change the index, proof, target or amount (or wait for a new root)
//! before trying again. Variants carry the offending value so hosts can
//! surface it verbatim.

use crate::types::{Address, EpochId, Hash, LeafIndex, U256};

/// Failure reported by a host collaborator (custody or call target).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Custody could not release the requested amount.
    #[error("custody transfer of {amount} to {to} failed: {reason}")]
    Transfer {
        to: Address,
        amount: U256,
        reason: String,
    },

    /// The destination target rejected the call.
    #[error("call to {target} reverted: {reason}")]
    CallReverted { target: Address, reason: String },
}

/// Outbox engine error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutboxError {
    /// Someone other than the configured publisher tried to publish a root.
    #[error("caller {caller} is not the root publisher")]
    Unauthorized { caller: Address },

    /// No root is published for the epoch.
    ///
    /// When raised by execution, `epoch` is the first epoch that would
    /// commit the requested leaf index.
    #[error("unknown epoch {epoch}")]
    UnknownEpoch { epoch: EpochId },

    /// The recomputed root matches no published root covering the index.
    #[error("proof for index {index} does not match a published root (computed {computed})")]
    Unproven { index: LeafIndex, computed: Hash },

    /// The leaf index has already been executed.
    #[error("leaf index {index} already spent")]
    AlreadySpent { index: LeafIndex },

    /// The destination target is rejected by the call policy.
    #[error("call target {target} not allowed")]
    CallTargetNotAllowed { target: Address },

    /// Rescaling the value to native decimals overflows 256 bits.
    #[error("amount {value} too large to rescale to {decimals} decimals")]
    AmountTooLarge { value: U256, decimals: u8 },

    /// `initialize` was called twice.
    #[error("outbox already initialized")]
    AlreadyInitialized,

    /// An operation that needs the bound configuration ran before `initialize`.
    #[error("outbox not initialized")]
    NotInitialized,

    /// A root was already published for this epoch.
    #[error("epoch {epoch} already published")]
    EpochAlreadyPublished { epoch: EpochId },

    /// The proof has more levels than the configured maximum depth.
    #[error("proof length {len} exceeds maximum depth {max}")]
    ProofTooLong { len: usize, max: usize },

    /// The index has bits set above the proof length.
    #[error("index {index} does not fit a tree of depth {len}")]
    PathNotMinimal { index: LeafIndex, len: usize },

    /// Configuration rejected during `initialize`.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A collaborator failed during the nested call.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl OutboxError {
    /// Stable numeric code for hosts that surface errors across an ABI.
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized { .. } => 1,
            Self::UnknownEpoch { .. } => 2,
            Self::Unproven { .. } => 3,
            Self::AlreadySpent { .. } => 4,
            Self::CallTargetNotAllowed { .. } => 5,
            Self::AmountTooLarge { .. } => 6,
            Self::AlreadyInitialized => 7,
            Self::NotInitialized => 8,
            Self::EpochAlreadyPublished { .. } => 9,
            Self::ProofTooLong { .. } => 10,
            Self::PathNotMinimal { .. } => 11,
            Self::InvalidConfig(_) => 12,
            Self::Host(_) => 13,
        }
    }
}

/// Convenience result type for the outbox layer.
pub type OutboxResult<T> = core::result::Result<T, OutboxError>;
