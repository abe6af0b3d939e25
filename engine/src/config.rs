//! Outbox configuration.

use outbox_primitives::{Address, CANONICAL_DECIMALS, MAX_PROOF_DEPTH};
use serde::{Deserialize, Serialize};

/// Configuration bound to an [`Outbox`](crate::Outbox) by `initialize`.
///
/// Identifies the bridged asset, the custody component that holds it, and
/// the identity allowed to publish roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboxConfig {
    /// Bridged fungible asset.
    pub asset: Address,

    /// Custody component that releases the asset.
    pub custody: Address,

    /// Only identity allowed to publish epoch roots.
    pub publisher: Address,

    /// Decimal precision of the bridged asset.
    /// Default: 18 (no rescaling).
    pub native_decimals: u8,

    /// Deepest proof accepted. At most 64.
    pub max_proof_depth: usize,

    /// Call targets refused in addition to the asset and custody.
    pub denied_targets: Vec<Address>,
}

impl OutboxConfig {
    /// Config for `asset` held by `custody`, roots published by `publisher`.
    pub fn new(asset: Address, custody: Address, publisher: Address) -> Self {
        Self {
            asset,
            custody,
            publisher,
            ..Self::default()
        }
    }

    /// Set the asset's native decimals.
    pub fn with_native_decimals(mut self, decimals: u8) -> Self {
        self.native_decimals = decimals;
        self
    }
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            asset: Address::ZERO,
            custody: Address::ZERO,
            publisher: Address::ZERO,
            native_decimals: CANONICAL_DECIMALS,
            max_proof_depth: MAX_PROOF_DEPTH,
            denied_targets: Vec::new(),
        }
    }
}
