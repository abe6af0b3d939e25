//! Events emitted by the outbox.
//!
//! Events are journaled with the rest of the engine state: an execution that
//! rolls back also drops the events it emitted.

use outbox_primitives::{Address, EpochId, Hash, LeafIndex, U256};
use serde::{Deserialize, Serialize};

/// Record of a committed outbox operation, readable via `Outbox::events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboxEvent {
    /// The publisher committed `root` for `epoch`.
    RootPublished { epoch: EpochId, root: Hash },

    /// The message at `index` was executed and `amount` released to `target`.
    MessageExecuted {
        index: LeafIndex,
        sender: Address,
        target: Address,
        amount: U256,
    },
}

/// Outcome of a successful execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    /// Leaf index that is now spent.
    pub index: LeafIndex,
    /// Epoch whose root proved the message.
    pub epoch: EpochId,
    /// Native-denominated amount released to the target.
    pub amount: U256,
}
