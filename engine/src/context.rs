//! Execution context register.
//!
//! While the orchestrator is inside the nested call for a message, the
//! register exposes that message's metadata to the callee. Outside that
//! window every accessor returns `None`.
//!
//! The register is a single slot. A re-entrant execution saves the slot on
//! [`ContextRegister::set`] and puts it back with
//! [`ContextRegister::restore`], so once the outermost execution returns
//! the slot is empty again.

use outbox_primitives::{Address, LeafIndex, Message, U256};
use serde::{Deserialize, Serialize};

/// Metadata of the message currently being executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveContext {
    /// Origin-domain sender.
    pub sender: Address,
    /// Origin-domain block of the send.
    pub origin_block: u64,
    /// Destination-domain block observed at send time.
    pub destination_block: u64,
    /// Origin-domain timestamp of the send.
    pub timestamp: u64,
    /// Leaf index being executed.
    pub output_id: LeafIndex,
    /// Native-denominated amount released to the target.
    pub amount: U256,
}

impl ActiveContext {
    /// Context for `message` executing at `index` with the rescaled `amount`.
    pub fn new(message: &Message, index: LeafIndex, amount: U256) -> Self {
        Self {
            sender: message.sender,
            origin_block: message.origin_block,
            destination_block: message.destination_block,
            timestamp: message.timestamp,
            output_id: index,
            amount,
        }
    }
}

/// Single-slot register read by call targets during execution.
#[derive(Debug, Clone, Default)]
pub struct ContextRegister {
    slot: Option<ActiveContext>,
}

impl ContextRegister {
    /// Create an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `context`, returning whatever occupied the slot before.
    pub fn set(&mut self, context: ActiveContext) -> Option<ActiveContext> {
        self.slot.replace(context)
    }

    /// Put back the value returned by [`set`](Self::set).
    pub fn restore(&mut self, previous: Option<ActiveContext>) {
        self.slot = previous;
    }

    /// Empty the slot.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Returns true while a message is executing.
    pub fn is_active(&self) -> bool {
        self.slot.is_some()
    }

    /// The whole context, if a message is executing.
    pub fn current(&self) -> Option<&ActiveContext> {
        self.slot.as_ref()
    }

    /// Origin-domain sender of the executing message.
    pub fn sender(&self) -> Option<Address> {
        self.slot.as_ref().map(|c| c.sender)
    }

    /// Origin-domain block of the send.
    pub fn origin_block(&self) -> Option<u64> {
        self.slot.as_ref().map(|c| c.origin_block)
    }

    /// Destination-domain block observed at send time.
    pub fn destination_block(&self) -> Option<u64> {
        self.slot.as_ref().map(|c| c.destination_block)
    }

    /// Origin-domain timestamp of the send.
    pub fn timestamp(&self) -> Option<u64> {
        self.slot.as_ref().map(|c| c.timestamp)
    }

    /// Leaf index of the executing message.
    pub fn output_id(&self) -> Option<LeafIndex> {
        self.slot.as_ref().map(|c| c.output_id)
    }

    /// Amount released to the target, in native decimals.
    pub fn amount(&self) -> Option<U256> {
        self.slot.as_ref().map(|c| c.amount)
    }
}
