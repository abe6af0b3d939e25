//! Outbound messages and their item hash.
//!
//! ## Item encoding
//!
//! The item hash is Keccak-256 over the tightly packed fields, in this order:
//!
//! ```text
//! [sender: 20 bytes]
//! [target: 20 bytes]
//! [origin_block: 32 bytes BE]
//! [destination_block: 32 bytes BE]
//! [timestamp: 32 bytes BE]
//! [value: 32 bytes BE]
//! [payload: variable]
//! ```
//!
//! The indexer that builds proofs uses the same layout. Reordering a field or
//! adding one breaks every outstanding proof.

use serde::{Deserialize, Serialize};
use crate::crypto::hash_keccak;
use crate::types::{u64_to_word, Address, Bytes, Hash, U256};

/// Fixed-width prefix of the item encoding (everything except the payload).
pub const ITEM_HEADER_LEN: usize = 20 + 20 + 32 * 4;

/// A message sent from the origin domain to be executed in the destination domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Origin-domain identity that sent the message.
    pub sender: Address,
    /// Destination-domain identity that receives the value and payload.
    pub target: Address,
    /// Origin-domain block number at which the message was sent.
    pub origin_block: u64,
    /// Destination-domain block number observed by the origin domain.
    pub destination_block: u64,
    /// Origin-domain timestamp of the send.
    pub timestamp: u64,
    /// Value carried by the message, 18-decimal denominated.
    pub value: U256,
    /// Call data delivered to the target.
    pub payload: Bytes,
}

impl Message {
    /// Item hash of this message.
    pub fn item_hash(&self) -> Hash {
        hash_item(
            &self.sender,
            &self.target,
            self.origin_block,
            self.destination_block,
            self.timestamp,
            self.value,
            &self.payload,
        )
    }
}

/// Deterministically hash a message's fields into a single digest.
pub fn hash_item(
    sender: &Address,
    target: &Address,
    origin_block: u64,
    destination_block: u64,
    timestamp: u64,
    value: U256,
    payload: &[u8],
) -> Hash {
    hash_keccak(&encode_item(
        sender,
        target,
        origin_block,
        destination_block,
        timestamp,
        value,
        payload,
    ))
}

/// Packed item encoding (see module docs).
pub fn encode_item(
    sender: &Address,
    target: &Address,
    origin_block: u64,
    destination_block: u64,
    timestamp: u64,
    value: U256,
    payload: &[u8],
) -> Vec<u8> {
    let mut data = Vec::with_capacity(ITEM_HEADER_LEN + payload.len());
    data.extend_from_slice(sender.as_slice());
    data.extend_from_slice(target.as_slice());
    data.extend_from_slice(&u64_to_word(origin_block));
    data.extend_from_slice(&u64_to_word(destination_block));
    data.extend_from_slice(&u64_to_word(timestamp));
    data.extend_from_slice(&value.to_be_bytes::<32>());
    data.extend_from_slice(payload);
    data
}
