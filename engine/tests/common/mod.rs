//! Shared test helpers for integration tests.
//!
//! Provides stable identities, message builders, a tracing initializer and a
//! `Fixture` that owns an initialized outbox, a funded `MockHost` and the
//! tree behind every published root.

#![allow(dead_code)]

use outbox_engine::{ExecutionReceipt, MockHost, Outbox, OutboxConfig};
use outbox_primitives::{
    Address, Bytes, EpochId, Hash, HostError, LeafIndex, MerkleTree, Message, OutboxError,
    OutboxResult, U256,
};
use tracing_subscriber::EnvFilter;

/// One whole token in canonical (18-decimal) units.
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// Native-unit funds held by custody in every fixture.
pub const CUSTODY_FUNDS: u128 = 1_000_000 * ONE;

// ── Identities ──

pub fn asset() -> Address {
    Address::repeat_byte(0xa5)
}

pub fn custody() -> Address {
    Address::repeat_byte(0xc0)
}

pub fn publisher() -> Address {
    Address::repeat_byte(0x9b)
}

/// Origin-domain sender used by default messages.
pub fn alice() -> Address {
    Address::repeat_byte(0x01)
}

/// Destination target used by default messages.
pub fn bob() -> Address {
    Address::repeat_byte(0x02)
}

pub fn carol() -> Address {
    Address::repeat_byte(0x03)
}

// ── Logging ──

/// Route engine logs to the test writer. Honors `RUST_LOG`; safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ── Messages ──

/// A message from `alice()` to `target` carrying `value` canonical units.
///
/// `nonce` lands in `origin_block` so otherwise identical messages hash
/// differently.
pub fn message_to(target: Address, value: u128, nonce: u64) -> Message {
    Message {
        sender: alice(),
        target,
        origin_block: 1_000 + nonce,
        destination_block: 500,
        timestamp: 1_700_000_000 + nonce,
        value: U256::from(value),
        payload: Bytes::from(format!("call-{nonce}").into_bytes()),
    }
}

/// `count` messages to `bob()`, each worth `i + 1` whole tokens.
pub fn messages(count: u64) -> Vec<Message> {
    (0..count)
        .map(|i| message_to(bob(), (i as u128 + 1) * ONE, i))
        .collect()
}

/// Map an engine error raised inside a target into a call revert.
pub fn revert_with(target: Address, err: OutboxError) -> HostError {
    HostError::CallReverted {
        target,
        reason: err.to_string(),
    }
}

// ── Fixture ──

/// Initialized outbox plus everything needed to prove its messages.
pub struct Fixture {
    pub outbox: Outbox,
    pub host: MockHost,
    /// Every message committed so far, in send order.
    pub sent: Vec<Message>,
    /// Tree over `sent`, as of the last publication.
    pub tree: MerkleTree,
}

impl Fixture {
    /// Canonical-decimals asset, custody funded, nothing published.
    pub fn new() -> Self {
        Self::with_decimals(18)
    }

    pub fn with_decimals(decimals: u8) -> Self {
        init_tracing();
        let mut outbox = Outbox::new();
        outbox
            .initialize(OutboxConfig::new(asset(), custody(), publisher()).with_native_decimals(decimals))
            .unwrap();
        Self {
            outbox,
            host: MockHost::new(custody(), U256::from(CUSTODY_FUNDS)),
            sent: Vec::new(),
            tree: MerkleTree::from_items(&[]),
        }
    }

    /// Append `batch` to the sent messages and publish the root over all of
    /// them. Returns the new epoch (the total number of messages).
    pub fn send_and_publish(&mut self, batch: Vec<Message>) -> EpochId {
        self.sent.extend(batch);
        let items: Vec<Hash> = self.sent.iter().map(Message::item_hash).collect();
        self.tree = MerkleTree::from_items(&items);
        let epoch = self.sent.len() as EpochId;
        self.outbox
            .publish_root(&publisher(), epoch, self.tree.root())
            .unwrap();
        epoch
    }

    /// Proof for `index` against the latest published tree.
    pub fn proof(&self, index: LeafIndex) -> Vec<Hash> {
        self.tree.prove(index).unwrap()
    }

    /// Execute the sent message at `index` with a fresh proof.
    pub fn execute(&mut self, index: LeafIndex) -> OutboxResult<ExecutionReceipt> {
        let proof = self.proof(index);
        let message = self.sent[index as usize].clone();
        self.outbox.execute(&mut self.host, &proof, index, &message)
    }
}
