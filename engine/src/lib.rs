//! `outbox-engine`: destination-side execution of bridged messages.
//!
//! A publisher commits Merkle roots over batches of outbound messages. Anyone
//! may then execute a committed message by presenting it with an inclusion
//! proof: the engine verifies the proof against a published root, spends the
//! leaf index exactly once, releases the rescaled amount from custody and
//! delivers the payload to the target, exposing the message's metadata in a
//! context register for the duration of the call.
//!
//! ## Architecture
//!
//! - [`executor::Outbox`]: top-level orchestrator (`initialize`, `publish_root`, `execute`)
//! - [`ledger`]: root ledger and replay bitmap
//! - [`context`]: execution context register
//! - [`validation`]: configuration checks and the call-target policy
//! - [`host::BridgeHost`]: trait abstracting custody and target delivery
//! - [`host::MockHost`]: in-memory implementation for testing
//! - [`config`]: serde-backed configuration

pub mod config;
pub mod context;
pub mod events;
pub mod executor;
pub mod host;
pub mod ledger;
pub mod validation;

// Re-export key types for convenience
pub use config::OutboxConfig;
pub use context::{ActiveContext, ContextRegister};
pub use events::{ExecutionReceipt, OutboxEvent};
pub use executor::Outbox;
pub use host::{BridgeHost, Delivery, MockHost, TargetCall, TargetHandler};
pub use ledger::{ReplayLedger, RootLedger};
pub use validation::TargetPolicy;
