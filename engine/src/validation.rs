//! Configuration and call-target validation.
//!
//! `validate_config` runs once in `initialize`. `TargetPolicy` runs for every
//! execution before any state changes, so a rejected target leaves the
//! ledgers and custody untouched.

use std::collections::BTreeSet;

use outbox_primitives::{Address, OutboxError, OutboxResult, MAX_PROOF_DEPTH};
use crate::config::OutboxConfig;

/// Validate identity fields of an `OutboxConfig`: `asset`, `custody` and
/// `publisher` must be non-zero.
pub fn validate_identities(config: &OutboxConfig) -> OutboxResult<()> {
    for (name, addr) in [
        ("asset", &config.asset),
        ("custody", &config.custody),
        ("publisher", &config.publisher),
    ] {
        if addr.is_zero() {
            return Err(OutboxError::InvalidConfig(format!("{name} must be non-zero")));
        }
    }
    Ok(())
}

/// Validate the proof-depth bound.
pub fn validate_depth(config: &OutboxConfig) -> OutboxResult<()> {
    if config.max_proof_depth > MAX_PROOF_DEPTH {
        return Err(OutboxError::InvalidConfig(format!(
            "max_proof_depth {} exceeds {}",
            config.max_proof_depth, MAX_PROOF_DEPTH
        )));
    }
    Ok(())
}

/// Validate an entire `OutboxConfig` before binding it.
pub fn validate_config(config: &OutboxConfig) -> OutboxResult<()> {
    validate_identities(config)?;
    validate_depth(config)?;
    Ok(())
}

/// Which destination targets an execution may call.
///
/// The bridged asset and its custody component are always refused: a
/// message calling either could move custody funds outside the accounting
/// done by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct TargetPolicy {
    denied: BTreeSet<Address>,
}

impl TargetPolicy {
    /// Policy refusing the configured asset, custody, and extra denied targets.
    pub fn from_config(config: &OutboxConfig) -> Self {
        let mut denied: BTreeSet<Address> = config.denied_targets.iter().copied().collect();
        denied.insert(config.asset);
        denied.insert(config.custody);
        Self { denied }
    }

    /// Returns true if `target` may be called.
    pub fn is_allowed(&self, target: &Address) -> bool {
        !self.denied.contains(target)
    }

    /// Fail with `CallTargetNotAllowed` if `target` is refused.
    pub fn check(&self, target: &Address) -> OutboxResult<()> {
        if self.is_allowed(target) {
            Ok(())
        } else {
            Err(OutboxError::CallTargetNotAllowed { target: *target })
        }
    }
}
