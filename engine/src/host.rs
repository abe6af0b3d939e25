//! Host interface trait: abstraction over the destination-domain collaborators.
//!
//! The `BridgeHost` trait decouples the orchestrator from whatever moves the
//! bridged asset and delivers calls to targets.
//!
//! - In production: implemented by the settlement environment
//! - In tests: implemented via `MockHost` (in-memory custody + target handlers)
//!
//! Hosts take part in the orchestrator's transaction: every execution opens
//! a host checkpoint and either commits or reverts it together with the
//! engine's own journal.

use std::collections::BTreeMap;

use outbox_primitives::{Address, Checkpoint, HostError, Journal, U256};
use crate::context::ActiveContext;
use crate::executor::Outbox;

/// A call delivered to a destination target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCall<'a> {
    /// Origin-domain sender of the message.
    pub sender: Address,
    /// Destination target receiving the call.
    pub target: Address,
    /// Native-denominated amount released to the target before the call.
    pub amount: U256,
    /// Call data.
    pub payload: &'a [u8],
}

/// Collaborators the orchestrator drives during an execution.
pub trait BridgeHost {
    /// Move `amount` of `asset` from custody to `to`.
    fn release(&mut self, asset: &Address, to: &Address, amount: U256) -> Result<(), HostError>;

    /// Deliver `call` to its target.
    ///
    /// `outbox` is the engine running the execution. The target may read
    /// its context register and may re-enter its public operations.
    fn dispatch(&mut self, outbox: &mut Outbox, call: &TargetCall<'_>) -> Result<(), HostError>;

    /// Open a unit of work that can be reverted.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Keep everything done since `cp`.
    fn commit(&mut self, cp: Checkpoint);

    /// Undo everything done since `cp`.
    fn revert(&mut self, cp: Checkpoint);
}

// ── MockHost: in-memory host for testing ──

/// Behaviour attached to a target address in a [`MockHost`].
pub type TargetHandler =
    Box<dyn FnMut(&mut Outbox, &mut MockHost, &TargetCall<'_>) -> Result<(), HostError>>;

/// A call that reached its target, with the context the target observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub target: Address,
    pub sender: Address,
    pub amount: U256,
    pub payload: Vec<u8>,
    pub context: Option<ActiveContext>,
}

#[derive(Debug, Clone)]
enum HostMutation {
    Balance { holder: Address, previous: U256 },
    Delivery,
}

/// In-memory host for deterministic testing.
///
/// Holds one asset ledger (custody plus recipients) and a registry of
/// target handlers. Targets without a handler accept every call.
pub struct MockHost {
    /// Custody component that releases funds.
    custody: Address,
    /// Asset balances by holder.
    balances: BTreeMap<Address, U256>,
    /// Handlers by target address.
    handlers: BTreeMap<Address, TargetHandler>,
    /// Every call that reached a target, oldest first.
    deliveries: Vec<Delivery>,
    /// Undo journal for balances and deliveries.
    journal: Journal<HostMutation>,
    /// Checkpoints opened and not yet committed or reverted.
    open: usize,
}

impl MockHost {
    /// Create a host whose custody component holds `funds`.
    pub fn new(custody: Address, funds: U256) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(custody, funds);
        Self {
            custody,
            balances,
            handlers: BTreeMap::new(),
            deliveries: Vec::new(),
            journal: Journal::new(),
            open: 0,
        }
    }

    /// Attach `handler` to `target`.
    pub fn register<F>(&mut self, target: Address, handler: F)
    where
        F: FnMut(&mut Outbox, &mut MockHost, &TargetCall<'_>) -> Result<(), HostError> + 'static,
    {
        self.handlers.insert(target, Box::new(handler));
    }

    /// Make every call to `target` revert with `reason`.
    pub fn reject_calls(&mut self, target: Address, reason: &str) {
        let reason = reason.to_string();
        self.register(target, move |_, _, call| {
            Err(HostError::CallReverted {
                target: call.target,
                reason: reason.clone(),
            })
        });
    }

    /// Balance of `holder`.
    pub fn balance_of(&self, holder: &Address) -> U256 {
        self.balances.get(holder).copied().unwrap_or(U256::ZERO)
    }

    /// Balance left in custody.
    pub fn custody_balance(&self) -> U256 {
        self.balance_of(&self.custody)
    }

    /// Calls that reached their target, oldest first.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    fn set_balance(&mut self, holder: Address, amount: U256) {
        let previous = self.balance_of(&holder);
        self.journal.record(HostMutation::Balance { holder, previous });
        self.balances.insert(holder, amount);
    }

    fn close(&mut self) {
        self.open = self.open.saturating_sub(1);
        if self.open == 0 {
            self.journal.clear();
        }
    }
}

impl BridgeHost for MockHost {
    fn release(&mut self, _asset: &Address, to: &Address, amount: U256) -> Result<(), HostError> {
        let available = self.custody_balance();
        if available < amount {
            return Err(HostError::Transfer {
                to: *to,
                amount,
                reason: format!("custody holds {available}"),
            });
        }
        if *to == self.custody {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| HostError::Transfer {
                to: *to,
                amount,
                reason: "recipient balance overflow".into(),
            })?;
        self.set_balance(self.custody, available - amount);
        self.set_balance(*to, credited);
        Ok(())
    }

    fn dispatch(&mut self, outbox: &mut Outbox, call: &TargetCall<'_>) -> Result<(), HostError> {
        self.deliveries.push(Delivery {
            target: call.target,
            sender: call.sender,
            amount: call.amount,
            payload: call.payload.to_vec(),
            context: outbox.context().current().cloned(),
        });
        self.journal.record(HostMutation::Delivery);

        // The handler is detached while it runs so it can borrow the host.
        // A re-entrant call to the same target meanwhile sees a plain account.
        let Some(mut handler) = self.handlers.remove(&call.target) else {
            return Ok(());
        };
        let result = handler(outbox, self, call);
        self.handlers.entry(call.target).or_insert(handler);
        result
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.open += 1;
        self.journal.checkpoint()
    }

    fn commit(&mut self, _cp: Checkpoint) {
        self.close();
    }

    fn revert(&mut self, cp: Checkpoint) {
        for mutation in self.journal.revert_to(cp) {
            match mutation {
                HostMutation::Balance { holder, previous } => {
                    self.balances.insert(holder, previous);
                }
                HostMutation::Delivery => {
                    self.deliveries.pop();
                }
            }
        }
        self.close();
    }
}
