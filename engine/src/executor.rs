//! Outbox, the message execution orchestrator.
//!
//! `Outbox::execute` runs one message through the execution lifecycle:
//!
//! 1. Check proof shape, hash the message, recompute the candidate root
//! 2. Resolve the epoch whose root matches (`UnknownEpoch` / `Unproven`)
//! 3. Refuse spent indices (`AlreadySpent`) and denied targets
//!    (`CallTargetNotAllowed`)
//! 4. Rescale the value to native decimals (`AmountTooLarge`)
//! 5. Mark the index spent, then set the context register
//! 6. Release funds from custody and deliver the payload to the target
//! 7. Restore the context register
//!
//! **Atomicity:** steps 5–7 run inside one transaction spanning the engine
//! journal and a host checkpoint. If the nested call fails, the spent mark,
//! any re-entrant executions, emitted events and custody movements are all
//! reverted. Steps 1–4 change nothing.

use outbox_primitives::{
    check_proof_shape, compute_item_root, rescale, Address, Checkpoint, EpochId, Hash, Journal,
    LeafIndex, Message, OutboxError, OutboxResult, U256,
};
use tracing::{debug, info, info_span, warn};

use crate::config::OutboxConfig;
use crate::context::{ActiveContext, ContextRegister};
use crate::events::{ExecutionReceipt, OutboxEvent};
use crate::host::{BridgeHost, TargetCall};
use crate::ledger::{ReplayLedger, RootLedger};
use crate::validation::{validate_config, TargetPolicy};

/// Engine-state mutation recorded for rollback.
#[derive(Debug, Clone, Copy)]
enum Mutation {
    Spent(LeafIndex),
    Root(EpochId),
    Event,
}

/// Whether a transaction keeps or discards its effects on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Commit,
    Discard,
}

/// The outbox execution engine.
///
/// Owns the root ledger, the replay ledger and the context register. All
/// collaborator access goes through the `BridgeHost` passed to each call.
#[derive(Debug, Default)]
pub struct Outbox {
    config: Option<OutboxConfig>,
    policy: TargetPolicy,
    roots: RootLedger,
    spent: ReplayLedger,
    context: ContextRegister,
    events: Vec<OutboxEvent>,
    journal: Journal<Mutation>,
    /// Transactions currently open (greater than one under re-entrancy).
    depth: usize,
}

impl Outbox {
    /// Create an uninitialized outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the outbox to its asset, custody and publisher. Once only.
    pub fn initialize(&mut self, config: OutboxConfig) -> OutboxResult<()> {
        if self.config.is_some() {
            return Err(OutboxError::AlreadyInitialized);
        }
        validate_config(&config)?;
        self.policy = TargetPolicy::from_config(&config);
        info!(
            asset = %config.asset,
            custody = %config.custody,
            decimals = config.native_decimals,
            "outbox initialized"
        );
        self.config = Some(config);
        Ok(())
    }

    /// The bound configuration.
    pub fn config(&self) -> OutboxResult<&OutboxConfig> {
        self.config.as_ref().ok_or(OutboxError::NotInitialized)
    }

    /// Publish `root` for `epoch`. Only the configured publisher may call this.
    pub fn publish_root(&mut self, caller: &Address, epoch: EpochId, root: Hash) -> OutboxResult<()> {
        let publisher = self.config()?.publisher;
        if *caller != publisher {
            warn!(caller = %caller, epoch, "unauthorized root publication");
            return Err(OutboxError::Unauthorized { caller: *caller });
        }
        self.roots.publish(epoch, root)?;
        self.journal.record(Mutation::Root(epoch));
        self.emit(OutboxEvent::RootPublished { epoch, root });
        if self.depth == 0 {
            self.journal.clear();
        }
        info!(epoch, root = %root, "root published");
        Ok(())
    }

    /// Root published for `epoch`.
    pub fn root(&self, epoch: EpochId) -> OutboxResult<Hash> {
        self.roots.get(epoch)
    }

    /// Read access to the root ledger.
    pub fn roots(&self) -> &RootLedger {
        &self.roots
    }

    /// Returns true if `index` has been executed.
    pub fn is_spent(&self, index: LeafIndex) -> bool {
        self.spent.is_spent(index)
    }

    /// Read access to the replay ledger.
    pub fn replay_ledger(&self) -> &ReplayLedger {
        &self.spent
    }

    /// Context of the message currently executing. Empty outside `execute`.
    pub fn context(&self) -> &ContextRegister {
        &self.context
    }

    /// Events emitted by committed operations, oldest first.
    pub fn events(&self) -> &[OutboxEvent] {
        &self.events
    }

    /// Execute `message`, proven at `index` by `proof`.
    pub fn execute(
        &mut self,
        host: &mut dyn BridgeHost,
        proof: &[Hash],
        index: LeafIndex,
        message: &Message,
    ) -> OutboxResult<ExecutionReceipt> {
        let span = info_span!("execute", index, target = %message.target);
        let _enter = span.enter();

        let result = self.execute_inner(host, proof, index, message);
        match &result {
            Ok(receipt) => info!(epoch = receipt.epoch, amount = %receipt.amount, "message executed"),
            Err(err) => warn!(error = %err, code = err.code(), "execution rejected"),
        }
        result
    }

    fn execute_inner(
        &mut self,
        host: &mut dyn BridgeHost,
        proof: &[Hash],
        index: LeafIndex,
        message: &Message,
    ) -> OutboxResult<ExecutionReceipt> {
        let (max_depth, decimals) = {
            let config = self.config()?;
            (config.max_proof_depth, config.native_decimals)
        };

        check_proof_shape(proof.len(), index, max_depth)?;
        let item = message.item_hash();
        let candidate = compute_item_root(proof, index, &item);
        debug!(item = %item, candidate = %candidate, depth = proof.len(), "recomputed root");

        let epoch = self.roots.resolve(index, &candidate)?;
        if self.spent.is_spent(index) {
            return Err(OutboxError::AlreadySpent { index });
        }
        self.policy.check(&message.target)?;
        let amount = rescale(message.value, decimals)?;
        debug!(epoch, value = %message.value, amount = %amount, "proof accepted");

        self.transact(host, Outcome::Commit, |outbox, host| {
            outbox.spent.mark_spent(index)?;
            outbox.journal.record(Mutation::Spent(index));
            outbox.run_call(host, message, index, amount)?;
            outbox.emit(OutboxEvent::MessageExecuted {
                index,
                sender: message.sender,
                target: message.target,
                amount,
            });
            Ok(())
        })?;

        Ok(ExecutionReceipt { index, epoch, amount })
    }

    /// Dry-run `message` at `index` without a proof or replay check.
    ///
    /// Applies the target policy and rescaling, then releases funds and
    /// delivers the call exactly as `execute` would. Every effect is reverted
    /// afterwards, success or not. Returns the amount the target would
    /// receive.
    pub fn simulate(
        &mut self,
        host: &mut dyn BridgeHost,
        index: LeafIndex,
        message: &Message,
    ) -> OutboxResult<U256> {
        let decimals = self.config()?.native_decimals;
        self.policy.check(&message.target)?;
        let amount = rescale(message.value, decimals)?;

        let result = self.transact(host, Outcome::Discard, |outbox, host| {
            outbox.run_call(host, message, index, amount)
        });
        debug!(index, ok = result.is_ok(), "simulation finished");
        result.map(|()| amount)
    }

    /// Run `body` as one unit of work over the engine journal and a host
    /// checkpoint. Failure always reverts both; success reverts only for
    /// `Outcome::Discard`.
    fn transact<R>(
        &mut self,
        host: &mut dyn BridgeHost,
        outcome: Outcome,
        body: impl FnOnce(&mut Self, &mut dyn BridgeHost) -> OutboxResult<R>,
    ) -> OutboxResult<R> {
        let engine_cp = self.journal.checkpoint();
        let host_cp = host.checkpoint();
        self.depth += 1;

        let result = body(self, host);

        self.depth -= 1;
        if result.is_ok() && outcome == Outcome::Commit {
            host.commit(host_cp);
            if self.depth == 0 {
                self.journal.clear();
            }
        } else {
            self.undo(engine_cp);
            host.revert(host_cp);
        }
        result
    }

    /// Set the context, release funds, deliver the call, restore the context.
    ///
    /// The context is restored on every return path of the nested call.
    fn run_call(
        &mut self,
        host: &mut dyn BridgeHost,
        message: &Message,
        index: LeafIndex,
        amount: U256,
    ) -> OutboxResult<()> {
        let previous = self.context.set(ActiveContext::new(message, index, amount));
        let result = self.deliver(host, message, amount);
        self.context.restore(previous);
        result
    }

    fn deliver(&mut self, host: &mut dyn BridgeHost, message: &Message, amount: U256) -> OutboxResult<()> {
        let asset = self.config()?.asset;
        host.release(&asset, &message.target, amount)?;
        let call = TargetCall {
            sender: message.sender,
            target: message.target,
            amount,
            payload: &message.payload,
        };
        host.dispatch(self, &call)?;
        Ok(())
    }

    fn emit(&mut self, event: OutboxEvent) {
        self.events.push(event);
        self.journal.record(Mutation::Event);
    }

    fn undo(&mut self, cp: Checkpoint) {
        for mutation in self.journal.revert_to(cp) {
            match mutation {
                Mutation::Spent(index) => self.spent.unmark(index),
                Mutation::Root(epoch) => self.roots.remove(epoch),
                Mutation::Event => {
                    self.events.pop();
                }
            }
        }
    }
}
