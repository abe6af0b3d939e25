//! Root and replay ledgers.
//!
//! - [`RootLedger`]: epoch id → committed root, append-only
//! - [`ReplayLedger`]: which leaf indices have been executed
//!
//! Both are plain owned state on the [`Outbox`](crate::Outbox). Removal
//! helpers are crate-private and exist only for journal rollback.

use outbox_primitives::{EpochId, Hash, LeafIndex, OutboxError, OutboxResult, U256};
use std::collections::{BTreeMap, BTreeSet};

/// Leaf indices per bitmap word.
const WORD_BITS: u64 = 256;

/// Committed roots keyed by epoch.
///
/// An epoch id is the number of leaves the root commits, so the root of
/// epoch `e` can prove any index below `e`. A reverse index from root to
/// the epochs that published it keeps [`resolve`](Self::resolve) a pair of
/// map lookups however many epochs accumulate.
#[derive(Debug, Clone, Default)]
pub struct RootLedger {
    roots: BTreeMap<EpochId, Hash>,
    by_root: BTreeMap<Hash, BTreeSet<EpochId>>,
}

impl RootLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `root` for `epoch`. Fails if the epoch already has a root.
    pub fn publish(&mut self, epoch: EpochId, root: Hash) -> OutboxResult<()> {
        if self.roots.contains_key(&epoch) {
            return Err(OutboxError::EpochAlreadyPublished { epoch });
        }
        self.roots.insert(epoch, root);
        self.by_root.entry(root).or_default().insert(epoch);
        Ok(())
    }

    /// Root published for `epoch`.
    pub fn get(&self, epoch: EpochId) -> OutboxResult<Hash> {
        self.roots
            .get(&epoch)
            .copied()
            .ok_or(OutboxError::UnknownEpoch { epoch })
    }

    /// Most recently assigned epoch and its root.
    pub fn latest(&self) -> Option<(EpochId, Hash)> {
        self.roots.last_key_value().map(|(e, r)| (*e, *r))
    }

    /// Find an epoch that covers `index` and whose root is `candidate`.
    ///
    /// Returns the largest such epoch. `UnknownEpoch` if no published epoch
    /// covers the index yet, `Unproven` if some do but none carries the
    /// candidate root.
    pub fn resolve(&self, index: LeafIndex, candidate: &Hash) -> OutboxResult<EpochId> {
        let matched = self
            .by_root
            .get(candidate)
            .and_then(|epochs| epochs.last())
            .copied();
        if let Some(epoch) = matched.filter(|epoch| *epoch > index) {
            return Ok(epoch);
        }

        let covered = self.latest().is_some_and(|(epoch, _)| epoch > index);
        if covered {
            Err(OutboxError::Unproven {
                index,
                computed: *candidate,
            })
        } else {
            Err(OutboxError::UnknownEpoch {
                epoch: index.saturating_add(1),
            })
        }
    }

    /// Returns the number of published epochs.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns true if nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub(crate) fn remove(&mut self, epoch: EpochId) {
        let Some(root) = self.roots.remove(&epoch) else {
            return;
        };
        if let Some(epochs) = self.by_root.get_mut(&root) {
            epochs.remove(&epoch);
            if epochs.is_empty() {
                self.by_root.remove(&root);
            }
        }
    }
}

/// Sparse bitmap of spent leaf indices.
///
/// Words of 256 bits are allocated on first use, so indices anywhere in the
/// `u64` range cost one map entry per touched word.
#[derive(Debug, Clone, Default)]
pub struct ReplayLedger {
    words: BTreeMap<u64, U256>,
}

fn slot(index: LeafIndex) -> (u64, usize) {
    (index / WORD_BITS, (index % WORD_BITS) as usize)
}

impl ReplayLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `index` has been executed.
    pub fn is_spent(&self, index: LeafIndex) -> bool {
        let (word, bit) = slot(index);
        self.words.get(&word).is_some_and(|w| w.bit(bit))
    }

    /// Mark `index` executed. Fails with `AlreadySpent` on a second mark.
    pub fn mark_spent(&mut self, index: LeafIndex) -> OutboxResult<()> {
        if self.is_spent(index) {
            return Err(OutboxError::AlreadySpent { index });
        }
        let (word, bit) = slot(index);
        self.words.entry(word).or_insert(U256::ZERO).set_bit(bit, true);
        Ok(())
    }

    /// Number of spent indices.
    pub fn spent_count(&self) -> u64 {
        self.words.values().map(|w| w.count_ones() as u64).sum()
    }

    /// Number of allocated bitmap words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub(crate) fn unmark(&mut self, index: LeafIndex) {
        let (word, bit) = slot(index);
        if let Some(w) = self.words.get_mut(&word) {
            w.set_bit(bit, false);
            if w.is_zero() {
                self.words.remove(&word);
            }
        }
    }
}
