//! Checkpointed undo journal for transactional engine state.
//!
//! Every mutation of engine state during an execution is recorded as an
//! entry. A [`Checkpoint`] marks the journal length before a nested unit of
//! work; reverting to it hands back the entries recorded since, newest
//! first, so the owner can undo them. Committing keeps the entries so that
//! an enclosing checkpoint can still roll them back.

/// Journal position to revert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Number of entries recorded before this checkpoint was taken.
    pub fn depth(self) -> usize {
        self.0
    }
}

/// Ordered record of undoable mutations.
#[derive(Debug, Clone)]
pub struct Journal<E> {
    entries: Vec<E>,
}

impl<E> Journal<E> {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record a mutation that has just been applied.
    pub fn record(&mut self, entry: E) {
        self.entries.push(entry);
    }

    /// Mark the current position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }

    /// Remove and return every entry recorded after `cp`, newest first.
    ///
    /// Reverting to a checkpoint that is already behind the journal head
    /// (the journal was cleared) returns nothing.
    pub fn revert_to(&mut self, cp: Checkpoint) -> Vec<E> {
        if cp.0 >= self.entries.len() {
            return Vec::new();
        }
        let mut undone = self.entries.split_off(cp.0);
        undone.reverse();
        undone
    }

    /// Drop every entry. Called once the outermost unit of work commits.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries recorded so far, oldest first.
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Journal<E> {
    fn default() -> Self {
        Self::new()
    }
}
