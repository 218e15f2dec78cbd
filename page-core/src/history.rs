//! Bounded linear undo/redo history.
//!
//! ## Design
//!
//! - The history is a list of checkpoints plus a pointer to the current one
//! - A checkpoint discards every entry after the pointer (the redo branch)
//! - Once the cap is exceeded the oldest entries are evicted
//! - Undo/redo only move the pointer; callers restore the returned state

/// Default maximum number of checkpoints kept.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Linear checkpoint history.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    index: usize,
    max_entries: usize,
}

impl<T: Clone> History<T> {
    /// Create an empty history holding at most `max_entries` checkpoints.
    ///
    /// A cap of zero is treated as one: the current state is always kept.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Drop all checkpoints and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }

    /// Drop all checkpoints.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    /// Record a new checkpoint after the current one.
    pub fn checkpoint(&mut self, state: T) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(state);

        let overflow = self.entries.len().saturating_sub(self.max_entries);
        if overflow > 0 {
            self.entries.drain(..overflow);
            tracing::debug!("Evicted {overflow} oldest history entries");
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one checkpoint, returning the state to restore.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one checkpoint, returning the state to restore.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Whether there is an earlier checkpoint.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether there is a later checkpoint.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The checkpoint the pointer is on.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.index)
    }

    /// Number of stored checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no checkpoint is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the pointer.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Maximum number of checkpoints kept.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
