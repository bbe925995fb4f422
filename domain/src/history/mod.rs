//! Bounded, linear undo/redo log of document snapshots.
//!
//! The log always holds at least one entry and a cursor pointing at the
//! "current" one (`0 <= cursor < len`). Pushing truncates any redo branch
//! past the cursor; when the log is full the oldest entry is dropped.

use std::collections::VecDeque;

/// Maximum number of snapshots kept in an editing session
pub const HISTORY_LIMIT: usize = 20;

/// Undo/redo snapshot log with a cursor
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone + PartialEq> History<T> {
    /// Create a log seeded with `initial` and the default capacity
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, HISTORY_LIMIT)
    }

    /// Create a log seeded with `initial`; capacity is at least one
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.max(1));
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new snapshot after the cursor.
    ///
    /// Entries past the cursor are discarded first. Returns `false` without
    /// touching the log when `entry` equals the current snapshot.
    pub fn push(&mut self, entry: T) -> bool {
        if self.current() == &entry {
            return false;
        }
        self.append(entry);
        true
    }

    /// Record `entry` after the cursor even if it equals the current snapshot.
    ///
    /// Entries past the cursor are discarded; afterwards the log ends with
    /// `entry` and the cursor sits on it.
    pub fn append(&mut self, entry: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Move the cursor back one entry and return the snapshot there
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Move the cursor forward one entry and return the snapshot there
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// Collapse the log to a single entry
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.cursor = 0;
    }

    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the log is never empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn last(&self) -> &T {
        &self.entries[self.entries.len() - 1]
    }
}
