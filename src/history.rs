//! Bounded linear undo/redo history.
//!
//! DESIGN
//! ======
//! Snapshots live in a `VecDeque` with a cursor on the active entry. The
//! history always holds at least the initial snapshot, so the cursor is
//! always a valid index. Pushing after an undo discards the redo tail; there
//! is no branching. When the buffer is full the oldest entry is evicted.
//!
//! GESTURES
//! ========
//! Continuous interactions (a drag crossing many drop targets) open a
//! gesture. Pushes inside a gesture only replace a pending snapshot, and
//! `commit_gesture` records it as one entry, so the user undoes one logical
//! reorder instead of every intermediate position.

use std::collections::VecDeque;

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct UndoRedoStack<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
    gesture: Option<Option<T>>,
}

impl<T: Clone> UndoRedoStack<T> {
    /// Start a history at `initial`. A capacity of zero is treated as one.
    #[must_use]
    pub fn new(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY));
        entries.push_back(initial);
        Self { entries, cursor: 0, capacity, gesture: None }
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the initial snapshot is always kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Record a new snapshot. Inside an open gesture this only replaces the
    /// pending snapshot.
    pub fn push(&mut self, state: T) {
        if let Some(pending) = self.gesture.as_mut() {
            *pending = Some(state);
            return;
        }
        self.record(state);
    }

    /// Step back. At the oldest entry this is a no-op returning the current
    /// snapshot.
    pub fn undo(&mut self) -> &T {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self.current()
    }

    /// Step forward. At the newest entry this is a no-op returning the
    /// current snapshot.
    pub fn redo(&mut self) -> &T {
        if self.can_redo() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Drop everything and restart at `state`.
    pub fn reset(&mut self, state: T) {
        self.entries.clear();
        self.entries.push_back(state);
        self.cursor = 0;
        self.gesture = None;
    }

    // --- Gestures ---

    #[must_use]
    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Open a gesture. Opening one while another is open keeps the pending
    /// snapshot.
    pub fn begin_gesture(&mut self) {
        if self.gesture.is_none() {
            self.gesture = Some(None);
        }
    }

    /// Abandon the gesture and return the snapshot it started from.
    pub fn cancel_gesture(&mut self) -> &T {
        self.gesture = None;
        self.current()
    }

    fn record(&mut self, state: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(state);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }
}

impl<T: Clone + PartialEq> UndoRedoStack<T> {
    /// Close the gesture, recording its final snapshot as one entry. Returns
    /// `false` when nothing was pushed or the gesture ended where it began.
    pub fn commit_gesture(&mut self) -> bool {
        let Some(pending) = self.gesture.take() else {
            return false;
        };
        match pending {
            Some(state) if state != *self.current() => {
                self.record(state);
                true
            }
            _ => false,
        }
    }
}
