//! Bounded linear undo/redo log.
//!
//! The log stores actions in their *undo* form: recording an insertion of
//! `"abc"` at `2:5` stores a deletion of `"abc"` at `2:5`. Undo hands the
//! stored action back verbatim; redo hands it back with the kind flipped,
//! which is the original forward edit.
//!
//! ```text
//! entries:  [ a0 a1 a2 | a3 a4 ]
//!                    ^ cursor
//!           undo-available  redo-available
//! ```
//!
//! A new push after an undo discards everything right of the cursor; the
//! history is a line, not a tree.
//!
//! # Examples
//!
//! ```
//! use draftcore::{EditAction, EditHistory, EditKind, TextLoc};
//!
//! let mut history = EditHistory::new();
//! history.push(EditAction::from_edit(EditKind::Insert, TextLoc::new(0, 0), "hi"));
//!
//! let undo = history.get_undo_action().unwrap();
//! assert_eq!(undo.kind(), EditKind::Delete);
//!
//! let redo = history.get_redo_action().unwrap();
//! assert_eq!(redo.kind(), EditKind::Insert);
//! assert_eq!(redo.text(), "hi");
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::event::{LogLevel, emit_event, emit_log};
use crate::text::TextLoc;

/// Default number of actions retained by an [`EditHistory`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Direction of an atomic text edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    Insert,
    Delete,
}

impl EditKind {
    /// The opposite edit.
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::Insert => Self::Delete,
            Self::Delete => Self::Insert,
        }
    }
}

/// An atomic, invertible text mutation.
///
/// Kind and text fully determine how to apply and how to invert the action.
/// Fields are private so an action cannot change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditAction<L = TextLoc> {
    kind: EditKind,
    at: L,
    text: String,
}

impl<L> EditAction<L> {
    /// Create an action exactly as given.
    pub fn new(kind: EditKind, at: L, text: impl Into<String>) -> Self {
        Self {
            kind,
            at,
            text: text.into(),
        }
    }

    /// Create the undo form of a forward edit that was just applied.
    ///
    /// An insertion of `text` at `at` is recorded as a deletion of the same
    /// text at the same location, and vice versa.
    pub fn from_edit(performed: EditKind, at: L, text: impl Into<String>) -> Self {
        Self::new(performed.inverted(), at, text)
    }

    /// Kind of edit this action performs when applied.
    #[must_use]
    pub fn kind(&self) -> EditKind {
        self.kind
    }

    /// Location the action applies at.
    #[must_use]
    pub fn at(&self) -> &L {
        &self.at
    }

    /// Text inserted or deleted.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl<L: Clone> EditAction<L> {
    /// Same location and text, opposite kind.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            kind: self.kind.inverted(),
            at: self.at.clone(),
            text: self.text.clone(),
        }
    }
}

impl<L: fmt::Display> fmt::Display for EditAction<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EditAction({:?}, {}, {} chars)",
            self.kind,
            self.at,
            self.char_len()
        )
    }
}

/// Undo/redo log with a fixed capacity and a cursor.
///
/// Not synchronized. The owner must only touch it while holding the
/// document's write side; [`EditSession`](crate::text::EditSession) enforces
/// this by storing the history next to the document inside the lock.
#[derive(Clone, Debug)]
pub struct EditHistory<L = TextLoc> {
    entries: VecDeque<EditAction<L>>,
    /// Number of undo-available entries, i.e. `cursor + 1`.
    applied: usize,
    capacity: usize,
}

impl<L> Default for EditHistory<L> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<L> EditHistory<L> {
    /// Create a history with the default capacity of 256 actions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history with a custom capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            applied: 0,
            capacity,
        }
    }

    /// Index of the newest undo-available entry, `None` when nothing can be
    /// undone.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Total number of stored actions, undo and redo side together.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored actions.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of actions that can be undone.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.applied
    }

    /// Number of actions that can be redone.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.entries.len() - self.applied
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// The entry at the cursor, in its stored (undo) form.
    #[must_use]
    pub fn current(&self) -> Option<&EditAction<L>> {
        self.cursor().and_then(|idx| self.entries.get(idx))
    }

    /// Iterate over stored entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EditAction<L>> {
        self.entries.iter()
    }

    /// Change the capacity.
    ///
    /// Zero clears the log. Shrinking below the current length drops redo
    /// entries first, newest first, and only then the oldest undo entries,
    /// never more than needed to fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.check_invariants();
        if capacity == 0 {
            self.clear();
        } else if capacity < self.entries.len() {
            let excess = self.entries.len() - capacity;
            let redo_removed = excess.min(self.redo_len());
            let undo_removed = excess - redo_removed;

            self.entries.truncate(self.entries.len() - redo_removed);
            self.entries.drain(..undo_removed);
            self.applied -= undo_removed;

            emit_log(
                LogLevel::Debug,
                &format!(
                    "history capacity {capacity}: dropped {redo_removed} redo and {undo_removed} undo entries"
                ),
            );
        }
        self.capacity = capacity;
        self.check_invariants();
    }

    /// Record an action in its undo form.
    ///
    /// Pending redo entries are discarded. If the log overflows, the oldest
    /// entry is evicted. Afterwards the cursor sits on the new action.
    pub fn push(&mut self, action: EditAction<L>) {
        self.check_invariants();
        self.entries.truncate(self.applied);
        self.entries.push_back(action);

        let mut evicted = 0usize;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            evicted += 1;
        }
        self.applied = self.entries.len();

        if evicted > 0 {
            emit_log(
                LogLevel::Debug,
                &format!("history full at {}: evicted {evicted} oldest", self.capacity),
            );
            emit_event("history.evicted", &evicted.to_string());
        }
        self.check_invariants();
    }

    /// Empty the log.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.applied <= self.entries.len(),
            "history cursor {} past end {}",
            self.applied as isize - 1,
            self.entries.len()
        );
        debug_assert!(
            self.capacity == 0 || self.entries.len() <= self.capacity,
            "history holds {} entries over capacity {}",
            self.entries.len(),
            self.capacity
        );
    }
}

impl<L: Clone> EditHistory<L> {
    /// Step back one action.
    ///
    /// Returns the stored action, which applied as-is reverts the edit, or
    /// `None` when there is nothing to undo.
    #[must_use]
    pub fn get_undo_action(&mut self) -> Option<EditAction<L>> {
        self.check_invariants();
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        self.entries.get(self.applied).cloned()
    }

    /// Step forward one action.
    ///
    /// Returns the original forward edit, or `None` when there is nothing
    /// to redo.
    #[must_use]
    pub fn get_redo_action(&mut self) -> Option<EditAction<L>> {
        self.check_invariants();
        let action = self.entries.get(self.applied)?.inverted();
        self.applied += 1;
        Some(action)
    }
}
