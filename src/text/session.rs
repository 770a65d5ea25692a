//! One open document with its lock, undo history and statistics.
//!
//! ```text
//! edit thread                               render thread
//! -----------                               -------------
//! insert/delete/undo/redo                   read(|doc| measure + paint)
//!   write side ──▶ Document + EditHistory     read side ──▶ Document
//! ```
//!
//! The history lives inside the same [`Shared`] as the document, so it can
//! only be pushed, undone or redone under the write side.

use crate::config::SessionOptions;
use crate::count::{CachedWordCounter, CounterKind, WordCounter};
use crate::error::Result;
use crate::event::{LogLevel, emit_log};
use crate::segment::{Segmenter, SegmenterHandle};
use crate::sync::{Shared, SharedMut};
use crate::text::{Document, EditAction, EditHistory, EditKind, TextLoc};

/// Everything guarded by the session lock.
#[derive(Debug, Default)]
pub struct SessionState {
    document: Document,
    history: EditHistory,
}

impl SessionState {
    /// The document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The undo history.
    #[must_use]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }
}

/// Editing session over one document.
///
/// All methods take `&self`; share the session between an edit thread and a
/// render thread through an `Arc`.
///
/// # Examples
///
/// ```
/// use draftcore::{EditSession, TextLoc};
///
/// let session = EditSession::with_text("Hello");
/// let caret = session.insert(TextLoc::new(0, 5), " world").unwrap();
/// assert_eq!(caret, TextLoc::new(0, 11));
/// assert_eq!(session.word_count(), 2);
///
/// session.undo().unwrap();
/// assert_eq!(session.text(), "Hello");
/// session.redo().unwrap();
/// assert_eq!(session.text(), "Hello world");
/// ```
#[derive(Debug, Default)]
pub struct EditSession {
    state: Shared<SessionState>,
    counter: CachedWordCounter,
    segmenter: SegmenterHandle,
}

impl EditSession {
    /// Create an empty session with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over existing text with default options.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self::with_options(text, SessionOptions::default())
    }

    /// Create a session with explicit options.
    ///
    /// A configured dictionary starts loading in the background; word-wise
    /// commands wait for it the first time they need it.
    #[must_use]
    pub fn with_options(text: &str, options: SessionOptions) -> Self {
        let segmenter = match &options.dictionary {
            Some(path) => SegmenterHandle::build(path.clone()),
            None => SegmenterHandle::unicode(),
        };
        Self::with_segmenter(text, options, segmenter)
    }

    /// Create a session with an explicitly provided segmenter.
    ///
    /// `options.dictionary` is ignored.
    #[must_use]
    pub fn with_segmenter(text: &str, options: SessionOptions, segmenter: SegmenterHandle) -> Self {
        Self {
            state: Shared::new(SessionState {
                document: Document::with_text(text),
                history: EditHistory::with_capacity(options.history_capacity),
            }),
            counter: CachedWordCounter::new(options.counter),
            segmenter,
        }
    }

    /// Run `f` under the read side, e.g. for measuring or painting.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let state = self.state.read();
        f(&state.document)
    }

    /// Run `f` over the whole locked state under the read side.
    pub fn inspect<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let state = self.state.read();
        f(&state)
    }

    /// Full document text.
    #[must_use]
    pub fn text(&self) -> String {
        self.read(Document::text)
    }

    /// The segmenter used by word-wise commands.
    #[must_use]
    pub fn segmenter(&self) -> &SegmenterHandle {
        &self.segmenter
    }

    /// Insert text and record it for undo.
    ///
    /// Returns the caret location after the inserted text.
    pub fn insert(&self, at: TextLoc, text: &str) -> Result<TextLoc> {
        let mut state = self.state.write();
        if text.is_empty() {
            state.document.loc_to_char(at)?;
            return Ok(at);
        }
        let blocks = state.document.block_count();
        let caret = state
            .document
            .insert(at, text)
            .inspect_err(|e| emit_log(LogLevel::Warn, &format!("insert at {at} rejected: {e}")))?;
        state
            .history
            .push(EditAction::from_edit(EditKind::Insert, at, text));
        self.invalidate_counts(&state, at.block, blocks);
        Ok(caret)
    }

    /// Delete `len` characters forward from `at` and record it for undo.
    ///
    /// Returns the removed text.
    pub fn delete(&self, at: TextLoc, len: usize) -> Result<String> {
        let mut state = self.state.write();
        self.delete_locked(&mut state, at, len)
    }

    /// Undo the newest applied edit.
    ///
    /// Returns the caret location afterwards, or `None` if there was nothing
    /// to undo.
    pub fn undo(&self) -> Result<Option<TextLoc>> {
        let mut state = self.state.write();
        let Some(action) = state.history.get_undo_action() else {
            return Ok(None);
        };
        self.replay(&mut state, &action).map(Some)
    }

    /// Redo the newest undone edit.
    ///
    /// Returns the caret location afterwards, or `None` if there was nothing
    /// to redo.
    pub fn redo(&self) -> Result<Option<TextLoc>> {
        let mut state = self.state.write();
        let Some(action) = state.history.get_redo_action() else {
            return Ok(None);
        };
        self.replay(&mut state, &action).map(Some)
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.inspect(|s| s.history.can_undo())
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.inspect(|s| s.history.can_redo())
    }

    /// Drop all undo and redo records.
    pub fn clear_history(&self) {
        self.state.write().history.clear();
    }

    /// Current history capacity.
    #[must_use]
    pub fn history_capacity(&self) -> usize {
        self.inspect(|s| s.history.capacity())
    }

    /// Change the history capacity; see [`EditHistory::set_capacity`].
    pub fn set_history_capacity(&self, capacity: usize) {
        self.state.write().history.set_capacity(capacity);
    }

    /// Current counting strategy.
    #[must_use]
    pub fn counter_kind(&self) -> CounterKind {
        self.counter.kind()
    }

    /// Switch the counting strategy.
    pub fn set_counter_kind(&self, kind: CounterKind) {
        self.counter.set_kind(kind);
    }

    /// Units in the whole document, memoized per block.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.read(|doc| {
            (0..doc.block_count())
                .filter_map(|idx| doc.block(idx).map(|text| (idx, text)))
                .map(|(idx, text)| self.counter.count_and_cache(idx, &text))
                .sum()
        })
    }

    /// Units in one block.
    #[must_use]
    pub fn block_word_count(&self, block: usize) -> Option<usize> {
        self.read(|doc| {
            doc.block(block)
                .map(|text| self.counter.count_and_cache(block, &text))
        })
    }

    /// Caret location one word before `at`, staying within the block.
    ///
    /// At the start of a block this is the end of the previous block.
    pub fn previous_word_boundary(&self, at: TextLoc) -> Result<TextLoc> {
        let segmenter = self.segmenter.get();
        let state = self.state.read();
        previous_boundary(&state.document, &*segmenter, at)
    }

    /// Caret location one word after `at`, staying within the block.
    ///
    /// At the end of a block this is the start of the next block.
    pub fn next_word_boundary(&self, at: TextLoc) -> Result<TextLoc> {
        let segmenter = self.segmenter.get();
        let state = self.state.read();
        next_boundary(&state.document, &*segmenter, at)
    }

    /// Delete the word before `at`.
    ///
    /// Returns the caret location afterwards.
    pub fn delete_previous_word(&self, at: TextLoc) -> Result<TextLoc> {
        let segmenter = self.segmenter.get();
        let mut state = self.state.write();
        let start = previous_boundary(&state.document, &*segmenter, at)?;
        let len = state.document.loc_to_char(at)? - state.document.loc_to_char(start)?;
        self.delete_locked(&mut state, start, len)?;
        Ok(start)
    }

    /// Delete the word after `at`.
    ///
    /// Returns the caret location afterwards, which is `at`.
    pub fn delete_next_word(&self, at: TextLoc) -> Result<TextLoc> {
        let segmenter = self.segmenter.get();
        let mut state = self.state.write();
        let end = next_boundary(&state.document, &*segmenter, at)?;
        let len = state.document.loc_to_char(end)? - state.document.loc_to_char(at)?;
        self.delete_locked(&mut state, at, len)?;
        Ok(at)
    }

    fn delete_locked(
        &self,
        state: &mut SharedMut<'_, SessionState>,
        at: TextLoc,
        len: usize,
    ) -> Result<String> {
        if len == 0 {
            state.document.loc_to_char(at)?;
            return Ok(String::new());
        }
        let blocks = state.document.block_count();
        let removed = state
            .document
            .delete(at, len)
            .inspect_err(|e| emit_log(LogLevel::Warn, &format!("delete at {at} rejected: {e}")))?;
        state
            .history
            .push(EditAction::from_edit(EditKind::Delete, at, removed.clone()));
        self.invalidate_counts(&**state, at.block, blocks);
        Ok(removed)
    }

    /// Apply an action handed out by the history.
    ///
    /// A failure means history and document disagree; the history is then
    /// useless and is cleared.
    fn replay(
        &self,
        state: &mut SharedMut<'_, SessionState>,
        action: &EditAction,
    ) -> Result<TextLoc> {
        let at = *action.at();
        let blocks = state.document.block_count();
        let applied = match action.kind() {
            EditKind::Insert => state.document.insert(at, action.text()),
            EditKind::Delete => state.document.delete_text(at, action.text()).map(|()| at),
        };
        match applied {
            Ok(caret) => {
                self.invalidate_counts(&**state, at.block, blocks);
                Ok(caret)
            }
            Err(e) => {
                emit_log(
                    LogLevel::Error,
                    &format!("history out of sync at {action}, clearing it: {e}"),
                );
                state.history.clear();
                Err(e)
            }
        }
    }

    fn invalidate_counts(&self, state: &SessionState, block: usize, blocks_before: usize) {
        if state.document.block_count() == blocks_before {
            self.counter.invalidate(block);
        } else {
            self.counter.invalidate_from(block);
        }
    }
}

fn previous_boundary(doc: &Document, segmenter: &dyn Segmenter, at: TextLoc) -> Result<TextLoc> {
    let prefix = doc.block_prefix(at)?;
    if prefix.is_empty() {
        return Ok(match at.block.checked_sub(1) {
            Some(prev) => TextLoc::new(prev, doc.block_len(prev).unwrap_or(0)),
            None => at,
        });
    }
    let word = segmenter.last_word(&prefix).chars().count();
    Ok(TextLoc::new(at.block, at.offset - word.clamp(1, at.offset)))
}

fn next_boundary(doc: &Document, segmenter: &dyn Segmenter, at: TextLoc) -> Result<TextLoc> {
    let suffix = doc.block_suffix(at)?;
    if suffix.is_empty() {
        return Ok(if at.block + 1 < doc.block_count() {
            TextLoc::new(at.block + 1, 0)
        } else {
            at
        });
    }
    let available = suffix.chars().count();
    let word = segmenter.first_word(&suffix).chars().count();
    Ok(TextLoc::new(at.block, at.offset + word.clamp(1, available)))
}
