//! Document storage, undo history and the editing session.
//!
//! Key types:
//!
//! - [`Document`]: rope-backed text addressed by [`TextLoc`] (block, offset)
//! - [`EditHistory`]: bounded undo/redo log of [`EditAction`]s
//! - [`EditSession`]: a document plus its history behind one lock
//!
//! # Examples
//!
//! ## Recording edits by hand
//!
//! ```
//! use draftcore::{EditAction, EditHistory, EditKind, TextLoc};
//!
//! let mut history = EditHistory::with_capacity(8);
//! // The user typed "hi" at the start; the record stores how to undo it.
//! history.push(EditAction::from_edit(EditKind::Insert, TextLoc::start(), "hi"));
//!
//! let undo = history.get_undo_action().unwrap();
//! assert_eq!(undo.kind(), EditKind::Delete);
//! assert_eq!(undo.text(), "hi");
//!
//! let redo = history.get_redo_action().unwrap();
//! assert_eq!(redo.kind(), EditKind::Insert);
//! assert!(!history.can_redo());
//! ```
//!
//! ## Addressing text by block
//!
//! ```
//! use draftcore::{Document, TextLoc};
//!
//! let mut doc = Document::with_text("first\nsecond");
//! assert_eq!(doc.block_count(), 2);
//! let end = doc.insert(TextLoc::new(1, 0), "the ").unwrap();
//! assert_eq!(end, TextLoc::new(1, 4));
//! assert_eq!(doc.block(1).as_deref(), Some("the second"));
//! ```

mod document;
mod history;
mod session;

pub use document::{Document, TextLoc};
pub use history::{DEFAULT_HISTORY_CAPACITY, EditAction, EditHistory, EditKind};
pub use session::{EditSession, SessionState};
