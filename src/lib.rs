//! `draftcore` - editing core for a writing application
//!
//! The pieces a document editor needs below its UI: a reader/writer lock that
//! lets a render thread read while an edit thread mutates, a bounded
//! undo/redo history, word counting suited to mixed CJK and Latin prose, and
//! word segmentation for word-wise cursor movement.
//!
//! # Examples
//!
//! ```
//! use draftcore::{EditSession, TextLoc};
//!
//! let session = EditSession::with_text("我在写小说");
//! assert_eq!(session.word_count(), 5);
//!
//! session.insert(TextLoc::new(0, 5), " draft 2").unwrap();
//! assert_eq!(session.word_count(), 7);
//!
//! session.undo().unwrap();
//! assert_eq!(session.text(), "我在写小说");
//! ```
//!
//! The building blocks are usable on their own:
//!
//! ```
//! use draftcore::count::{StrictWordCounter, WordCounter};
//! use draftcore::SharedAccessLock;
//!
//! assert_eq!(StrictWordCounter.count_all("0x1F + 007"), 2);
//!
//! let lock = SharedAccessLock::new();
//! {
//!     let _a = lock.read_guard();
//!     let _b = lock.read_guard();
//!     assert_eq!(lock.readers(), 2);
//!     assert!(!lock.try_acquire_write());
//! }
//! assert!(lock.try_acquire_write());
//! lock.release_write();
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)] // Only sync::shared needs it, for the UnsafeCell behind the lock
#![allow(clippy::module_name_repetitions)] // Allow count::CounterKind etc
#![allow(clippy::missing_errors_doc)] // Error variants are documented on Error
#![allow(clippy::missing_panics_doc)] // Panics are contract violations, documented inline
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::must_use_candidate)] // Not every accessor needs the attribute
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod config;
pub mod count;
pub mod error;
pub mod event;
pub mod segment;
pub mod sync;
pub mod text;

// Re-export core types at crate root
pub use config::SessionOptions;
pub use count::{CounterKind, WordCounter};
pub use error::{Error, Result};
pub use event::{LogLevel, emit_event, emit_log, set_event_callback, set_log_callback};
pub use segment::{Segmenter, SegmenterHandle};
pub use sync::{Shared, SharedAccessLock};
pub use text::{
    DEFAULT_HISTORY_CAPACITY, Document, EditAction, EditHistory, EditKind, EditSession,
    SessionState, TextLoc,
};
