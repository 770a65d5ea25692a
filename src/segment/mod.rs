//! Word segmentation for word-wise cursor movement and deletion.
//!
//! Scripts such as Chinese have no spaces between words, so "delete previous
//! word" needs a lexical oracle. [`Segmenter`] is that oracle's contract:
//!
//! - [`DictionarySegmenter`]: dictionary-driven segmentation for CJK runs
//! - [`UnicodeSegmenter`]: UAX #29 word boundaries, the degraded fallback
//! - [`SegmenterHandle`]: builds a segmenter on a background thread
//!
//! # Edge window
//!
//! [`Segmenter::first_word`] and [`Segmenter::last_word`] only look at the
//! nearest [`EDGE_WINDOW`] characters. A long unbroken run may therefore be
//! split differently than a full [`Segmenter::cut`] would split it; the
//! result is still a valid prefix or suffix of the text.

mod dictionary;
mod handle;
mod unicode;

pub use dictionary::DictionarySegmenter;
pub use handle::SegmenterHandle;
pub use unicode::UnicodeSegmenter;

/// Number of characters examined by [`Segmenter::first_word`] and
/// [`Segmenter::last_word`].
pub const EDGE_WINDOW: usize = 16;

/// Splits text into an ordered sequence of lexical words.
///
/// `cut` must be lossless: joining the pieces reproduces the input.
/// Whitespace and punctuation come back as pieces of their own.
pub trait Segmenter: Send + Sync {
    /// Split the whole text.
    fn cut(&self, text: &str) -> Vec<String>;

    /// First word of `text`, looking at most [`EDGE_WINDOW`] characters in.
    ///
    /// Empty only when `text` is empty.
    fn first_word(&self, text: &str) -> String {
        let end = text
            .char_indices()
            .nth(EDGE_WINDOW)
            .map_or(text.len(), |(idx, _)| idx);
        self.cut(&text[..end]).into_iter().next().unwrap_or_default()
    }

    /// Last word of `text`, looking at most [`EDGE_WINDOW`] characters back.
    ///
    /// Empty only when `text` is empty.
    fn last_word(&self, text: &str) -> String {
        let start = text
            .char_indices()
            .rev()
            .nth(EDGE_WINDOW - 1)
            .map_or(0, |(idx, _)| idx);
        self.cut(&text[start..]).pop().unwrap_or_default()
    }
}

impl<S: Segmenter + ?Sized> Segmenter for std::sync::Arc<S> {
    fn cut(&self, text: &str) -> Vec<String> {
        (**self).cut(text)
    }

    fn first_word(&self, text: &str) -> String {
        (**self).first_word(text)
    }

    fn last_word(&self, text: &str) -> String {
        (**self).last_word(text)
    }
}
