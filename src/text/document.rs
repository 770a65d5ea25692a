//! Rope-backed block document.
//!
//! A block is one line of the rope without its terminating `\n`. Locations
//! are `block:offset` pairs with the offset counted in characters.
//!
//! `\n` is the only block terminator. A `\r` (including the one of a CRLF
//! pair) and Unicode line separators stay block content, so inserting or
//! deleting text can never merge or split blocks anywhere except at the
//! `\n` characters it adds or removes. Undo relies on this: a location
//! recorded before an edit addresses the same text after it.

use std::fmt;

use ropey::{Rope, RopeSlice};

use crate::error::{Error, Result};

/// Position in a [`Document`]: block index plus character offset in the block.
///
/// Ordered by block, then offset, which is document order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextLoc {
    /// Block (line) index, 0-based.
    pub block: usize,
    /// Character offset within the block, 0-based.
    pub offset: usize,
}

impl TextLoc {
    /// Create a location.
    #[must_use]
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    /// Start of the document.
    #[must_use]
    pub const fn start() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for TextLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

/// Text document stored as a rope and addressed by [`TextLoc`].
///
/// # Examples
///
/// ```
/// use draftcore::{Document, TextLoc};
///
/// let mut doc = Document::with_text("first\nsecond");
/// let end = doc.insert(TextLoc::new(1, 6), " line").unwrap();
/// assert_eq!(end, TextLoc::new(1, 11));
/// assert_eq!(doc.block(1).as_deref(), Some("second line"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Document {
    rope: Rope,
}

impl Document {
    /// Create an empty document with one empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Full text.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total characters, line terminators included.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whether the document has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Number of blocks. Never zero.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Block text without its terminator.
    #[must_use]
    pub fn block(&self, idx: usize) -> Option<String> {
        self.block_slice(idx).map(|s| s.to_string())
    }

    /// Block length in characters, terminator excluded.
    #[must_use]
    pub fn block_len(&self, idx: usize) -> Option<usize> {
        self.block_slice(idx).map(|s| s.len_chars())
    }

    /// Iterate over all block texts.
    pub fn blocks(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.block_count()).filter_map(|idx| self.block(idx))
    }

    /// Location of the end of the document.
    #[must_use]
    pub fn end(&self) -> TextLoc {
        let block = self.block_count() - 1;
        TextLoc::new(block, self.block_len(block).unwrap_or(0))
    }

    /// Convert a location to an absolute character index.
    pub fn loc_to_char(&self, loc: TextLoc) -> Result<usize> {
        match self.block_len(loc.block) {
            Some(len) if loc.offset <= len => Ok(self.rope.line_to_char(loc.block) + loc.offset),
            block_len => Err(Error::OutOfBounds {
                block: loc.block,
                offset: loc.offset,
                blocks: self.block_count(),
                block_len: block_len.unwrap_or(0),
            }),
        }
    }

    /// Convert an absolute character index to a location, clamping to the end.
    #[must_use]
    pub fn char_to_loc(&self, char_idx: usize) -> TextLoc {
        let char_idx = char_idx.min(self.len_chars());
        let block = self.rope.char_to_line(char_idx);
        let offset = char_idx - self.rope.line_to_char(block);
        let len = self.block_len(block).unwrap_or(0);
        TextLoc::new(block, offset.min(len))
    }

    /// Insert text at a location. Line breaks in `text` split the block.
    ///
    /// Returns the location just past the inserted text.
    pub fn insert(&mut self, loc: TextLoc, text: &str) -> Result<TextLoc> {
        let start = self.loc_to_char(loc)?;
        self.rope.insert(start, text);
        Ok(self.char_to_loc(start + text.chars().count()))
    }

    /// Delete `len` characters forward from a location, joining blocks when a
    /// terminator is removed.
    ///
    /// Returns the removed text.
    pub fn delete(&mut self, loc: TextLoc, len: usize) -> Result<String> {
        let start = self.loc_to_char(loc)?;
        let Some(end) = start.checked_add(len).filter(|&end| end <= self.len_chars()) else {
            let last = self.end();
            return Err(Error::OutOfBounds {
                block: last.block,
                offset: last.offset.saturating_add(len - (self.len_chars() - start)),
                blocks: self.block_count(),
                block_len: last.offset,
            });
        };
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        Ok(removed)
    }

    /// Delete exactly `expected` at a location.
    ///
    /// Fails without touching the document if the text there differs.
    pub fn delete_text(&mut self, loc: TextLoc, expected: &str) -> Result<()> {
        let start = self.loc_to_char(loc)?;
        let end = (start + expected.chars().count()).min(self.len_chars());
        let found = self.rope.slice(start..end);
        if found != expected {
            return Err(Error::TextMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        self.rope.remove(start..end);
        Ok(())
    }

    /// Text of a block up to (excluding) the given offset.
    pub(crate) fn block_prefix(&self, loc: TextLoc) -> Result<String> {
        self.loc_to_char(loc)?;
        Ok(self
            .block_slice(loc.block)
            .map(|s| s.slice(..loc.offset).to_string())
            .unwrap_or_default())
    }

    /// Text of a block from the given offset to its end.
    pub(crate) fn block_suffix(&self, loc: TextLoc) -> Result<String> {
        self.loc_to_char(loc)?;
        Ok(self
            .block_slice(loc.block)
            .map(|s| s.slice(loc.offset..).to_string())
            .unwrap_or_default())
    }

    fn block_slice(&self, idx: usize) -> Option<RopeSlice<'_>> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(idx);
        let len = line.len_chars();
        Some(line.slice(..len - terminator_len(line)))
    }
}

/// Number of trailing characters that make up the block terminator.
fn terminator_len(line: RopeSlice<'_>) -> usize {
    match line.len_chars().checked_sub(1).map(|i| line.char(i)) {
        Some('\n') => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_one_block() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.block(0).as_deref(), Some(""));
        assert_eq!(doc.end(), TextLoc::start());
    }

    #[test]
    fn test_blocks_exclude_terminators() {
        let doc = Document::with_text("one\ntwo\nthree");
        assert_eq!(doc.block_count(), 3);
        assert_eq!(doc.blocks().collect::<Vec<_>>(), ["one", "two", "three"]);
        assert_eq!(doc.block_len(0), Some(3));
        assert_eq!(doc.block(3), None);
    }

    #[test]
    fn test_only_line_feed_ends_a_block() {
        let doc = Document::with_text("one\r\ntwo\rthree\u{2028}four");
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.block(0).as_deref(), Some("one\r"));
        assert_eq!(doc.block(1).as_deref(), Some("two\rthree\u{2028}four"));
        assert_eq!(doc.loc_to_char(TextLoc::new(0, 4)).unwrap(), 4);
    }

    #[test]
    fn test_completing_crlf_keeps_block_layout() {
        let mut doc = Document::with_text("a\rb");
        assert_eq!(doc.block_count(), 1);
        let end = doc.insert(TextLoc::new(0, 2), "\n").unwrap();
        assert_eq!(end, TextLoc::new(1, 0));
        assert_eq!(doc.block(0).as_deref(), Some("a\r"));

        doc.delete_text(TextLoc::new(0, 2), "\n").unwrap();
        assert_eq!(doc.text(), "a\rb");
    }

    #[test]
    fn test_loc_char_conversion() {
        let doc = Document::with_text("ab\ncde");
        assert_eq!(doc.loc_to_char(TextLoc::new(1, 2)).unwrap(), 5);
        assert_eq!(doc.char_to_loc(5), TextLoc::new(1, 2));
        assert_eq!(doc.char_to_loc(2), TextLoc::new(0, 2));
        assert_eq!(doc.char_to_loc(100), TextLoc::new(1, 3));
        assert!(matches!(
            doc.loc_to_char(TextLoc::new(0, 3)),
            Err(Error::OutOfBounds { block: 0, offset: 3, .. })
        ));
        assert!(doc.loc_to_char(TextLoc::new(2, 0)).is_err());
    }

    #[test]
    fn test_insert_returns_end_location() {
        let mut doc = Document::with_text("hello");
        let end = doc.insert(TextLoc::new(0, 5), " world").unwrap();
        assert_eq!(end, TextLoc::new(0, 11));
        assert_eq!(doc.text(), "hello world");
    }

    #[test]
    fn test_multiline_insert_splits_block() {
        let mut doc = Document::with_text("headtail");
        let end = doc.insert(TextLoc::new(0, 4), "\nmid\n").unwrap();
        assert_eq!(end, TextLoc::new(2, 0));
        assert_eq!(doc.blocks().collect::<Vec<_>>(), ["head", "mid", "tail"]);
    }

    #[test]
    fn test_delete_joins_blocks() {
        let mut doc = Document::with_text("ab\ncd");
        let removed = doc.delete(TextLoc::new(0, 1), 3).unwrap();
        assert_eq!(removed, "b\nc");
        assert_eq!(doc.text(), "ad");
        assert_eq!(doc.block_count(), 1);
    }

    #[test]
    fn test_delete_past_end_fails() {
        let mut doc = Document::with_text("abc");
        assert!(doc.delete(TextLoc::new(0, 2), 5).is_err());
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn test_delete_huge_length_fails_without_overflow() {
        let mut doc = Document::with_text("abc\nd");
        let err = doc.delete(TextLoc::new(0, 1), usize::MAX).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { block: 1, block_len: 1, .. }));
        assert_eq!(doc.text(), "abc\nd");
    }

    #[test]
    fn test_delete_text_checks_content() {
        let mut doc = Document::with_text("你好世界");
        let err = doc.delete_text(TextLoc::new(0, 0), "世界").unwrap_err();
        assert!(matches!(err, Error::TextMismatch { .. }));
        assert_eq!(doc.text(), "你好世界");

        doc.delete_text(TextLoc::new(0, 2), "世界").unwrap();
        assert_eq!(doc.text(), "你好");
    }

    #[test]
    fn test_block_prefix_suffix() {
        let doc = Document::with_text("x\nhello world");
        let loc = TextLoc::new(1, 5);
        assert_eq!(doc.block_prefix(loc).unwrap(), "hello");
        assert_eq!(doc.block_suffix(loc).unwrap(), " world");
    }

    #[test]
    fn test_loc_ordering() {
        assert!(TextLoc::new(0, 9) < TextLoc::new(1, 0));
        assert!(TextLoc::new(2, 1) < TextLoc::new(2, 3));
        assert_eq!(TextLoc::new(4, 2).to_string(), "4:2");
    }
}
