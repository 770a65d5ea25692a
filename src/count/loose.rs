//! Character-based counting: every non-whitespace character is one unit.

use super::WordCounter;

/// Counts non-whitespace characters.
///
/// Cheap and stateless; CJK prose comes out the same as with
/// [`StrictWordCounter`](super::StrictWordCounter), Latin prose counts letters
/// rather than words.
#[derive(Clone, Copy, Debug, Default)]
pub struct LooseWordCounter;

impl LooseWordCounter {
    /// Create a counter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WordCounter for LooseWordCounter {
    fn count_all(&self, text: &str) -> usize {
        text.chars().filter(|ch| !ch.is_whitespace()).count()
    }
}
