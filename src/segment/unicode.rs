//! UAX #29 word boundaries.

use unicode_segmentation::UnicodeSegmentation;

use super::Segmenter;

/// Segmenter based on Unicode word boundaries alone.
///
/// Needs no data, so it is always available. Latin words come out whole;
/// CJK text comes out one ideograph at a time, which is the accepted
/// degraded behavior when no dictionary could be loaded.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeSegmenter;

impl UnicodeSegmenter {
    /// Create a segmenter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for UnicodeSegmenter {
    fn cut(&self, text: &str) -> Vec<String> {
        text.split_word_bounds().map(str::to_string).collect()
    }
}
