//! Dictionary-driven segmentation.
//!
//! Runs of Han, Hiragana and Katakana characters are split by forward
//! maximum matching against a word list: at each position the longest
//! dictionary word wins, falling back to a single character. Everything
//! else is split on UAX #29 word boundaries.
//!
//! # Word list format
//!
//! One entry per line. The first whitespace-separated field is the word;
//! an optional second field is an integer frequency, and anything after it
//! (such as a part-of-speech tag) is ignored. Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! # word  freq  tag
//! 中文    1200  nz
//! 写作    800
//! 小说
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use unicode_normalization::{UnicodeNormalization, is_nfc};
use unicode_script::{Script, UnicodeScript};
use unicode_segmentation::UnicodeSegmentation;

use super::Segmenter;
use crate::error::{Error, Result};

/// Segmenter backed by an in-memory word list.
///
/// # Examples
///
/// ```
/// use draftcore::segment::{DictionarySegmenter, Segmenter};
///
/// let seg = DictionarySegmenter::from_words(["写作", "小说"]).unwrap();
/// assert_eq!(seg.cut("写作小说"), ["写作", "小说"]);
/// assert_eq!(seg.last_word("我的小说"), "小说");
/// ```
#[derive(Clone, Debug)]
pub struct DictionarySegmenter {
    words: HashSet<String>,
    /// Longest entry, in characters.
    max_len: usize,
}

impl DictionarySegmenter {
    /// Build from a list of words. Entries are NFC-normalized.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().nfc().collect::<String>())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(Error::EmptyDictionary);
        }
        let max_len = words.iter().map(|w| w.chars().count()).max().unwrap_or(1);
        Ok(Self { words, max_len })
    }

    /// Parse a word list (see the module docs for the format).
    pub fn parse(source: &str) -> Result<Self> {
        let mut words = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            if let Some(freq) = fields.next() {
                if freq.parse::<u64>().is_err() {
                    return Err(Error::Dictionary {
                        line: idx + 1,
                        reason: format!("frequency {freq:?} is not an integer"),
                    });
                }
            }
            words.push(word);
        }
        Self::from_words(words)
    }

    /// Load a word list from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Number of dictionary entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary is empty. Never true for a built segmenter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `word` is a dictionary entry.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        if is_nfc(word) {
            self.words.contains(word)
        } else {
            self.words.contains(&word.nfc().collect::<String>())
        }
    }

    /// Forward maximum matching over one CJK run.
    fn cut_run<'a>(&self, run: &'a str, out: &mut Vec<&'a str>) {
        let bounds: Vec<usize> = run
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(run.len()))
            .collect();
        let chars = bounds.len() - 1;

        let mut i = 0;
        while i < chars {
            let longest = self.max_len.min(chars - i);
            let take = (2..=longest)
                .rev()
                .find(|&n| self.contains(&run[bounds[i]..bounds[i + n]]))
                .unwrap_or(1);
            out.push(&run[bounds[i]..bounds[i + take]]);
            i += take;
        }
    }
}

impl Segmenter for DictionarySegmenter {
    fn cut(&self, text: &str) -> Vec<String> {
        let mut pieces: Vec<&str> = Vec::new();
        // Byte range of the pending CJK run.
        let mut run: Option<(usize, usize)> = None;

        for (start, piece) in text.split_word_bound_indices() {
            if piece.chars().all(is_cjk) {
                let end = start + piece.len();
                run = Some(run.map_or((start, end), |(s, _)| (s, end)));
                continue;
            }
            if let Some((s, e)) = run.take() {
                self.cut_run(&text[s..e], &mut pieces);
            }
            pieces.push(piece);
        }
        if let Some((s, e)) = run {
            self.cut_run(&text[s..e], &mut pieces);
        }

        pieces.into_iter().map(str::to_string).collect()
    }
}

fn is_cjk(ch: char) -> bool {
    matches!(ch.script(), Script::Han | Script::Hiragana | Script::Katakana)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> DictionarySegmenter {
        DictionarySegmenter::from_words(["中文", "中文分词", "分词", "写作", "小说", "写"]).unwrap()
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(segmenter().cut("中文分词"), ["中文分词"]);
        assert_eq!(segmenter().cut("中文写作"), ["中文", "写作"]);
    }

    #[test]
    fn test_unknown_characters_stand_alone() {
        assert_eq!(segmenter().cut("我写小说"), ["我", "写", "小说"]);
    }

    #[test]
    fn test_mixed_text_is_lossless() {
        let text = "用Rust写作，1.5倍 speed!";
        let pieces = segmenter().cut(text);
        assert_eq!(pieces.concat(), text);
        assert!(pieces.contains(&"Rust".to_string()));
        assert!(pieces.contains(&"写作".to_string()));
        assert!(pieces.contains(&"1.5".to_string()));
    }

    #[test]
    fn test_edge_words() {
        let seg = segmenter();
        assert_eq!(seg.last_word("今天开始写小说"), "小说");
        assert_eq!(seg.first_word("中文分词很难"), "中文分词");
        assert_eq!(seg.last_word(""), "");
    }

    #[test]
    fn test_parse_word_list() {
        let seg = DictionarySegmenter::parse("# comment\n\n中文 120 nz\n写作\t3\n小说\n").unwrap();
        assert_eq!(seg.len(), 3);
        assert!(seg.contains("写作"));
        assert!(!seg.contains("comment"));
    }

    #[test]
    fn test_parse_rejects_bad_frequency() {
        let err = DictionarySegmenter::parse("中文 lots\n").unwrap_err();
        assert!(matches!(err, Error::Dictionary { line: 1, .. }));
    }

    #[test]
    fn test_empty_dictionary() {
        assert!(matches!(
            DictionarySegmenter::parse("# nothing\n"),
            Err(Error::EmptyDictionary)
        ));
        assert!(matches!(
            DictionarySegmenter::from_words(Vec::<String>::new()),
            Err(Error::EmptyDictionary)
        ));
    }

    #[test]
    fn test_lookup_is_normalization_insensitive() {
        // "café" stored precomposed, queried decomposed.
        let seg = DictionarySegmenter::from_words(["caf\u{e9}"]).unwrap();
        assert!(seg.contains("cafe\u{301}"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = DictionarySegmenter::load("/nonexistent/draftcore/words.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
