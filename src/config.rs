//! Session configuration.

use std::path::PathBuf;

use crate::count::CounterKind;
use crate::error::{Error, Result};
use crate::text::DEFAULT_HISTORY_CAPACITY;

/// Options for an [`EditSession`](crate::EditSession).
///
/// # Examples
///
/// ```
/// use draftcore::{CounterKind, SessionOptions};
///
/// let mut options = SessionOptions::default().with_history_capacity(64);
/// options.set("counter", "loose").unwrap();
/// assert_eq!(options.counter, CounterKind::Loose);
/// assert_eq!(options.history_capacity, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    /// Maximum number of undo records kept.
    pub history_capacity: usize,
    /// Word counting strategy for the statistics display.
    pub counter: CounterKind,
    /// Word list for the segmenter; `None` uses Unicode word boundaries.
    pub dictionary: Option<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            counter: CounterKind::Strict,
            dictionary: None,
        }
    }
}

impl SessionOptions {
    /// Set the history capacity.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the counting strategy.
    #[must_use]
    pub fn with_counter(mut self, counter: CounterKind) -> Self {
        self.counter = counter;
        self
    }

    /// Set the segmenter word list.
    #[must_use]
    pub fn with_dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary = Some(path.into());
        self
    }

    /// Apply one `key = value` setting, as read from a settings file.
    ///
    /// Keys: `history_capacity`, `counter`, `dictionary` (empty value clears).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim() {
            "history_capacity" => {
                self.history_capacity = value.parse().map_err(|_| {
                    Error::InvalidOption(format!("history_capacity {value:?} is not a count"))
                })?;
            }
            "counter" => self.counter = value.parse()?,
            "dictionary" => {
                self.dictionary = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => return Err(Error::InvalidOption(format!("unknown key {other:?}"))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SessionOptions::default();
        assert_eq!(options.history_capacity, 256);
        assert_eq!(options.counter, CounterKind::Strict);
        assert!(options.dictionary.is_none());
    }

    #[test]
    fn test_builders() {
        let options = SessionOptions::default()
            .with_history_capacity(8)
            .with_counter(CounterKind::Loose)
            .with_dictionary("dicts/words.txt");
        assert_eq!(options.history_capacity, 8);
        assert_eq!(options.counter, CounterKind::Loose);
        assert_eq!(options.dictionary, Some(PathBuf::from("dicts/words.txt")));
    }

    #[test]
    fn test_set() {
        let mut options = SessionOptions::default();
        options.set("history_capacity", " 12 ").unwrap();
        options.set("counter", "Loose").unwrap();
        options.set("dictionary", "words.txt").unwrap();
        assert_eq!(options.history_capacity, 12);
        assert_eq!(options.counter, CounterKind::Loose);
        assert!(options.dictionary.is_some());

        options.set("dictionary", "").unwrap();
        assert!(options.dictionary.is_none());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut options = SessionOptions::default();
        assert!(matches!(
            options.set("history_capacity", "-1"),
            Err(Error::InvalidOption(_))
        ));
        assert!(options.set("counter", "fast").is_err());
        assert!(options.set("theme", "dark").is_err());
        assert_eq!(options, SessionOptions::default());
    }
}
