//! Word counting for the statistics display.
//!
//! Two strategies share the [`WordCounter`] contract:
//!
//! - [`LooseWordCounter`]: every non-whitespace character is a unit
//! - [`StrictWordCounter`]: words, CJK characters and numbers are units
//!
//! Counters hold no shared state and never lock; callers pass text already
//! read under the document's read side. [`CachedWordCounter`] adds per-block
//! memoization on top of either strategy.
//!
//! # Examples
//!
//! ```
//! use draftcore::count::{CounterKind, WordCounter};
//!
//! assert_eq!(CounterKind::Strict.count_all("hello 世界"), 3);
//! assert_eq!(CounterKind::Loose.count_all("hello 世界"), 7);
//! ```

mod cache;
mod loose;
mod strict;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub use cache::CachedWordCounter;
pub use loose::LooseWordCounter;
pub use strict::{CharClass, StrictWordCounter};

/// Counts units in a piece of text.
pub trait WordCounter {
    /// Count every unit in `text`.
    fn count_all(&self, text: &str) -> usize;

    /// Count `text`, allowing the implementation to memoize under `key`.
    ///
    /// `key` identifies the text's source (a block index); the default does
    /// no caching.
    fn count_and_cache(&self, key: usize, text: &str) -> usize {
        let _ = key;
        self.count_all(text)
    }
}

impl<C: WordCounter + ?Sized> WordCounter for &C {
    fn count_all(&self, text: &str) -> usize {
        (**self).count_all(text)
    }

    fn count_and_cache(&self, key: usize, text: &str) -> usize {
        (**self).count_and_cache(key, text)
    }
}

/// Counting strategy selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CounterKind {
    /// Non-whitespace characters.
    Loose,
    /// Linguistic units.
    #[default]
    Strict,
}

impl CounterKind {
    /// Configuration name of the strategy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::Strict => "strict",
        }
    }
}

impl WordCounter for CounterKind {
    fn count_all(&self, text: &str) -> usize {
        match self {
            Self::Loose => LooseWordCounter.count_all(text),
            Self::Strict => StrictWordCounter.count_all(text),
        }
    }
}

impl FromStr for CounterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Ok(Self::Loose),
            "strict" => Ok(Self::Strict),
            other => Err(Error::InvalidOption(format!(
                "unknown word counter {other:?} (expected \"loose\" or \"strict\")"
            ))),
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
