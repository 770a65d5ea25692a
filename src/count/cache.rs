//! Per-block memoization for live word counts.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{CounterKind, WordCounter};

#[derive(Debug, Default)]
struct CacheState {
    kind: CounterKind,
    counts: HashMap<usize, usize>,
}

/// Word counter that remembers per-block results.
///
/// Keys are block indices. The cache cannot see edits, so the owner must call
/// [`invalidate`](Self::invalidate) for a changed block, or
/// [`invalidate_from`](Self::invalidate_from) when blocks were split or
/// joined and every later index shifted.
///
/// # Examples
///
/// ```
/// use draftcore::count::{CachedWordCounter, CounterKind, WordCounter};
///
/// let counter = CachedWordCounter::new(CounterKind::Strict);
/// assert_eq!(counter.count_and_cache(0, "two words"), 2);
/// // Stale until invalidated.
/// assert_eq!(counter.count_and_cache(0, "now three words"), 2);
/// counter.invalidate(0);
/// assert_eq!(counter.count_and_cache(0, "now three words"), 3);
/// ```
#[derive(Debug, Default)]
pub struct CachedWordCounter {
    state: Mutex<CacheState>,
}

impl CachedWordCounter {
    /// Create an empty cache over the given strategy.
    #[must_use]
    pub fn new(kind: CounterKind) -> Self {
        Self {
            state: Mutex::new(CacheState {
                kind,
                counts: HashMap::new(),
            }),
        }
    }

    /// Current strategy.
    #[must_use]
    pub fn kind(&self) -> CounterKind {
        self.state().kind
    }

    /// Switch strategy. Cached counts are dropped if the strategy changes.
    pub fn set_kind(&self, kind: CounterKind) {
        let mut state = self.state();
        if state.kind != kind {
            state.kind = kind;
            state.counts.clear();
        }
    }

    /// Forget the count for one block.
    pub fn invalidate(&self, key: usize) {
        self.state().counts.remove(&key);
    }

    /// Forget counts for `key` and every block after it.
    pub fn invalidate_from(&self, key: usize) {
        self.state().counts.retain(|&k, _| k < key);
    }

    /// Forget every count.
    pub fn clear(&self) {
        self.state().counts.clear();
    }

    /// Number of cached blocks.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.state().counts.len()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        // The map is always left consistent, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WordCounter for CachedWordCounter {
    fn count_all(&self, text: &str) -> usize {
        let kind = self.kind();
        kind.count_all(text)
    }

    fn count_and_cache(&self, key: usize, text: &str) -> usize {
        let kind = {
            let state = self.state();
            if let Some(&count) = state.counts.get(&key) {
                return count;
            }
            state.kind
        };
        let count = kind.count_all(text);
        let mut state = self.state();
        if state.kind == kind {
            state.counts.insert(key, count);
        }
        count
    }
}
