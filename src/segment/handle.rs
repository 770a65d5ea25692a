//! Background construction of a segmenter.
//!
//! Loading a dictionary takes long enough to stall an interactive thread, so
//! [`SegmenterHandle::build`] loads it on a worker thread and returns at once.
//!
//! ```text
//! caller                       worker "draftcore-segmenter"
//! ------                       ----------------------------
//! build(path)  ─── spawn ───▶  load word list
//! ... keeps editing ...        publish Ready
//! get()        ◀── join ────   (first caller waits if still loading)
//! get()        (free from now on)
//! ```
//!
//! A build that fails resolves to [`UnicodeSegmenter`] and the handle reports
//! itself as degraded; word-wise commands keep working with coarser
//! boundaries instead of failing.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::{self, JoinHandle};

use super::{DictionarySegmenter, Segmenter, UnicodeSegmenter};
use crate::error::Result;
use crate::event::{LogLevel, emit_event, emit_log};

const WORKER_NAME: &str = "draftcore-segmenter";

struct Ready {
    segmenter: Arc<dyn Segmenter>,
    degraded: bool,
}

impl Ready {
    fn fallback() -> Self {
        Self {
            segmenter: Arc::new(UnicodeSegmenter),
            degraded: true,
        }
    }
}

struct Inner {
    ready: OnceLock<Ready>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn publish(&self, ready: Ready) {
        let source = if ready.degraded { "fallback" } else { "dictionary" };
        if self.ready.set(ready).is_ok() {
            emit_event("segmenter.ready", source);
        }
    }
}

/// Shared handle to a segmenter that may still be building.
///
/// Cheap to clone; all clones observe the same build. The handle itself
/// implements [`Segmenter`], blocking on first use if needed.
///
/// # Examples
///
/// ```
/// use draftcore::segment::{DictionarySegmenter, Segmenter, SegmenterHandle};
///
/// let handle = SegmenterHandle::build_with(|| DictionarySegmenter::from_words(["小说"]));
/// // Blocks only if the worker has not finished yet.
/// assert_eq!(handle.get().last_word("写小说"), "小说");
/// assert!(!handle.is_degraded());
/// ```
#[derive(Clone)]
pub struct SegmenterHandle {
    inner: Arc<Inner>,
}

impl SegmenterHandle {
    /// Load a word list from `path` on a background thread.
    #[must_use]
    pub fn build(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::build_with(move || DictionarySegmenter::load(&path))
    }

    /// Run an arbitrary builder on a background thread.
    #[must_use]
    pub fn build_with<S, F>(builder: F) -> Self
    where
        S: Segmenter + 'static,
        F: FnOnce() -> Result<S> + Send + 'static,
    {
        let inner = Arc::new(Inner {
            ready: OnceLock::new(),
            worker: Mutex::new(None),
        });

        let shared = Arc::clone(&inner);
        let spawned = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let ready = match builder() {
                    Ok(segmenter) => {
                        emit_log(LogLevel::Info, "segmenter built");
                        Ready {
                            segmenter: Arc::new(segmenter),
                            degraded: false,
                        }
                    }
                    Err(e) => {
                        emit_log(
                            LogLevel::Warn,
                            &format!("segmenter build failed, using word boundaries: {e}"),
                        );
                        Ready::fallback()
                    }
                };
                shared.publish(ready);
            });

        match spawned {
            Ok(worker) => {
                *inner.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(worker);
            }
            Err(e) => {
                emit_log(
                    LogLevel::Warn,
                    &format!("could not spawn {WORKER_NAME}, using word boundaries: {e}"),
                );
                inner.publish(Ready::fallback());
            }
        }

        Self { inner }
    }

    /// Wrap an already built segmenter.
    #[must_use]
    pub fn ready(segmenter: Arc<dyn Segmenter>) -> Self {
        let inner = Arc::new(Inner {
            ready: OnceLock::new(),
            worker: Mutex::new(None),
        });
        inner.publish(Ready {
            segmenter,
            degraded: false,
        });
        Self { inner }
    }

    /// Handle over [`UnicodeSegmenter`], for sessions without a dictionary.
    #[must_use]
    pub fn unicode() -> Self {
        Self::ready(Arc::new(UnicodeSegmenter))
    }

    /// The segmenter, waiting for the build to finish if necessary.
    pub fn get(&self) -> Arc<dyn Segmenter> {
        Arc::clone(&self.resolve().segmenter)
    }

    /// The segmenter if the build has finished; never waits.
    #[must_use]
    pub fn try_get(&self) -> Option<Arc<dyn Segmenter>> {
        self.inner.ready.get().map(|r| Arc::clone(&r.segmenter))
    }

    /// Whether the build has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.ready.get().is_some()
    }

    /// Whether the build failed and the fallback is in use.
    ///
    /// Waits for the build to finish.
    pub fn is_degraded(&self) -> bool {
        self.resolve().degraded
    }

    fn resolve(&self) -> &Ready {
        if let Some(ready) = self.inner.ready.get() {
            return ready;
        }
        // Holding the lock while joining makes concurrent first callers queue
        // behind the one that is joining.
        let mut worker = self
            .inner
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                emit_log(
                    LogLevel::Error,
                    "segmenter worker panicked, using word boundaries",
                );
            }
        }
        drop(worker);

        let mut fell_back = false;
        let ready = self.inner.ready.get_or_init(|| {
            fell_back = true;
            Ready::fallback()
        });
        if fell_back {
            emit_event("segmenter.ready", "fallback");
        }
        ready
    }
}

impl Segmenter for SegmenterHandle {
    fn cut(&self, text: &str) -> Vec<String> {
        self.get().cut(text)
    }

    fn first_word(&self, text: &str) -> String {
        self.get().first_word(text)
    }

    fn last_word(&self, text: &str) -> String {
        self.get().last_word(text)
    }
}

impl Default for SegmenterHandle {
    fn default() -> Self {
        Self::unicode()
    }
}

impl fmt::Debug for SegmenterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner.ready.get() {
            None => "building",
            Some(r) if r.degraded => "degraded",
            Some(_) => "ready",
        };
        f.debug_struct("SegmenterHandle")
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_ready_handle_never_waits() {
        let handle = SegmenterHandle::unicode();
        assert!(handle.is_ready());
        assert!(handle.try_get().is_some());
        assert!(!handle.is_degraded());
        assert_eq!(format!("{handle:?}"), "SegmenterHandle { state: \"ready\" }");
    }

    #[test]
    fn test_get_waits_for_build() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let handle = SegmenterHandle::build_with(move || {
            release_rx
                .recv_timeout(Duration::from_secs(10))
                .map_err(|_| Error::EmptyDictionary)?;
            DictionarySegmenter::from_words(["写作"])
        });

        assert!(handle.try_get().is_none());
        assert!(format!("{handle:?}").contains("building"));

        release_tx.send(()).expect("worker alive");
        assert_eq!(handle.get().cut("写作"), ["写作"]);
        assert!(handle.is_ready());
        assert!(!handle.is_degraded());
    }

    #[test]
    fn test_failed_build_degrades() {
        let handle = SegmenterHandle::build_with(|| {
            Err::<DictionarySegmenter, _>(Error::EmptyDictionary)
        });
        assert!(handle.is_degraded());
        assert_eq!(handle.cut("中文"), ["中", "文"]);
    }

    #[test]
    fn test_missing_dictionary_degrades() {
        let handle = SegmenterHandle::build("/nonexistent/draftcore/dict.txt");
        assert!(handle.is_degraded());
        assert_eq!(handle.last_word("hello world"), "world");
    }

    #[test]
    fn test_panicking_builder_degrades() {
        let handle = SegmenterHandle::build_with(|| -> Result<UnicodeSegmenter> {
            panic!("dictionary corrupt")
        });
        assert!(handle.is_degraded());
    }

    #[test]
    fn test_clones_share_build() {
        let handle = SegmenterHandle::build_with(|| DictionarySegmenter::from_words(["小说"]));
        let other = handle.clone();
        let a = handle.get();
        let b = other.get();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_first_use() {
        let handle = SegmenterHandle::build_with(|| {
            thread::sleep(Duration::from_millis(20));
            DictionarySegmenter::from_words(["中文"])
        });
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || handle.first_word("中文字"))
            })
            .collect();
        for worker in workers {
            assert_eq!(worker.join().expect("reader panicked"), "中文");
        }
    }
}
