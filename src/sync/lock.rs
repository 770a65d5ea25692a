//! Spinning reader/writer lock over a single atomic counter.
//!
//! The counter encodes the whole lock state:
//!
//! ```text
//!  0      free
//!  N > 0  N readers hold the lock
//! -1      one writer holds the lock
//! ```
//!
//! Waiting is a busy spin, never an OS block. Critical sections guarded by
//! this lock are short in-memory edits and measurements, so a parked thread
//! would cost more than the spin.
//!
//! # Fairness
//!
//! There is none. A writer only gets in when it observes the counter at
//! exactly zero, so a steady stream of overlapping readers can starve it
//! indefinitely. There is no ticketing or writer preference. This is
//! acceptable for a single-process editor with one render thread and one
//! edit thread; a lock used under real contention needs a queueing design.
//!
//! # Memory ordering
//!
//! Successful acquisition uses `Acquire` and every release uses `Release`
//! on the same counter, so all writes made inside a write section are
//! visible to whoever acquires the lock next.

use std::hint;
use std::sync::atomic::{AtomicIsize, Ordering};

const FREE: isize = 0;
const WRITER: isize = -1;

/// Reader/writer spinlock without fairness guarantees.
///
/// Use [`read_guard`](Self::read_guard) and [`write_guard`](Self::write_guard)
/// rather than pairing `acquire_*`/`release_*` by hand: the guards release on
/// every exit path, including unwinding.
///
/// # Examples
///
/// ```
/// use draftcore::SharedAccessLock;
///
/// let lock = SharedAccessLock::new();
/// {
///     let _a = lock.read_guard();
///     let _b = lock.read_guard();
///     assert!(!lock.try_acquire_write());
/// }
/// let _w = lock.write_guard();
/// assert!(lock.is_write_held());
/// ```
#[derive(Debug, Default)]
pub struct SharedAccessLock {
    state: AtomicIsize,
}

impl SharedAccessLock {
    /// Create an unlocked lock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicIsize::new(FREE),
        }
    }

    /// Try to take a read slot. Fails only while a writer holds the lock.
    pub fn try_acquire_read(&self) -> bool {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            if current < 0 {
                return false;
            }
            match self.state.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Spin until a read slot is taken.
    pub fn acquire_read(&self) {
        while !self.try_acquire_read() {
            hint::spin_loop();
        }
    }

    /// Give back a read slot.
    ///
    /// # Panics
    ///
    /// Panics if no read slot was held. The counter is already corrupted at
    /// that point; this is a caller bug, not a recoverable condition.
    pub fn release_read(&self) {
        let previous = self.state.fetch_sub(1, Ordering::Release);
        assert!(
            previous > 0,
            "release_read without a held read slot (state was {previous})"
        );
    }

    /// Try to take the write side. Succeeds only if the lock is free.
    pub fn try_acquire_write(&self) -> bool {
        self.state
            .compare_exchange(FREE, WRITER, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Spin until the write side is taken.
    pub fn acquire_write(&self) {
        while !self.try_acquire_write() {
            hint::spin_loop();
        }
    }

    /// Release the write side, resetting the counter to free.
    ///
    /// # Panics
    ///
    /// Panics if the write side was not held.
    pub fn release_write(&self) {
        let previous = self.state.swap(FREE, Ordering::Release);
        assert_eq!(
            previous, WRITER,
            "release_write without holding the write lock"
        );
    }

    /// Whether any reader currently holds the lock.
    ///
    /// Snapshot only; may be stale by the time it is used.
    #[must_use]
    pub fn is_read_held(&self) -> bool {
        self.state.load(Ordering::Relaxed) > 0
    }

    /// Whether a writer currently holds the lock.
    ///
    /// Snapshot only; may be stale by the time it is used.
    #[must_use]
    pub fn is_write_held(&self) -> bool {
        self.state.load(Ordering::Relaxed) == WRITER
    }

    /// Number of readers currently holding the lock (snapshot).
    #[must_use]
    pub fn readers(&self) -> usize {
        self.state.load(Ordering::Relaxed).max(0) as usize
    }

    /// Spin for a read slot and return a guard that releases it on drop.
    pub fn read_guard(&self) -> ReadGuard<'_> {
        self.acquire_read();
        ReadGuard { lock: self }
    }

    /// Take a read slot without spinning.
    pub fn try_read_guard(&self) -> Option<ReadGuard<'_>> {
        self.try_acquire_read().then(|| ReadGuard { lock: self })
    }

    /// Spin for the write side and return a guard that releases it on drop.
    pub fn write_guard(&self) -> WriteGuard<'_> {
        self.acquire_write();
        WriteGuard { lock: self }
    }

    /// Take the write side without spinning.
    pub fn try_write_guard(&self) -> Option<WriteGuard<'_>> {
        self.try_acquire_write().then(|| WriteGuard { lock: self })
    }
}

/// Scoped read slot. Released on drop.
#[must_use = "the read slot is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ReadGuard<'a> {
    lock: &'a SharedAccessLock,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.lock.release_read();
    }
}

/// Scoped write access. Released on drop.
#[must_use = "the write lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct WriteGuard<'a> {
    lock: &'a SharedAccessLock,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.lock.release_write();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicI32;
    use std::thread;

    #[test]
    fn test_readers_share() {
        let lock = SharedAccessLock::new();
        assert!(lock.try_acquire_read());
        assert!(lock.try_acquire_read());
        assert_eq!(lock.readers(), 2);
        assert!(lock.is_read_held());
        assert!(!lock.is_write_held());
        lock.release_read();
        lock.release_read();
        assert_eq!(lock.readers(), 0);
    }

    #[test]
    fn test_writer_excludes_readers() {
        let lock = SharedAccessLock::new();
        assert!(lock.try_acquire_write());
        assert!(!lock.try_acquire_read());
        assert!(!lock.try_acquire_write());
        lock.release_write();
        assert!(lock.try_acquire_read());
        lock.release_read();
    }

    #[test]
    fn test_readers_exclude_writer() {
        let lock = SharedAccessLock::new();
        lock.acquire_read();
        assert!(!lock.try_acquire_write());
        lock.release_read();
        assert!(lock.try_acquire_write());
        lock.release_write();
    }

    #[test]
    fn test_guards_release_on_drop() {
        let lock = SharedAccessLock::new();
        {
            let _r = lock.read_guard();
            assert!(lock.try_write_guard().is_none());
        }
        {
            let _w = lock.write_guard();
            assert!(lock.try_read_guard().is_none());
        }
        assert!(!lock.is_read_held());
        assert!(!lock.is_write_held());
    }

    #[test]
    fn test_guard_released_on_early_return() {
        fn bail(lock: &SharedAccessLock, early: bool) -> Option<()> {
            let _w = lock.write_guard();
            if early {
                return None;
            }
            Some(())
        }
        let lock = SharedAccessLock::new();
        assert!(bail(&lock, true).is_none());
        assert!(bail(&lock, false).is_some());
        assert!(lock.try_acquire_write());
        lock.release_write();
    }

    #[test]
    fn test_guard_released_on_unwind() {
        let lock = Arc::new(SharedAccessLock::new());
        let inner = Arc::clone(&lock);
        let result = thread::spawn(move || {
            let _w = inner.write_guard();
            panic!("edit failed");
        })
        .join();
        assert!(result.is_err());
        assert!(!lock.is_write_held());
        assert!(lock.try_acquire_read());
        lock.release_read();
    }

    #[test]
    #[should_panic(expected = "release_read")]
    fn test_unbalanced_release_read_panics() {
        let lock = SharedAccessLock::new();
        lock.release_read();
    }

    #[test]
    #[should_panic(expected = "release_write")]
    fn test_unbalanced_release_write_panics() {
        let lock = SharedAccessLock::new();
        lock.release_write();
    }

    #[test]
    fn test_mutual_exclusion_under_contention() {
        let lock = Arc::new(SharedAccessLock::new());
        let writers_inside = Arc::new(AtomicI32::new(0));
        let readers_inside = Arc::new(AtomicI32::new(0));
        let mut handles = Vec::new();

        for id in 0..8 {
            let lock = Arc::clone(&lock);
            let writers_inside = Arc::clone(&writers_inside);
            let readers_inside = Arc::clone(&readers_inside);
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    if id % 2 == 0 {
                        let _w = lock.write_guard();
                        let w = writers_inside.fetch_add(1, Ordering::SeqCst) + 1;
                        assert_eq!(w, 1, "two writers inside");
                        assert_eq!(readers_inside.load(Ordering::SeqCst), 0);
                        writers_inside.fetch_sub(1, Ordering::SeqCst);
                    } else {
                        let _r = lock.read_guard();
                        readers_inside.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(writers_inside.load(Ordering::SeqCst), 0);
                        let r = readers_inside.fetch_sub(1, Ordering::SeqCst) - 1;
                        assert!(r >= 0);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert!(!lock.is_read_held());
        assert!(!lock.is_write_held());
    }
}
