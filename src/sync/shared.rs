//! A value guarded by a [`SharedAccessLock`].
//!
//! [`SharedAccessLock`] only manages the counter. `Shared<T>` pairs it with
//! the data so that a `&T` can only be obtained under a read slot and a
//! `&mut T` only under the write side.

// UnsafeCell access is gated by the lock counter; see the SAFETY notes below.
#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};

use super::lock::{ReadGuard, SharedAccessLock, WriteGuard};

/// Value shared between render (read) and edit (write) threads.
///
/// # Examples
///
/// ```
/// use draftcore::sync::Shared;
///
/// let shared = Shared::new(String::from("draft"));
/// shared.write().push_str(" two");
/// assert_eq!(&*shared.read(), "draft two");
/// ```
pub struct Shared<T> {
    lock: SharedAccessLock,
    value: UnsafeCell<T>,
}

// SAFETY: the lock hands out either any number of `&T` or exactly one
// `&mut T`, never both, which is the same contract as `std::sync::RwLock`.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send + Sync> Sync for Shared<T> {}

impl<T> Shared<T> {
    /// Wrap a value.
    pub const fn new(value: T) -> Self {
        Self {
            lock: SharedAccessLock::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Spin for a read slot.
    pub fn read(&self) -> SharedRef<'_, T> {
        let guard = self.lock.read_guard();
        // SAFETY: a read slot is held for the lifetime of the returned guard,
        // so no `&mut T` can exist concurrently.
        let value = unsafe { &*self.value.get() };
        SharedRef {
            value,
            _guard: guard,
        }
    }

    /// Take a read slot if no writer holds the lock.
    pub fn try_read(&self) -> Option<SharedRef<'_, T>> {
        let guard = self.lock.try_read_guard()?;
        // SAFETY: as in `read`.
        let value = unsafe { &*self.value.get() };
        Some(SharedRef {
            value,
            _guard: guard,
        })
    }

    /// Spin for exclusive access.
    pub fn write(&self) -> SharedMut<'_, T> {
        let guard = self.lock.write_guard();
        // SAFETY: the write side is held for the lifetime of the returned
        // guard, so this is the only reference to the value.
        let value = unsafe { &mut *self.value.get() };
        SharedMut {
            value,
            _guard: guard,
        }
    }

    /// Take exclusive access if the lock is free.
    pub fn try_write(&self) -> Option<SharedMut<'_, T>> {
        let guard = self.lock.try_write_guard()?;
        // SAFETY: as in `write`.
        let value = unsafe { &mut *self.value.get() };
        Some(SharedMut {
            value,
            _guard: guard,
        })
    }

    /// Mutable access through a unique borrow; no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Unwrap the value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// The underlying lock, for diagnostics.
    #[must_use]
    pub fn lock(&self) -> &SharedAccessLock {
        &self.lock
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_read() {
            Some(value) => f.debug_struct("Shared").field("value", &*value).finish(),
            None => f.debug_struct("Shared").field("value", &"<locked>").finish(),
        }
    }
}

/// Shared borrow held under a read slot.
pub struct SharedRef<'a, T> {
    value: &'a T,
    _guard: ReadGuard<'a>,
}

impl<T> Deref for SharedRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

/// Exclusive borrow held under the write side.
pub struct SharedMut<'a, T> {
    value: &'a mut T,
    _guard: WriteGuard<'a>,
}

impl<T> Deref for SharedMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T> DerefMut for SharedMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value
    }
}
