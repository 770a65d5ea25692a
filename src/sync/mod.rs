//! Reader/writer synchronization for the open document.
//!
//! - [`SharedAccessLock`]: spinning counter lock, many readers or one writer
//! - [`Shared`]: a value bound to such a lock, with `Deref` guards

mod lock;
mod shared;

pub use lock::{ReadGuard, SharedAccessLock, WriteGuard};
pub use shared::{Shared, SharedMut, SharedRef};
