//! Mutex poison recovery.
//!
//! The crate's shared state is a parse cache, proxy registry entries, and
//! output sinks. None of it can be left logically inconsistent by a panic in
//! another thread: a stale cache entry is still a valid parse, and a sink
//! that saw half a line still accepts the next one. So every lock in the
//! crate recovers from poison instead of propagating it.
//!
//! | Scenario | Function |
//! |----------|----------|
//! | Production code | [`lock_recover`] |
//! | Test code | `.lock().unwrap()` |

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering from poison if necessary.
///
/// Nothing is logged here: the installed logger may write to the very sink
/// whose lock is being recovered.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use couleur::sync::lock_recover;
///
/// let mutex = Mutex::new(42);
/// let guard = lock_recover(&mutex);
/// assert_eq!(*guard, 42);
/// ```
#[inline]
pub fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
