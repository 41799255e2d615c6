//! Lock wrapper for component state.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mutex-guarded state shared between mutating callers and the render loop.
///
/// Render paths call [`snapshot`](Self::snapshot) or [`read`](Self::read)
/// to copy what they need and release the lock before doing any wrapping or
/// measuring, so writers are never held up by a render. A poisoned lock is
/// recovered rather than propagated.
pub struct Guarded<T> {
    inner: Mutex<T>,
}

impl<T> Guarded<T> {
    /// Wrap an initial value.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with shared access. Keep `f` short.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with exclusive access.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock())
    }

    /// Replace the value, returning the old one.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.lock(), value)
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> T {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Guarded<T> {
    /// Copy the current value out.
    pub fn snapshot(&self) -> T {
        self.lock().clone()
    }
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Guarded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guarded").field(&*self.lock()).finish()
    }
}
