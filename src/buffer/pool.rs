//! Process-wide object pools for render scratch space.
//!
//! Objects are reset when they come back, and anything retaining more than
//! [`MAX_POOLED_BYTES`] is dropped instead of pooled so one oversized frame
//! cannot pin its memory for the rest of the session.

use crate::buffer::RenderBuffer;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Objects retaining more than this many bytes are discarded on release.
pub const MAX_POOLED_BYTES: usize = 1 << 20;

/// Upper bound on idle objects kept per pool.
pub const MAX_POOLED_OBJECTS: usize = 64;

/// A value that can be recycled through a [`Pool`].
pub trait Poolable: Default + Send {
    /// Clear contents while keeping allocations.
    fn reset(&mut self);

    /// Heap bytes this value keeps alive.
    fn retained_bytes(&self) -> usize;
}

impl Poolable for Vec<u8> {
    fn reset(&mut self) {
        self.clear();
    }

    fn retained_bytes(&self) -> usize {
        self.capacity()
    }
}

/// A bounded free list of reusable objects.
#[derive(Debug)]
pub struct Pool<T> {
    free: Mutex<Vec<T>>,
    max_bytes: usize,
    max_objects: usize,
}

impl<T: Poolable> Pool<T> {
    /// Create a pool with the default retention limits.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limits(MAX_POOLED_BYTES, MAX_POOLED_OBJECTS)
    }

    /// Create a pool with explicit retention limits.
    #[must_use]
    pub const fn with_limits(max_bytes: usize, max_objects: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_bytes,
            max_objects,
        }
    }

    /// Take an object from the pool, or a fresh one if it is empty.
    ///
    /// The object is always empty; it returns to the pool when the guard
    /// drops.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let value = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        Pooled { value, pool: self }
    }

    /// Return an object to the pool.
    pub fn release(&self, mut value: T) {
        if value.retained_bytes() > self.max_bytes {
            return;
        }
        value.reset();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_objects {
            free.push(value);
        }
    }

    /// Number of idle objects.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle to a pooled object.
#[derive(Debug)]
pub struct Pooled<'a, T: Poolable> {
    value: T,
    pool: &'a Pool<T>,
}

impl<T: Poolable> Pooled<'_, T> {
    /// Detach the value from the pool.
    #[must_use]
    pub fn into_inner(self) -> T {
        let mut this = ManuallyDrop::new(self);
        mem::take(&mut this.value)
    }
}

impl<T: Poolable> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Poolable> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Poolable> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.release(mem::take(&mut self.value));
    }
}

/// A pooled [`RenderBuffer`].
pub type PooledBuffer = Pooled<'static, RenderBuffer>;

/// A pooled byte accumulator.
pub type PooledBytes = Pooled<'static, Vec<u8>>;

static BUFFER_POOL: Pool<RenderBuffer> = Pool::new();
static BYTES_POOL: Pool<Vec<u8>> = Pool::new();

/// Take an empty [`RenderBuffer`] from the global pool.
#[must_use]
pub fn acquire_buffer() -> PooledBuffer {
    BUFFER_POOL.acquire()
}

/// Take an empty byte vector from the global pool.
#[must_use]
pub fn acquire_bytes() -> PooledBytes {
    BYTES_POOL.acquire()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reacquired_buffer_is_empty() {
        let pool: Pool<RenderBuffer> = Pool::new();
        {
            let mut buf = pool.acquire();
            buf.push_line("left over");
            buf.push_line("more");
        }
        assert_eq!(pool.idle(), 1);
        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert_eq!(buf.content_bytes(), 0);
    }

    #[test]
    fn test_global_buffer_pool_resets() {
        {
            let mut buf = acquire_buffer();
            buf.push_line("dirty");
        }
        for _ in 0..4 {
            assert!(acquire_buffer().is_empty());
        }
    }

    #[test]
    fn test_oversized_objects_are_discarded() {
        let pool: Pool<Vec<u8>> = Pool::with_limits(64, 8);
        {
            let mut bytes = pool.acquire();
            bytes.reserve(1024);
        }
        assert_eq!(pool.idle(), 0);
        {
            let mut bytes = pool.acquire();
            bytes.extend_from_slice(b"small");
        }
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_global_bytes_cap() {
        let mut bytes = acquire_bytes();
        bytes.reserve(MAX_POOLED_BYTES + 1);
        assert!(bytes.retained_bytes() > MAX_POOLED_BYTES);
        drop(bytes);
        assert!(acquire_bytes().is_empty());
    }

    #[test]
    fn test_depth_cap() {
        let pool: Pool<Vec<u8>> = Pool::with_limits(MAX_POOLED_BYTES, 2);
        let guards: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(guards);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_into_inner_detaches() {
        let pool: Pool<Vec<u8>> = Pool::new();
        let mut bytes = pool.acquire();
        bytes.push(1);
        let owned = bytes.into_inner();
        assert_eq!(owned, [1]);
        assert_eq!(pool.idle(), 0);
    }
}
