//! Line sinks that components render into.
//!
//! A [`RenderBuffer`] is an append-only list of styled lines. Buffers are
//! recycled through the process-wide pools in [`pool`]: a frame, every
//! overlay and every wrapping component draw from the pool and return the
//! buffer on drop.
//!
//! # Examples
//!
//! ```
//! use inline_tui::buffer::acquire_buffer;
//!
//! let mut buf = acquire_buffer();
//! buf.push_line("hello");
//! buf.push_line("\x1b[1mworld\x1b[0m");
//! assert_eq!(buf.len(), 2);
//! // Dropping `buf` resets it and hands it back to the pool.
//! ```

mod pool;

pub use pool::{
    MAX_POOLED_BYTES, MAX_POOLED_OBJECTS, Pool, Poolable, Pooled, PooledBuffer, PooledBytes,
    acquire_buffer, acquire_bytes,
};

use std::mem;

/// Ordered lines produced by one render pass.
///
/// Lines may contain escape sequences; each should stay within the width
/// the component was asked to render at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderBuffer {
    lines: Vec<String>,
}

impl RenderBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Create an empty buffer with room for `capacity` lines.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
        }
    }

    /// Append one line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append `count` empty lines.
    pub fn push_blank(&mut self, count: usize) {
        self.lines.extend(std::iter::repeat_with(String::new).take(count));
    }

    /// Append every line of `other`, leaving it empty.
    pub fn append(&mut self, other: &mut Self) {
        self.lines.append(&mut other.lines);
    }

    /// Lines rendered so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Mutable access to the rendered lines.
    pub fn lines_mut(&mut self) -> &mut Vec<String> {
        &mut self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing has been rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line but keep the allocation.
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// Exchange the line storage with `other`.
    ///
    /// Used to keep a rendered frame without copying it; the buffer ends up
    /// owning whatever storage `other` held before.
    pub fn swap_lines(&mut self, other: &mut Vec<String>) {
        mem::swap(&mut self.lines, other);
    }

    /// Total bytes of line content (escape sequences included).
    #[must_use]
    pub fn content_bytes(&self) -> usize {
        self.lines.iter().map(String::len).sum()
    }
}

impl Extend<String> for RenderBuffer {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.lines.extend(iter);
    }
}

impl<'a> Extend<&'a str> for RenderBuffer {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        self.lines.extend(iter.into_iter().map(str::to_owned));
    }
}

impl Poolable for RenderBuffer {
    fn reset(&mut self) {
        Self::reset(self);
    }

    fn retained_bytes(&self) -> usize {
        self.lines.capacity() * mem::size_of::<String>()
            + self.lines.iter().map(String::capacity).sum::<usize>()
    }
}
