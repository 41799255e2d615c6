//! Visible width of styled terminal text.

use crate::ansi::{Segment, segments};
use crate::unicode::cache::global_width_cache;
use crate::unicode::grapheme::{grapheme_width, graphemes, is_printable_ascii};

/// Number of terminal columns `s` occupies.
///
/// Escape sequences contribute nothing; each grapheme cluster contributes
/// 0, 1 or 2 columns. Printable-ASCII strings take a fast path that skips
/// segmentation and the cache. Everything else is memoized in the
/// process-wide LRU cache.
#[must_use]
pub fn visible_width(s: &str) -> usize {
    if is_printable_ascii(s) {
        return s.len();
    }

    let cache = global_width_cache();
    if let Some(width) = cache.get(s) {
        return width;
    }
    let width = measure_width(s);
    cache.insert(s, width);
    width
}

/// Uncached width computation behind [`visible_width`].
#[must_use]
pub fn measure_width(s: &str) -> usize {
    segments(s)
        .map(|segment| match segment {
            Segment::Text(text) if is_printable_ascii(text) => text.len(),
            Segment::Text(text) => graphemes(text).map(grapheme_width).sum(),
            Segment::Escape(_) => 0,
        })
        .sum()
}
