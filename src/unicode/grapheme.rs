//! Grapheme cluster iteration and per-cluster display width.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Iterate over extended grapheme clusters in a string.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

/// Iterate over grapheme clusters with byte indices.
pub fn grapheme_indices(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.grapheme_indices(true)
}

/// Check if every byte is printable ASCII (`0x20..=0x7E`).
///
/// Such strings are exactly one column per byte.
#[inline]
#[must_use]
pub fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// Display width of one grapheme cluster: 0, 1 or 2 columns.
///
/// Control characters occupy no columns. Multi-codepoint clusters (ZWJ
/// emoji, flags, keycaps) are capped at two columns since a terminal draws
/// them as a single glyph.
#[must_use]
pub fn grapheme_width(g: &str) -> usize {
    let Some(first) = g.chars().next() else {
        return 0;
    };
    if first.is_control() {
        return 0;
    }
    if g.len() == 1 {
        return 1;
    }
    g.width().min(2)
}
