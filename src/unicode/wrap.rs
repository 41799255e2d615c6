//! Wrapping and truncation of text that carries escape sequences.

use crate::ansi::{self, ActiveSgr, Segment, segments};
use crate::unicode::grapheme::{grapheme_width, graphemes};
use crate::unicode::width::visible_width;

/// Marker appended by [`truncate_to_width`]; one column wide.
pub const ELLIPSIS: char = '…';

/// Split `s` into lines of at most `max_width` visible columns.
///
/// Breaks happen at `\n` and before any grapheme cluster that would
/// overflow the current line (character wrap, not word wrap). Escape
/// sequences are copied through untouched and the style in effect at a
/// break is re-emitted at the start of the continuation line. A cluster
/// wider than `max_width` on its own is dropped.
///
/// `max_width == 0` yields no lines; empty input yields one empty line.
#[must_use]
pub fn wrap_text_with_ansi(s: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0usize;
    let mut sgr = ActiveSgr::new();

    for segment in segments(s) {
        match segment {
            Segment::Escape(seq) => {
                current.push_str(seq);
                sgr.apply(seq);
            }
            Segment::Text(text) => {
                for g in graphemes(text) {
                    if g == "\n" || g == "\r\n" {
                        lines.push(std::mem::replace(&mut current, sgr.to_string()));
                        used = 0;
                        continue;
                    }

                    let width = grapheme_width(g);
                    if width > max_width {
                        continue;
                    }
                    if used + width > max_width {
                        lines.push(std::mem::replace(&mut current, sgr.to_string()));
                        used = 0;
                    }
                    current.push_str(g);
                    used += width;
                }
            }
        }
    }

    lines.push(current);
    lines
}

/// Shorten `s` to at most `max_width` columns, ending in [`ELLIPSIS`].
///
/// Text that already fits is returned unchanged. Otherwise escape
/// sequences and clusters are copied until `max_width - 1` columns are
/// used, then a style reset and the ellipsis are appended.
#[must_use]
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(s) <= max_width {
        return s.to_owned();
    }
    if max_width == 1 {
        return ELLIPSIS.to_string();
    }

    let budget = max_width - 1;
    let mut out = String::with_capacity(s.len().min(budget * 4) + 8);
    let mut used = 0usize;

    'outer: for segment in segments(s) {
        match segment {
            Segment::Escape(seq) => out.push_str(seq),
            Segment::Text(text) => {
                for g in graphemes(text) {
                    let width = grapheme_width(g);
                    if used + width > budget {
                        break 'outer;
                    }
                    out.push_str(g);
                    used += width;
                }
            }
        }
    }

    out.push_str(ansi::RESET);
    out.push(ELLIPSIS);
    out
}
