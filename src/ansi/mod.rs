//! ANSI escape sequence scanning and generation.
//!
//! The scanner recognizes every escape form a terminal UI is likely to embed
//! in rendered text:
//!
//! | Introducer | Form | Terminator |
//! |---|---|---|
//! | `ESC [` | CSI | first byte in `0x40..=0x7E` |
//! | `ESC ]` | OSC | `BEL` or `ESC \` |
//! | `ESC _`, `ESC P`, `ESC ^` | APC / DCS / PM | `ESC \` |
//! | `ESC (` | charset designation | one designator character |
//! | `ESC x` | two-byte escape | - |
//!
//! Unterminated sequences run to the end of the input.

pub mod output;
pub mod sequences;
mod sgr;

pub use output::ScriptWriter;
pub use sequences::*;
pub use sgr::ActiveSgr;

/// The escape byte.
pub const ESC: u8 = 0x1b;

const BEL: u8 = 0x07;

/// Byte length of a UTF-8 sequence given its lead byte.
#[inline]
pub(crate) const fn utf8_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Length of the escape sequence at the start of `bytes`.
///
/// Returns 0 if `bytes` does not start with `ESC`. A lone trailing `ESC`
/// has length 1.
#[must_use]
pub fn sequence_len(bytes: &[u8]) -> usize {
    if bytes.first() != Some(&ESC) {
        return 0;
    }
    let Some(&kind) = bytes.get(1) else {
        return 1;
    };

    match kind {
        b'[' => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map_or(bytes.len(), |pos| pos + 3),
        b']' => {
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    BEL => return i + 1,
                    ESC if bytes.get(i + 1) == Some(&b'\\') => return i + 2,
                    _ => i += 1,
                }
            }
            bytes.len()
        }
        b'_' | b'P' | b'^' => find_string_terminator(bytes, 2),
        b'(' => {
            let designator = bytes.get(2).map_or(0, |&b| utf8_len(b));
            (2 + designator).min(bytes.len())
        }
        other => (1 + utf8_len(other)).min(bytes.len()),
    }
}

/// End offset (exclusive) of the first `ESC \` at or after `from`.
fn find_string_terminator(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .windows(2)
        .position(|w| w == b"\x1b\\")
        .map_or(bytes.len(), |pos| from + pos + 2)
}

/// A run of visible text or a single escape sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Visible text with no escape bytes.
    Text(&'a str),
    /// One complete (or unterminated) escape sequence.
    Escape(&'a str),
}

/// Iterator splitting a string into text runs and escape sequences.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.s.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }
        let start = self.pos;
        if bytes[start] == ESC {
            // Terminators are ASCII and designators are measured by their
            // UTF-8 lead byte, so `end` is always a char boundary.
            self.pos = start + sequence_len(&bytes[start..]);
            Some(Segment::Escape(&self.s[start..self.pos]))
        } else {
            self.pos = bytes[start..]
                .iter()
                .position(|&b| b == ESC)
                .map_or(bytes.len(), |off| start + off);
            Some(Segment::Text(&self.s[start..self.pos]))
        }
    }
}

/// Split `s` into text runs and escape sequences, in order.
#[must_use]
pub fn segments(s: &str) -> Segments<'_> {
    Segments { s, pos: 0 }
}

/// Check whether `s` contains any escape byte.
#[inline]
#[must_use]
pub fn has_escape(s: &str) -> bool {
    s.as_bytes().contains(&ESC)
}

/// Remove every escape sequence, leaving only the visible text.
#[must_use]
pub fn strip_ansi(s: &str) -> String {
    if !has_escape(s) {
        return s.to_owned();
    }
    let mut out = String::with_capacity(s.len());
    for segment in segments(s) {
        if let Segment::Text(text) = segment {
            out.push_str(text);
        }
    }
    out
}

/// Collect every escape sequence in `s`, in order, without the text.
#[must_use]
pub fn extract_ansi(s: &str) -> Vec<&str> {
    segments(s)
        .filter_map(|segment| match segment {
            Segment::Escape(seq) => Some(seq),
            Segment::Text(_) => None,
        })
        .collect()
}
