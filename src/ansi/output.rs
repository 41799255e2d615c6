//! Escape-script builder used by the renderer.
//!
//! The renderer never addresses absolute rows: every vertical move is
//! relative to the row the cursor was last left on, so the output behaves
//! like an append-only log rather than a full-screen application.

use crate::ansi::sequences;

/// Appends terminal escape vocabulary to a byte buffer.
#[derive(Debug)]
pub struct ScriptWriter<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> ScriptWriter<'a> {
    /// Wrap a byte buffer. Existing contents are kept.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    /// Number of bytes in the script so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append raw text.
    pub fn write_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Move the cursor `delta` rows (negative is up). Nothing is written
    /// for a zero delta.
    pub fn move_rows(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }
        self.buf.extend_from_slice(b"\x1b[");
        write_decimal(self.buf, delta.unsigned_abs());
        self.buf.push(if delta < 0 { b'A' } else { b'B' });
    }

    /// Move from row `from` to row `to` with relative motion.
    pub fn move_between(&mut self, from: usize, to: usize) {
        self.move_rows(to as isize - from as isize);
    }

    /// Position the cursor on a 0-indexed column of the current line (CHA).
    pub fn column(&mut self, col: usize) {
        self.buf.extend_from_slice(b"\x1b[");
        write_decimal(self.buf, col + 1);
        self.buf.push(b'G');
    }

    /// Return to column 0 and erase the whole line.
    pub fn clear_line(&mut self) {
        self.buf.push(b'\r');
        self.write_str(sequences::CLEAR_LINE);
    }

    /// Start a new line below the current one.
    pub fn newline(&mut self) {
        self.write_str(sequences::CRLF);
    }

    /// Clear the whole screen and home the cursor.
    pub fn clear_screen(&mut self) {
        self.write_str(sequences::CLEAR_SCREEN);
        self.write_str(sequences::CURSOR_HOME);
    }

    /// Erase from column 0 of the current line to the end of the screen.
    pub fn clear_below(&mut self) {
        self.buf.push(b'\r');
        self.write_str(sequences::CLEAR_SCREEN_BELOW);
    }

    /// Show or hide the cursor.
    pub fn cursor_visible(&mut self, visible: bool) {
        self.write_str(if visible {
            sequences::CURSOR_SHOW
        } else {
            sequences::CURSOR_HIDE
        });
    }
}

/// Write an unsigned integer as decimal digits without formatting overhead.
///
/// Stack buffer is sized for the largest `usize` (20 digits).
#[inline]
fn write_decimal(buf: &mut Vec<u8>, n: usize) {
    if n < 10 {
        buf.push(b'0' + n as u8);
        return;
    }
    let mut digits = [0u8; 20];
    let mut i = digits.len();
    let mut val = n;
    while val > 0 {
        i -= 1;
        digits[i] = b'0' + (val % 10) as u8;
        val /= 10;
    }
    buf.extend_from_slice(&digits[i..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(f: impl FnOnce(&mut ScriptWriter<'_>)) -> String {
        let mut buf = Vec::new();
        let mut writer = ScriptWriter::new(&mut buf);
        f(&mut writer);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_move_rows() {
        assert_eq!(script(|w| w.move_rows(3)), "\x1b[3B");
        assert_eq!(script(|w| w.move_rows(-12)), "\x1b[12A");
        assert_eq!(script(|w| w.move_rows(0)), "");
    }

    #[test]
    fn test_move_between() {
        assert_eq!(script(|w| w.move_between(5, 2)), "\x1b[3A");
        assert_eq!(script(|w| w.move_between(2, 2)), "");
    }

    #[test]
    fn test_column_is_one_based() {
        assert_eq!(script(|w| w.column(0)), "\x1b[1G");
        assert_eq!(script(|w| w.column(119)), "\x1b[120G");
    }

    #[test]
    fn test_line_and_screen_clears() {
        assert_eq!(script(|w| w.clear_line()), "\r\x1b[2K");
        assert_eq!(script(|w| w.clear_screen()), "\x1b[2J\x1b[H");
        assert_eq!(script(|w| w.clear_below()), "\r\x1b[J");
    }

    #[test]
    fn test_large_numbers() {
        assert_eq!(script(|w| w.move_rows(1_000_000)), "\x1b[1000000B");
    }
}
