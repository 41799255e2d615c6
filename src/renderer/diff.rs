//! Relative frame diffing.
//!
//! Produces the escape script that turns the previously emitted frame into
//! the next one. Only relative vertical motion is used, so the rendered block
//! can sit anywhere on screen and scroll like ordinary output.

use crate::ansi::{CLEAR_LINE, ScriptWriter};

/// How a frame is brought on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawKind {
    /// Nothing was emitted before; print the frame where the cursor is.
    Initial,
    /// Width changed: clear the screen, home, print everything.
    ClearScreen,
    /// Diff state was invalidated: erase the old block in place and reprint.
    Repaint,
    /// Rewrite changed rows only.
    Diff,
}

impl RedrawKind {
    #[must_use]
    pub const fn is_full(self) -> bool {
        !matches!(self, Self::Diff)
    }
}

/// Engine state carried from one frame to the next.
#[derive(Clone, Debug)]
pub(crate) struct RenderState {
    /// Tallest block emitted since the last shrink; rows below the current
    /// frame up to here still hold stale text.
    pub max_rendered: usize,
    /// Row (relative to the block top) the terminal cursor was left on.
    pub cursor_row: usize,
    /// The next frame cannot be diffed against the previous one.
    pub first_render: bool,
    /// Width of the last emitted frame, 0 before the first.
    pub prev_width: usize,
    /// Whether the last emitted frame was cut to the terminal height.
    pub prev_clamped: bool,
    /// Hardware cursor position emitted last, `None` when hidden.
    pub last_cursor: Option<(usize, usize)>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub const fn new() -> Self {
        Self {
            max_rendered: 0,
            cursor_row: 0,
            first_render: true,
            prev_width: 0,
            prev_clamped: false,
            last_cursor: None,
        }
    }

    /// Pick the redraw flavour for a frame of `width` columns.
    pub const fn redraw_kind(&self, width: usize, clamped: bool) -> RedrawKind {
        if self.first_render && self.max_rendered == 0 && self.prev_width == 0 {
            RedrawKind::Initial
        } else if self.prev_width != 0 && self.prev_width != width {
            RedrawKind::ClearScreen
        } else if self.first_render || self.prev_clamped != clamped {
            RedrawKind::Repaint
        } else {
            RedrawKind::Diff
        }
    }

    /// Append the update script for `prev` → `next` to `out`, then the
    /// cursor placement for `cursor`, and advance the state.
    pub fn write_frame(
        &mut self,
        out: &mut Vec<u8>,
        prev: &[String],
        next: &[String],
        width: usize,
        clamped: bool,
        cursor: Option<(usize, usize)>,
    ) -> RedrawKind {
        let kind = self.redraw_kind(width, clamped);
        let mut script = ScriptWriter::new(out);

        match kind {
            RedrawKind::Initial => self.write_full(&mut script, next),
            RedrawKind::ClearScreen => {
                script.clear_screen();
                self.write_full(&mut script, next);
            }
            RedrawKind::Repaint => {
                script.move_rows(-(self.cursor_row as isize));
                script.clear_below();
                self.write_full(&mut script, next);
            }
            RedrawKind::Diff => self.write_diff(&mut script, prev, next),
        }

        if !script.is_empty() || cursor != self.last_cursor {
            match cursor {
                Some((row, col)) => {
                    script.move_between(self.cursor_row, row);
                    script.column(col);
                    script.cursor_visible(true);
                    self.cursor_row = row;
                }
                None => script.cursor_visible(false),
            }
            self.last_cursor = cursor;
        }

        self.first_render = false;
        self.prev_width = width;
        self.prev_clamped = clamped;
        kind
    }

    fn write_full(&mut self, script: &mut ScriptWriter<'_>, lines: &[String]) {
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                script.newline();
            }
            script.write_str(line);
        }
        self.cursor_row = lines.len().saturating_sub(1);
        self.max_rendered = lines.len();
    }

    fn write_diff(&mut self, script: &mut ScriptWriter<'_>, prev: &[String], next: &[String]) {
        let common = prev.len().min(next.len());
        for row in 0..common {
            if prev[row] != next[row] {
                self.goto(script, row);
                script.clear_line();
                script.write_str(&next[row]);
            }
        }

        if next.len() > prev.len() {
            if !prev.is_empty() {
                self.goto(script, prev.len() - 1);
            }
            for row in prev.len()..next.len() {
                if row == 0 {
                    self.goto(script, 0);
                    script.clear_line();
                } else {
                    script.newline();
                    if row < self.max_rendered {
                        script.write_str(CLEAR_LINE);
                    }
                }
                script.write_str(&next[row]);
                self.cursor_row = row;
            }
        }
        self.max_rendered = self.max_rendered.max(next.len());

        if next.len() < self.max_rendered {
            for row in next.len()..self.max_rendered {
                self.goto(script, row);
                script.clear_line();
            }
            self.goto(script, next.len().saturating_sub(1));
            self.max_rendered = next.len();
        }
    }

    fn goto(&mut self, script: &mut ScriptWriter<'_>, row: usize) {
        script.move_between(self.cursor_row, row);
        self.cursor_row = row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn frame(
        state: &mut RenderState,
        prev: &[String],
        next: &[String],
        width: usize,
    ) -> (RedrawKind, String) {
        let mut out = Vec::new();
        let kind = state.write_frame(&mut out, prev, next, width, false, None);
        (kind, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn test_initial_frame_prints_lines() {
        let mut state = RenderState::new();
        let (kind, out) = frame(&mut state, &[], &lines(&["a", "b"]), 10);
        assert_eq!(kind, RedrawKind::Initial);
        assert_eq!(out, "a\r\nb\x1b[?25l");
        assert_eq!(state.cursor_row, 1);
        assert_eq!(state.max_rendered, 2);
    }

    #[test]
    fn test_identical_frame_writes_nothing() {
        let mut state = RenderState::new();
        let f = lines(&["a", "b"]);
        frame(&mut state, &[], &f, 10);
        let (kind, out) = frame(&mut state, &f, &f, 10);
        assert_eq!(kind, RedrawKind::Diff);
        assert!(out.is_empty());
    }

    #[test]
    fn test_changed_row_is_rewritten() {
        let mut state = RenderState::new();
        let prev = lines(&["a", "b", "c"]);
        frame(&mut state, &[], &prev, 10);
        let (_, out) = frame(&mut state, &prev, &lines(&["a", "B", "c"]), 10);
        assert_eq!(out, "\x1b[1A\r\x1b[2KB\x1b[?25l");
        assert_eq!(state.cursor_row, 1);
    }

    #[test]
    fn test_growth_appends_rows() {
        let mut state = RenderState::new();
        let prev = lines(&["a"]);
        frame(&mut state, &[], &prev, 10);
        let (_, out) = frame(&mut state, &prev, &lines(&["a", "b", "c"]), 10);
        assert_eq!(out, "\r\nb\r\nc\x1b[?25l");
        assert_eq!(state.cursor_row, 2);
        assert_eq!(state.max_rendered, 3);
    }

    #[test]
    fn test_shrink_clears_stale_rows() {
        let mut state = RenderState::new();
        let prev = lines(&["a", "b", "c"]);
        frame(&mut state, &[], &prev, 10);
        let (_, out) = frame(&mut state, &prev, &lines(&["a"]), 10);
        assert_eq!(out, "\x1b[1A\r\x1b[2K\x1b[1B\r\x1b[2K\x1b[2A\x1b[?25l");
        assert_eq!(state.cursor_row, 0);
        assert_eq!(state.max_rendered, 1);
    }

    #[test]
    fn test_width_change_clears_screen() {
        let mut state = RenderState::new();
        let f = lines(&["a"]);
        frame(&mut state, &[], &f, 10);
        let (kind, out) = frame(&mut state, &f, &f, 20);
        assert_eq!(kind, RedrawKind::ClearScreen);
        assert!(out.starts_with("\x1b[2J\x1b[H"));
        assert!(kind.is_full());
    }

    #[test]
    fn test_invalidated_state_repaints_in_place() {
        let mut state = RenderState::new();
        frame(&mut state, &[], &lines(&["a", "b"]), 10);
        state.first_render = true;
        let (kind, out) = frame(&mut state, &[], &lines(&["x"]), 10);
        assert_eq!(kind, RedrawKind::Repaint);
        assert_eq!(out, "\x1b[1A\r\x1b[Jx\x1b[?25l");
        assert_eq!(state.max_rendered, 1);
    }

    #[test]
    fn test_clamp_transition_repaints() {
        let mut state = RenderState::new();
        let f = lines(&["a"]);
        frame(&mut state, &[], &f, 10);
        let mut out = Vec::new();
        let kind = state.write_frame(&mut out, &f, &f, 10, true, None);
        assert_eq!(kind, RedrawKind::Repaint);
    }

    #[test]
    fn test_cursor_is_positioned_relative() {
        let mut state = RenderState::new();
        let f = lines(&["> hi", "footer"]);
        let mut out = Vec::new();
        state.write_frame(&mut out, &[], &f, 10, false, Some((0, 4)));
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.ends_with("\x1b[1A\x1b[5G\x1b[?25h"));
        assert_eq!(state.cursor_row, 0);

        // Unchanged frame and cursor: nothing to write.
        let mut again = Vec::new();
        state.write_frame(&mut again, &f, &f, 10, false, Some((0, 4)));
        assert!(again.is_empty());

        // Cursor moves on its own.
        let mut moved = Vec::new();
        state.write_frame(&mut moved, &f, &f, 10, false, Some((0, 2)));
        assert_eq!(moved, b"\x1b[3G\x1b[?25h");
    }

    #[test]
    fn test_growth_from_empty_frame() {
        let mut state = RenderState::new();
        frame(&mut state, &[], &[], 10);
        let (kind, out) = frame(&mut state, &[], &lines(&["a", "b"]), 10);
        assert_eq!(kind, RedrawKind::Diff);
        assert_eq!(out, "\r\x1b[2Ka\r\nb\x1b[?25l");
    }
}
