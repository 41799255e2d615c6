//! Terminal session setup and capability detection.
//!
//! The renderer itself only needs a `Write`; [`Terminal`] handles the
//! session around it: raw mode, keyboard protocol negotiation, bracketed
//! paste, and restoring all of it on exit.

mod capabilities;
mod raw;

pub use capabilities::{Capabilities, ColorSupport, SYNC_OVERRIDE_ENV};
pub use raw::{RawModeGuard, enable_raw_mode, is_tty, terminal_size, terminal_size_of};

use crate::ansi::{BRACKETED_PASTE_OFF, BRACKETED_PASTE_ON, CURSOR_SHOW, kitty};
use std::io::{self, Write};

/// Terminal session state.
pub struct Terminal<W: Write> {
    writer: W,
    capabilities: Capabilities,
    raw_mode_guard: Option<RawModeGuard>,
    kitty_keyboard: bool,
    bracketed_paste: bool,
}

impl<W: Write> Terminal<W> {
    /// Wrap `writer`, detecting capabilities from the environment.
    pub fn new(writer: W) -> Self {
        Self::with_capabilities(writer, Capabilities::detect())
    }

    /// Wrap `writer` with explicit capabilities.
    pub const fn with_capabilities(writer: W, capabilities: Capabilities) -> Self {
        Self {
            writer,
            capabilities,
            raw_mode_guard: None,
            kitty_keyboard: false,
            bracketed_paste: false,
        }
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[must_use]
    pub const fn is_raw_mode(&self) -> bool {
        self.raw_mode_guard.is_some()
    }

    /// Enter raw mode on stdin.
    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        if self.raw_mode_guard.is_none() {
            self.raw_mode_guard = Some(enable_raw_mode()?);
        }
        Ok(())
    }

    /// Restore the terminal mode saved by [`enter_raw_mode`](Self::enter_raw_mode).
    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        if let Some(guard) = self.raw_mode_guard.take() {
            guard.restore()?;
        }
        Ok(())
    }

    /// Ask the terminal to report keys with the Kitty protocol.
    ///
    /// With `report_events` releases are reported too; see
    /// [`InputHandler::wants_key_release`](crate::InputHandler::wants_key_release).
    /// Does nothing if the terminal is not known to support the protocol.
    pub fn enable_kitty_keyboard(&mut self, report_events: bool) -> io::Result<()> {
        if self.kitty_keyboard || !self.capabilities.kitty_keyboard {
            return Ok(());
        }
        let push = if report_events {
            kitty::PUSH_WITH_EVENTS
        } else {
            kitty::PUSH_DISAMBIGUATE
        };
        self.writer.write_all(push.as_bytes())?;
        self.writer.flush()?;
        self.kitty_keyboard = true;
        Ok(())
    }

    /// Pop the keyboard mode pushed by [`enable_kitty_keyboard`](Self::enable_kitty_keyboard).
    pub fn disable_kitty_keyboard(&mut self) -> io::Result<()> {
        if self.kitty_keyboard {
            self.writer.write_all(kitty::POP.as_bytes())?;
            self.writer.flush()?;
            self.kitty_keyboard = false;
        }
        Ok(())
    }

    /// Enable bracketed paste.
    pub fn enable_bracketed_paste(&mut self) -> io::Result<()> {
        if !self.bracketed_paste {
            self.writer.write_all(BRACKETED_PASTE_ON.as_bytes())?;
            self.writer.flush()?;
            self.bracketed_paste = true;
        }
        Ok(())
    }

    /// Disable bracketed paste.
    pub fn disable_bracketed_paste(&mut self) -> io::Result<()> {
        if self.bracketed_paste {
            self.writer.write_all(BRACKETED_PASTE_OFF.as_bytes())?;
            self.writer.flush()?;
            self.bracketed_paste = false;
        }
        Ok(())
    }

    /// Undo everything this session enabled and show the cursor.
    pub fn cleanup(&mut self) -> io::Result<()> {
        self.disable_kitty_keyboard()?;
        self.disable_bracketed_paste()?;
        self.writer.write_all(CURSOR_SHOW.as_bytes())?;
        self.writer.flush()?;
        self.exit_raw_mode()
    }

    /// Access the underlying writer.
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        if let Err(err) = self.cleanup() {
            tracing::warn!(%err, "terminal cleanup failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitty_caps() -> Capabilities {
        Capabilities {
            kitty_keyboard: true,
            ..Capabilities::default()
        }
    }

    #[test]
    fn test_kitty_push_and_pop_once() {
        let mut term = Terminal::with_capabilities(Vec::new(), kitty_caps());
        term.enable_kitty_keyboard(false).expect("write");
        term.enable_kitty_keyboard(false).expect("write");
        term.disable_kitty_keyboard().expect("write");
        term.disable_kitty_keyboard().expect("write");
        assert_eq!(term.writer(), b"\x1b[>1u\x1b[<u");
    }

    #[test]
    fn test_kitty_skipped_without_support() {
        let mut term = Terminal::with_capabilities(Vec::new(), Capabilities::default());
        term.enable_kitty_keyboard(true).expect("write");
        assert!(term.writer().is_empty());
    }

    #[test]
    fn test_event_reporting_mode() {
        let mut term = Terminal::with_capabilities(Vec::new(), kitty_caps());
        term.enable_kitty_keyboard(true).expect("write");
        assert_eq!(term.writer(), b"\x1b[>3u");
    }

    #[test]
    fn test_cleanup_restores_everything() {
        let mut term = Terminal::with_capabilities(Vec::new(), kitty_caps());
        term.enable_kitty_keyboard(false).expect("write");
        term.enable_bracketed_paste().expect("write");
        term.writer().clear();
        term.cleanup().expect("cleanup");
        assert_eq!(term.writer(), b"\x1b[<u\x1b[?2004l\x1b[?25h");
        assert!(!term.is_raw_mode());
    }
}
