//! Constant ANSI escape sequences.

/// Reset all attributes to default.
pub const RESET: &str = "\x1b[0m";

/// Clear entire screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Clear from cursor to end of screen.
pub const CLEAR_SCREEN_BELOW: &str = "\x1b[J";

/// Clear entire line.
pub const CLEAR_LINE: &str = "\x1b[2K";

/// Hide cursor.
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// Show cursor.
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// Move cursor to home position (1,1).
pub const CURSOR_HOME: &str = "\x1b[H";

/// Carriage return + line feed.
pub const CRLF: &str = "\r\n";

/// Synchronous update sequences (for flicker-free rendering).
pub mod sync {
    /// Begin synchronized update.
    pub const BEGIN: &str = "\x1b[?2026h";
    /// End synchronized update.
    pub const END: &str = "\x1b[?2026l";
}

/// Kitty keyboard protocol negotiation.
pub mod kitty {
    /// Push "disambiguate escape codes" onto the keyboard mode stack.
    pub const PUSH_DISAMBIGUATE: &str = "\x1b[>1u";
    /// Push "disambiguate" plus "report event types" (presses and releases).
    pub const PUSH_WITH_EVENTS: &str = "\x1b[>3u";
    /// Pop one entry from the keyboard mode stack.
    pub const POP: &str = "\x1b[<u";
    /// Ask the terminal for its current keyboard flags.
    pub const QUERY: &str = "\x1b[?u";
}

/// Enable bracketed paste mode.
pub const BRACKETED_PASTE_ON: &str = "\x1b[?2004h";

/// Disable bracketed paste mode.
pub const BRACKETED_PASTE_OFF: &str = "\x1b[?2004l";
