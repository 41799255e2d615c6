//! Terminal capability detection.

use std::env;

/// Environment variable forcing synchronized output on (`1`) or off (`0`).
pub const SYNC_OVERRIDE_ENV: &str = "INLINE_TUI_SYNC";

/// Color support level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorSupport {
    /// No color support.
    #[default]
    None,
    /// 16 colors (basic ANSI).
    Basic,
    /// 256 colors.
    Extended,
    /// True color (16 million colors).
    TrueColor,
}

/// Detected terminal capabilities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Color support level.
    pub color: ColorSupport,
    /// Locale is UTF-8.
    pub unicode: bool,
    /// Terminal honours `CSI ?2026h/l` synchronized updates.
    pub sync_output: bool,
    /// Kitty keyboard protocol.
    pub kitty_keyboard: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            color: ColorSupport::TrueColor,
            unicode: true,
            sync_output: true,
            kitty_keyboard: false,
        }
    }
}

impl Capabilities {
    /// Detect terminal capabilities from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Detect capabilities from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let term = lookup("TERM").unwrap_or_default();
        let colorterm = lookup("COLORTERM").unwrap_or_default();
        let term_program = lookup("TERM_PROGRAM").unwrap_or_default();
        let in_kitty = lookup("KITTY_WINDOW_ID").is_some();

        let unicode = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|key| lookup(*key))
            .any(|value| value.to_lowercase().contains("utf"));

        let sync_output = match lookup(SYNC_OVERRIDE_ENV).as_deref() {
            Some("1") => true,
            Some("0") => false,
            _ => in_kitty || Self::detect_sync(&term, &term_program),
        };

        Self {
            color: Self::detect_color(&term, &colorterm),
            unicode,
            sync_output,
            kitty_keyboard: in_kitty || Self::detect_kitty_keyboard(&term, &term_program),
        }
    }

    fn detect_color(term: &str, colorterm: &str) -> ColorSupport {
        if colorterm.eq_ignore_ascii_case("truecolor") || colorterm.eq_ignore_ascii_case("24bit") {
            return ColorSupport::TrueColor;
        }

        let truecolor_terms = ["24bit", "truecolor", "alacritty", "kitty", "wezterm", "ghostty"];
        if truecolor_terms.iter().any(|t| term.contains(t)) {
            return ColorSupport::TrueColor;
        }

        if term.contains("256") {
            return ColorSupport::Extended;
        }

        if term.is_empty() || term == "dumb" {
            return ColorSupport::None;
        }

        ColorSupport::Basic
    }

    fn detect_sync(term: &str, term_program: &str) -> bool {
        let programs = ["kitty", "Alacritty", "WezTerm", "ghostty", "iTerm.app", "vscode"];
        let terms = ["kitty", "alacritty", "foot", "ghostty", "wezterm"];
        programs.iter().any(|p| term_program.contains(p)) || terms.iter().any(|t| term.contains(t))
    }

    fn detect_kitty_keyboard(term: &str, term_program: &str) -> bool {
        term.contains("kitty")
            || term.contains("foot")
            || ["ghostty", "WezTerm"].iter().any(|p| term_program.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn caps(vars: &[(&str, &str)]) -> Capabilities {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Capabilities::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment() {
        let caps = caps(&[]);
        assert_eq!(caps.color, ColorSupport::None);
        assert!(!caps.sync_output);
        assert!(!caps.kitty_keyboard);
        assert!(!caps.unicode);
    }

    #[test]
    fn test_kitty_window() {
        let caps = caps(&[("TERM", "xterm-kitty"), ("KITTY_WINDOW_ID", "1")]);
        assert_eq!(caps.color, ColorSupport::TrueColor);
        assert!(caps.sync_output);
        assert!(caps.kitty_keyboard);
    }

    #[test]
    fn test_color_levels() {
        assert_eq!(caps(&[("TERM", "xterm-256color")]).color, ColorSupport::Extended);
        assert_eq!(caps(&[("TERM", "xterm")]).color, ColorSupport::Basic);
        assert_eq!(caps(&[("TERM", "dumb")]).color, ColorSupport::None);
        assert_eq!(
            caps(&[("TERM", "xterm"), ("COLORTERM", "truecolor")]).color,
            ColorSupport::TrueColor
        );
    }

    #[test]
    fn test_sync_override() {
        assert!(caps(&[("TERM", "xterm"), (SYNC_OVERRIDE_ENV, "1")]).sync_output);
        assert!(!caps(&[("TERM_PROGRAM", "WezTerm"), (SYNC_OVERRIDE_ENV, "0")]).sync_output);
        assert!(caps(&[("TERM_PROGRAM", "WezTerm"), (SYNC_OVERRIDE_ENV, "yes")]).sync_output);
    }

    #[test]
    fn test_unicode_locale() {
        assert!(caps(&[("LANG", "en_US.UTF-8")]).unicode);
        assert!(!caps(&[("LANG", "C")]).unicode);
    }

    #[test]
    fn test_color_support_ordering() {
        assert!(ColorSupport::TrueColor > ColorSupport::Extended);
        assert!(ColorSupport::Extended > ColorSupport::Basic);
        assert!(ColorSupport::Basic > ColorSupport::None);
    }

    #[test]
    fn test_capabilities_default() {
        let caps = Capabilities::default();
        assert_eq!(caps.color, ColorSupport::TrueColor);
        assert!(caps.unicode);
        assert!(caps.sync_output);
    }
}
