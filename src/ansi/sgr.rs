//! Tracking of open SGR (Select Graphic Rendition) state.

use std::fmt;

/// Accumulated style sequences currently in effect.
///
/// Wrapping code feeds every escape sequence it copies through
/// [`apply`](Self::apply); when a line break is inserted the accumulated
/// sequences are replayed so the continuation line keeps the same style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveSgr {
    active: String,
}

impl ActiveSgr {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an escape sequence. Non-SGR sequences are ignored; a reset
    /// clears everything recorded so far.
    pub fn apply(&mut self, seq: &str) {
        let Some(params) = sgr_params(seq) else {
            return;
        };
        let mut fields = params.split(';');
        let leading_reset = fields.next().is_some_and(is_reset_field);
        if params.split(';').all(is_reset_field) {
            self.active.clear();
            return;
        }
        if leading_reset {
            self.active.clear();
        }
        self.active.push_str(seq);
    }

    /// Forget all recorded style.
    pub fn reset(&mut self) {
        self.active.clear();
    }

    /// True when no style is in effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// The sequences that re-establish the current style.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.active
    }
}

impl fmt::Display for ActiveSgr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.active)
    }
}

/// Parameters of an SGR sequence (`ESC [ params m`), if `seq` is one.
fn sgr_params(seq: &str) -> Option<&str> {
    seq.strip_prefix("\x1b[")?.strip_suffix('m')
}

fn is_reset_field(field: &str) -> bool {
    field.bytes().all(|b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_in_order() {
        let mut sgr = ActiveSgr::new();
        sgr.apply("\x1b[1m");
        sgr.apply("\x1b[31m");
        assert_eq!(sgr.to_string(), "\x1b[1m\x1b[31m");
    }

    #[test]
    fn test_reset_forms_clear() {
        for reset in ["\x1b[0m", "\x1b[m", "\x1b[00m"] {
            let mut sgr = ActiveSgr::new();
            sgr.apply("\x1b[4m");
            sgr.apply(reset);
            assert!(sgr.is_empty(), "{reset:?} should clear");
        }
    }

    #[test]
    fn test_leading_reset_replaces_state() {
        let mut sgr = ActiveSgr::new();
        sgr.apply("\x1b[4m");
        sgr.apply("\x1b[0;32m");
        assert_eq!(sgr.as_str(), "\x1b[0;32m");
    }

    #[test]
    fn test_ignores_non_sgr() {
        let mut sgr = ActiveSgr::new();
        sgr.apply("\x1b[2K");
        sgr.apply("\x1b]0;title\x07");
        sgr.apply("\x1b_marker\x1b\\");
        assert!(sgr.is_empty());
    }

    #[test]
    fn test_explicit_reset() {
        let mut sgr = ActiveSgr::new();
        sgr.apply("\x1b[7m");
        sgr.reset();
        assert_eq!(sgr.as_str(), "");
    }
}
