//! Error types for the inline renderer.
//!
//! Only operations that touch the operating system can fail. Parsing and
//! width measurement never return errors: malformed input degrades to
//! "unrecognized" instead.

use std::fmt;
use std::io;

/// Result type alias for renderer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for renderer operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from terminal writes or thread spawning.
    Io(io::Error),
    /// The render loop was already started (its request queue is consumed).
    AlreadyStarted,
    /// The render loop thread panicked before it could be joined.
    RenderThreadPanicked,
    /// The renderer was stopped and cannot be started again.
    Stopped,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::AlreadyStarted => write!(f, "render loop already started"),
            Self::RenderThreadPanicked => write!(f, "render thread panicked"),
            Self::Stopped => write!(f, "renderer has been stopped"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
