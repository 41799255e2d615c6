//! Raw mode and size queries over termios.
//!
//! # Safety
//! This module makes the libc termios/ioctl FFI calls the rest of the crate
//! relies on. Each call is given a valid, zero-initialised out-parameter.

#![allow(unsafe_code)]
#![allow(clippy::borrow_as_ptr)]

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

/// Restores the saved termios settings when dropped.
#[derive(Debug)]
pub struct RawModeGuard {
    fd: RawFd,
    original: libc::termios,
}

impl RawModeGuard {
    /// Put `fd` into raw mode.
    ///
    /// Reads block until at least one byte arrives (`VMIN = 1`), which is
    /// what a dedicated input thread wants. Output post-processing stays on
    /// so `\n` written by other code still returns the carriage.
    pub fn new<F: AsRawFd>(fd: &F) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let original = get_termios(fd)?;

        let mut raw = original;
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        set_termios(fd, &raw)?;

        tracing::debug!(fd, "entered raw mode");
        Ok(Self { fd, original })
    }

    /// Descriptor this guard controls.
    #[must_use]
    pub const fn fd(&self) -> RawFd {
        self.fd
    }

    /// Restore the saved settings now; dropping afterwards is harmless.
    pub fn restore(&self) -> io::Result<()> {
        set_termios(self.fd, &self.original)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(fd = self.fd, %err, "failed to restore terminal mode");
        }
    }
}

/// Enter raw mode on stdin.
pub fn enable_raw_mode() -> io::Result<RawModeGuard> {
    RawModeGuard::new(&io::stdin())
}

/// Check if the given descriptor is a TTY.
#[must_use]
pub fn is_tty<F: AsRawFd>(fd: &F) -> bool {
    // SAFETY: isatty accepts any integer and reports invalid descriptors as 0.
    unsafe { libc::isatty(fd.as_raw_fd()) == 1 }
}

/// Size of the terminal on stdout as `(columns, rows)`.
pub fn terminal_size() -> io::Result<(u16, u16)> {
    terminal_size_of(libc::STDOUT_FILENO)
}

/// Size of the terminal behind `fd` as `(columns, rows)`.
///
/// Zero dimensions are reported as an error; the renderer treats them as a
/// no-op frame, which is never what a caller asking for the size wants.
pub fn terminal_size_of(fd: RawFd) -> io::Result<(u16, u16)> {
    // SAFETY: winsize is plain data; all-zero is a valid value.
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };

    // SAFETY: TIOCGWINSZ writes one winsize into the pointer we pass.
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };

    if result == -1 {
        Err(io::Error::last_os_error())
    } else if size.ws_col == 0 || size.ws_row == 0 {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "terminal reported zero dimensions",
        ))
    } else {
        Ok((size.ws_col, size.ws_row))
    }
}

fn get_termios(fd: RawFd) -> io::Result<libc::termios> {
    // SAFETY: termios is plain data; all-zero is a valid value.
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: tcgetattr fills the struct we pass.
    if unsafe { libc::tcgetattr(fd, &mut termios) } == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(termios)
    }
}

fn set_termios(fd: RawFd, termios: &libc::termios) -> io::Result<()> {
    // SAFETY: tcsetattr only reads the struct we pass.
    if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) } == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}
