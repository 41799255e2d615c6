//! Dedicated render thread.
//!
//! ```text
//! producers                         render thread
//! ---------                         -------------
//! request_render ── try_send ──▶ [ capacity 1 ] ── recv ──▶ render body
//! (full queue: request dropped)                            write script
//! ```
//!
//! Requests that arrive while one is already queued collapse into it, so a
//! burst of mutations costs a single frame.

use super::Shared;
use crate::event::{LogLevel, emit_log};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::Receiver;

/// Body of the render thread. Returns when the renderer is stopped or every
/// sender is gone.
pub(super) fn render_loop(shared: &Arc<Shared>, requests: &Receiver<()>) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        while requests.recv().is_ok() {
            if shared.stopped.load(Ordering::Acquire) {
                break;
            }
            if let Err(err) = shared.render() {
                emit_log(LogLevel::Warn, &format!("frame write failed: {err}"));
            }
        }
    }));

    match result {
        Ok(()) => tracing::debug!("render loop exited"),
        Err(payload) => {
            emit_log(
                LogLevel::Error,
                &format!("render loop panicked: {}", panic_message(payload.as_ref())),
            );
            panic::resume_unwind(payload);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "render thread panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "render thread panicked");
    }
}
