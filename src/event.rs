//! Host hooks for engine logs and events.
//!
//! A host can observe the engine by installing callbacks. Every log line is
//! also forwarded to `tracing`, so a subscriber sees it without a callback.
//! Events are name/payload pairs; the renderer emits `"frame"` with the byte
//! count of each script it writes.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Severity passed to the log hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

type EventCallback = Box<dyn Fn(&str, &str) + Send + Sync + 'static>;
type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

/// One replaceable callback slot.
struct Hook<F: ?Sized>(OnceLock<Mutex<Option<Box<F>>>>);

impl<F: ?Sized> Hook<F> {
    const fn new() -> Self {
        Self(OnceLock::new())
    }

    fn slot(&self) -> MutexGuard<'_, Option<Box<F>>> {
        self.0
            .get_or_init(|| Mutex::new(None))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

static EVENT_HOOK: Hook<dyn Fn(&str, &str) + Send + Sync> = Hook::new();
static LOG_HOOK: Hook<dyn Fn(LogLevel, &str) + Send + Sync> = Hook::new();

/// Install the event callback, replacing any previous one.
pub fn set_event_callback<F>(callback: F)
where
    F: Fn(&str, &str) + Send + Sync + 'static,
{
    let callback: EventCallback = Box::new(callback);
    *EVENT_HOOK.slot() = Some(callback);
}

/// Remove the event callback.
pub fn clear_event_callback() {
    EVENT_HOOK.slot().take();
}

/// Emit an event to the installed callback, if any.
pub fn emit_event(name: &str, data: &str) {
    if let Some(callback) = EVENT_HOOK.slot().as_ref() {
        callback(name, data);
    }
}

/// Install the log callback, replacing any previous one.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    let callback: LogCallback = Box::new(callback);
    *LOG_HOOK.slot() = Some(callback);
}

/// Remove the log callback.
pub fn clear_log_callback() {
    LOG_HOOK.slot().take();
}

/// Log through `tracing` and the installed callback.
pub fn emit_log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "inline_tui", "{message}"),
        LogLevel::Info => tracing::info!(target: "inline_tui", "{message}"),
        LogLevel::Warn => tracing::warn!(target: "inline_tui", "{message}"),
        LogLevel::Error => tracing::error!(target: "inline_tui", "{message}"),
    }
    if let Some(callback) = LOG_HOOK.slot().as_ref() {
        callback(level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Both hooks are process-wide; one test owns them to avoid cross-talk.
    #[test]
    fn test_hooks_receive_and_clear() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let events = Arc::clone(&seen);
        set_event_callback(move |name, data| {
            if name == "hook-test" {
                events.lock().unwrap().push(format!("event {data}"));
            }
        });
        let logs = Arc::clone(&seen);
        set_log_callback(move |level, msg| {
            if msg.starts_with("hook-test") {
                logs.lock().unwrap().push(format!("{level:?} {msg}"));
            }
        });

        emit_event("hook-test", "42");
        emit_log(LogLevel::Warn, "hook-test warn");
        clear_event_callback();
        clear_log_callback();
        emit_event("hook-test", "dropped");
        emit_log(LogLevel::Info, "hook-test dropped");

        assert_eq!(*seen.lock().unwrap(), ["event 42", "Warn hook-test warn"]);
    }

    #[test]
    fn test_levels_order_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
