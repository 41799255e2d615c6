//! Wrapped text and blank-line components.

use crate::buffer::RenderBuffer;
use crate::component::{Component, Guarded};
use crate::theme::{ThemeRole, ThemeSlot};
use crate::unicode::wrap_text_with_ansi;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Default)]
struct TextState {
    content: Arc<str>,
    version: u64,
}

struct WrapCache {
    width: usize,
    version: u64,
    epoch: u64,
    lines: Arc<[String]>,
}

/// A block of text wrapped to the render width.
///
/// Content may carry SGR sequences; styles survive line breaks. Wrapped
/// lines are cached per width, content version and invalidation epoch. The
/// wrap runs on the render thread with no lock held, so
/// [`set_content`](Self::set_content), [`append`](Self::append) and
/// [`invalidate`](Component::invalidate) never wait on it.
pub struct Text {
    state: Guarded<TextState>,
    cache: Mutex<Option<WrapCache>>,
    epoch: AtomicU64,
    styling: Option<(ThemeSlot, ThemeRole)>,
}

impl Text {
    /// Unstyled text.
    pub fn new(content: impl Into<Arc<str>>) -> Self {
        Self {
            state: Guarded::new(TextState {
                content: content.into(),
                version: 0,
            }),
            cache: Mutex::new(None),
            epoch: AtomicU64::new(0),
            styling: None,
        }
    }

    /// Text painted with `role` from whatever theme `slot` holds at render time.
    pub fn styled(content: impl Into<Arc<str>>, slot: ThemeSlot, role: ThemeRole) -> Self {
        Self {
            styling: Some((slot, role)),
            ..Self::new(content)
        }
    }

    /// Replace the content.
    pub fn set_content(&self, content: impl Into<Arc<str>>) {
        let content = content.into();
        self.state.update(|state| {
            state.content = content;
            state.version += 1;
        });
    }

    /// Append to the content, e.g. a streamed chunk.
    pub fn append(&self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        self.state.update(|state| {
            let mut joined = String::with_capacity(state.content.len() + chunk.len());
            joined.push_str(&state.content);
            joined.push_str(chunk);
            state.content = joined.into();
            state.version += 1;
        });
    }

    /// Current content.
    #[must_use]
    pub fn content(&self) -> Arc<str> {
        self.state.read(|state| Arc::clone(&state.content))
    }

    /// Incremented on every change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.read(|state| state.version)
    }

    fn cache_slot(&self) -> std::sync::MutexGuard<'_, Option<WrapCache>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_lines(&self, width: usize, version: u64, epoch: u64) -> Option<Arc<[String]>> {
        self.cache_slot()
            .as_ref()
            .filter(|hit| hit.width == width && hit.version == version && hit.epoch == epoch)
            .map(|hit| Arc::clone(&hit.lines))
    }
}

impl Component for Text {
    fn render(&self, buf: &mut RenderBuffer, width: usize) {
        let TextState { content, version } = self.state.snapshot();
        if content.is_empty() || width == 0 {
            return;
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        let lines = self.cached_lines(width, version, epoch).unwrap_or_else(|| {
            tracing::trace!(width, version, "rewrapping text");
            let lines: Arc<[String]> = wrap_text_with_ansi(&content, width).into();
            *self.cache_slot() = Some(WrapCache {
                width,
                version,
                epoch,
                lines: Arc::clone(&lines),
            });
            lines
        });

        match &self.styling {
            Some((theme_slot, role)) => {
                let theme = theme_slot.current();
                buf.extend(lines.iter().map(|line| theme.paint(*role, line)));
            }
            None => buf.extend(lines.iter().cloned()),
        }
    }

    fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

/// A fixed number of empty lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct Spacer {
    lines: usize,
}

impl Spacer {
    #[must_use]
    pub const fn new(lines: usize) -> Self {
        Self { lines }
    }
}

impl Component for Spacer {
    fn render(&self, buf: &mut RenderBuffer, _width: usize) {
        buf.push_blank(self.lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use crate::unicode::visible_width;

    fn render(component: &dyn Component, width: usize) -> Vec<String> {
        let mut buf = RenderBuffer::new();
        component.render(&mut buf, width);
        buf.lines().to_vec()
    }

    #[test]
    fn test_text_wraps_to_width() {
        let text = Text::new("hello world");
        let lines = render(&text, 5);
        assert_eq!(lines, ["hello", " worl", "d"]);
        assert!(lines.iter().all(|l| visible_width(l) <= 5));
    }

    #[test]
    fn test_empty_text_renders_nothing() {
        assert!(render(&Text::new(""), 10).is_empty());
        assert!(render(&Text::new("x"), 0).is_empty());
    }

    #[test]
    fn test_append_and_version() {
        let text = Text::new("ab");
        assert_eq!(text.version(), 0);
        text.append("cd");
        text.append("");
        assert_eq!(&*text.content(), "abcd");
        assert_eq!(text.version(), 1);
        assert_eq!(render(&text, 10), ["abcd"]);
        text.set_content("new");
        assert_eq!(render(&text, 10), ["new"]);
    }

    #[test]
    fn test_cache_tracks_width() {
        let text = Text::new("abcdef");
        assert_eq!(render(&text, 3), ["abc", "def"]);
        assert_eq!(render(&text, 3), ["abc", "def"]);
        assert_eq!(render(&text, 6), ["abcdef"]);
        text.invalidate();
        assert_eq!(render(&text, 2), ["ab", "cd", "ef"]);
    }

    #[test]
    fn test_invalidate_does_not_wait_for_rewrap() {
        use std::time::{Duration, Instant};

        let text = Arc::new(Text::new("héllo wörld 漢字 ".repeat(200_000)));
        let worker = {
            let text = Arc::clone(&text);
            std::thread::spawn(move || render(&*text, 37).len())
        };
        std::thread::sleep(Duration::from_millis(20));

        let started = Instant::now();
        text.invalidate();
        let blocked = started.elapsed();

        assert!(worker.join().expect("render thread") > 0);
        assert!(blocked < Duration::from_millis(5), "invalidate blocked for {blocked:?}");
    }

    #[test]
    fn test_invalidate_discards_cached_wrap() {
        let text = Text::new("abcdef");
        assert_eq!(render(&text, 3), ["abc", "def"]);
        let before = text.cached_lines(3, 0, 0).expect("cached");
        text.invalidate();
        assert!(text.cached_lines(3, 0, 0).is_some());
        assert!(text.cached_lines(3, 0, 1).is_none());
        assert_eq!(render(&text, 3), ["abc", "def"]);
        let after = text.cached_lines(3, 0, 1).expect("rewrapped");
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_styled_text_follows_theme_slot() {
        let slot = ThemeSlot::new(Theme::plain("plain"));
        let text = Text::styled("hi", slot.clone(), ThemeRole::Error);
        assert_eq!(render(&text, 10), ["hi"]);

        slot.replace(Theme::dark());
        let lines = render(&text, 10);
        assert!(lines[0].starts_with("\x1b["));
        assert!(lines[0].ends_with("\x1b[0m"));
        assert_eq!(visible_width(&lines[0]), 2);
    }

    #[test]
    fn test_spacer() {
        assert_eq!(render(&Spacer::new(2), 10), ["", ""]);
        assert!(render(&Spacer::default(), 10).is_empty());
    }
}
