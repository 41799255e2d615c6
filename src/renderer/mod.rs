//! Inline render engine.
//!
//! [`Renderer`] owns a root [`Container`], an overlay stack and the terminal
//! dimensions. Each frame it renders the tree to lines, composites overlays,
//! keeps the last `height` rows, locates the cursor marker, diffs against the
//! previous frame and writes one synchronized escape script.
//!
//! # Examples
//!
//! ```no_run
//! use inline_tui::{Renderer, Text};
//! use std::sync::Arc;
//!
//! fn main() -> inline_tui::Result<()> {
//!     let renderer = Renderer::new(std::io::stdout());
//!     let status = Arc::new(Text::new("thinking..."));
//!     renderer.root().add(status.clone());
//!     renderer.set_size(80, 24);
//!     renderer.start()?;
//!
//!     status.set_content("done");
//!     renderer.request_render();
//!
//!     renderer.stop()
//! }
//! ```
//!
//! # Threading
//!
//! Any thread may call [`set_size`](Renderer::set_size),
//! [`push_overlay`](Renderer::push_overlay) or
//! [`request_render`](Renderer::request_render); none of them waits for a
//! frame. Frames are produced by one loop thread, see [`start`](Renderer::start).

mod cursor;
mod diff;
mod overlay;
mod threaded;

pub use cursor::{CURSOR_MARKER, extract_cursor_position};
pub use diff::RedrawKind;
pub use overlay::{Overlay, OverlayPosition, composite};

use crate::ansi::{ScriptWriter, sync};
use crate::buffer::{acquire_buffer, acquire_bytes};
use crate::component::{Component, Container, FocusTarget};
use crate::error::{Error, Result};
use crate::event::emit_event;
use crate::input::{is_key_release, split_keys};
use crate::terminal::Capabilities;
use diff::RenderState;
use std::io::Write;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Renderer configuration.
#[derive(Clone, Debug)]
pub struct RendererOptions {
    /// Wrap every frame in `CSI ?2026h` / `CSI ?2026l`.
    pub synchronized_output: bool,
    /// Keep only the last `height` rows of a taller frame.
    pub clamp_to_height: bool,
    /// Move the terminal cursor to the cursor marker. When off, a found
    /// marker is still stripped but the cursor stays hidden.
    pub hardware_cursor: bool,
    /// On the first [`Renderer::stop`], leave the cursor below the last
    /// rendered row and show it.
    pub place_cursor_on_stop: bool,
    /// Name of the render loop thread.
    pub thread_name: &'static str,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            synchronized_output: true,
            clamp_to_height: true,
            hardware_cursor: true,
            place_cursor_on_stop: true,
            thread_name: "inline-tui-render",
        }
    }
}

impl RendererOptions {
    /// Defaults, with synchronized output following the detected terminal.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            synchronized_output: Capabilities::detect().sync_output,
            ..Self::default()
        }
    }
}

/// Rendering statistics.
#[derive(Clone, Debug, Default)]
pub struct RenderStats {
    /// Frames rendered, including ones that wrote nothing.
    pub frames: u64,
    /// Frames emitted without diffing.
    pub full_redraws: u64,
    /// Bytes written for the last frame.
    pub last_frame_bytes: usize,
    /// Wall time of the last frame, render through flush.
    pub last_frame_time: Duration,
}

struct EngineState {
    width: usize,
    height: usize,
    prev: Vec<String>,
    overlays: Vec<Overlay>,
    render: RenderState,
    /// Bumped whenever the previous frame is discarded, so a frame that was
    /// in flight at the time does not store itself as the diff base.
    generation: u64,
    stats: RenderStats,
}

pub(crate) struct Shared {
    root: Arc<Container>,
    state: Mutex<EngineState>,
    output: Mutex<Box<dyn Write + Send>>,
    options: RendererOptions,
    focus: Mutex<Option<Arc<dyn FocusTarget>>>,
    /// Serializes whole frames between the loop and `render_once`.
    frame_lock: Mutex<()>,
    stopped: AtomicBool,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn render(&self) -> Result<()> {
        let _frame_guard = lock(&self.frame_lock);
        let started = Instant::now();

        let (width, height, mut prev, overlays, mut render, generation) = {
            let mut state = lock(&self.state);
            if state.width == 0 || state.height == 0 {
                return Ok(());
            }
            (
                state.width,
                state.height,
                mem::take(&mut state.prev),
                state.overlays.clone(),
                state.render.clone(),
                state.generation,
            )
        };

        let mut frame = acquire_buffer();
        self.root.render(&mut frame, width);

        let mut script = acquire_bytes();
        let (kind, clamped) = {
            let lines = frame.lines_mut();
            composite(lines, &overlays, width, height);

            let clamped = self.options.clamp_to_height && lines.len() > height;
            if clamped {
                lines.drain(..lines.len() - height);
            }

            let cursor = extract_cursor_position(lines).filter(|_| self.options.hardware_cursor);
            let kind = render.write_frame(&mut script, &prev, lines, width, clamped, cursor);
            (kind, clamped)
        };

        if let Err(err) = self.write_script(&script) {
            lock(&self.state).render.first_render = true;
            return Err(err);
        }

        frame.swap_lines(&mut prev);
        let rows = prev.len();
        let bytes = self.framed_len(script.len());
        {
            let mut state = lock(&self.state);
            if state.generation == generation {
                state.prev = prev;
            } else {
                render.first_render = true;
            }
            state.render = render;

            let stats = &mut state.stats;
            stats.frames += 1;
            if kind.is_full() {
                stats.full_redraws += 1;
            }
            stats.last_frame_bytes = bytes;
            stats.last_frame_time = started.elapsed();
        }

        if kind.is_full() {
            tracing::debug!(?kind, width, height, rows, "full redraw");
        }
        tracing::trace!(rows, bytes, clamped, "frame");
        if bytes > 0 {
            emit_event("frame", &bytes.to_string());
        }
        Ok(())
    }

    const fn framed_len(&self, script_len: usize) -> usize {
        if script_len == 0 {
            0
        } else if self.options.synchronized_output {
            script_len + sync::BEGIN.len() + sync::END.len()
        } else {
            script_len
        }
    }

    /// Write one frame's script in a single call, bracketed for synchronized
    /// output when enabled. An empty script writes nothing.
    fn write_script(&self, script: &[u8]) -> Result<()> {
        if script.is_empty() {
            return Ok(());
        }

        let mut framed = acquire_bytes();
        if self.options.synchronized_output {
            framed.extend_from_slice(sync::BEGIN.as_bytes());
            framed.extend_from_slice(script);
            framed.extend_from_slice(sync::END.as_bytes());
        } else {
            framed.extend_from_slice(script);
        }

        let mut out = lock(&self.output);
        out.write_all(&framed)?;
        out.flush()?;
        Ok(())
    }

    /// Leave the terminal cursor on a fresh line below the rendered block.
    fn release_cursor(&self) -> Result<()> {
        let _frame_guard = lock(&self.frame_lock);
        let mut bytes = acquire_bytes();
        {
            let state = lock(&self.state);
            let mut script = ScriptWriter::new(&mut bytes);
            if state.render.max_rendered > 0 {
                script.move_between(state.render.cursor_row, state.render.max_rendered - 1);
                script.newline();
            }
            script.cursor_visible(true);
        }
        let mut out = lock(&self.output);
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }
}

/// Inline, differential terminal renderer.
pub struct Renderer {
    shared: Arc<Shared>,
    requests: SyncSender<()>,
    /// Receiving end of the request queue until the loop takes it.
    pending: Mutex<Option<Receiver<()>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Renderer {
    /// Renderer writing to `writer` with default options.
    ///
    /// Nothing is drawn until [`set_size`](Self::set_size) provides non-zero
    /// dimensions.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::with_options(writer, RendererOptions::default())
    }

    pub fn with_options<W: Write + Send + 'static>(writer: W, options: RendererOptions) -> Self {
        let (requests, pending) = mpsc::sync_channel(1);
        let shared = Shared {
            root: Arc::new(Container::new()),
            state: Mutex::new(EngineState {
                width: 0,
                height: 0,
                prev: Vec::new(),
                overlays: Vec::new(),
                render: RenderState::new(),
                generation: 0,
                stats: RenderStats::default(),
            }),
            output: Mutex::new(Box::new(writer)),
            options,
            focus: Mutex::new(None),
            frame_lock: Mutex::new(()),
            stopped: AtomicBool::new(false),
        };
        Self {
            shared: Arc::new(shared),
            requests,
            pending: Mutex::new(Some(pending)),
            handle: Mutex::new(None),
        }
    }

    /// The root container. Its children are painted in insertion order.
    #[must_use]
    pub fn root(&self) -> &Arc<Container> {
        &self.shared.root
    }

    #[must_use]
    pub fn options(&self) -> &RendererOptions {
        &self.shared.options
    }

    /// Current `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        let state = lock(&self.shared.state);
        (state.width, state.height)
    }

    /// Set the terminal dimensions.
    ///
    /// Discards the previous frame so the next one is a full redraw,
    /// invalidates every component and schedules a render.
    pub fn set_size(&self, width: usize, height: usize) {
        let overlays = {
            let mut state = lock(&self.shared.state);
            state.width = width;
            state.height = height;
            state.prev.clear();
            state.render.first_render = true;
            state.generation = state.generation.wrapping_add(1);
            state.overlays.clone()
        };

        self.shared.root.invalidate();
        for overlay in &overlays {
            overlay.component.invalidate();
        }
        tracing::debug!(width, height, "terminal resized");
        self.request_render();
    }

    /// Push an overlay on top of the stack.
    pub fn push_overlay(&self, overlay: Overlay) {
        lock(&self.shared.state).overlays.push(overlay);
        self.request_render();
    }

    /// Remove the topmost overlay.
    pub fn pop_overlay(&self) -> Option<Overlay> {
        let popped = lock(&self.shared.state).overlays.pop();
        self.request_render();
        popped
    }

    #[must_use]
    pub fn overlay_count(&self) -> usize {
        lock(&self.shared.state).overlays.len()
    }

    /// Schedule a frame. Never blocks; requests made while one is already
    /// pending are merged into it.
    pub fn request_render(&self) {
        // Full means a frame is already queued; disconnected means stopped.
        let _ = self.requests.try_send(());
    }

    /// Spawn the render loop thread.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`] on a second call, [`Error::Stopped`] after
    /// [`stop`](Self::stop), or [`Error::Io`] if the thread cannot be spawned.
    pub fn start(&self) -> Result<()> {
        if self.shared.stopped.load(Ordering::Acquire) {
            return Err(Error::Stopped);
        }
        let requests = lock(&self.pending).take().ok_or(Error::AlreadyStarted)?;

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(self.shared.options.thread_name.to_string())
            .spawn(move || threaded::render_loop(&shared, &requests))?;
        *lock(&self.handle) = Some(handle);

        tracing::debug!(thread = self.shared.options.thread_name, "render loop started");
        self.request_render();
        Ok(())
    }

    /// Stop the render loop. Only the first call does anything.
    ///
    /// A frame already in progress completes; no new frame starts. With
    /// [`RendererOptions::place_cursor_on_stop`] the cursor is then left on
    /// a fresh line below the rendered block.
    ///
    /// # Errors
    ///
    /// [`Error::RenderThreadPanicked`] if the loop panicked, or
    /// [`Error::Io`] if the final cursor placement cannot be written.
    pub fn stop(&self) -> Result<()> {
        if self.shared.stopped.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        // Wake the loop so it observes the flag.
        let _ = self.requests.try_send(());

        let joined = match lock(&self.handle).take() {
            Some(handle) => handle.join().map_err(|_| Error::RenderThreadPanicked),
            None => Ok(()),
        };
        tracing::debug!("renderer stopped");

        if self.shared.options.place_cursor_on_stop {
            self.shared.release_cursor()?;
        }
        joined
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Render one frame on the calling thread. Does nothing once stopped.
    ///
    /// Must not race with a running loop; frames are serialized, but the
    /// loop does not expect outside writes between its frames.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if writing the frame fails.
    pub fn render_once(&self) -> Result<()> {
        if self.is_stopped() {
            return Ok(());
        }
        self.shared.render()
    }

    #[must_use]
    pub fn stats(&self) -> RenderStats {
        lock(&self.shared.state).stats.clone()
    }

    /// Move keyboard focus to `target`.
    pub fn set_focus(&self, target: Option<Arc<dyn FocusTarget>>) {
        let previous = mem::replace(&mut *lock(&self.shared.focus), target.clone());
        if let Some(previous) = previous {
            previous.set_focused(false);
        }
        if let Some(target) = target {
            target.set_focused(true);
        }
        self.request_render();
    }

    #[must_use]
    pub fn focused(&self) -> Option<Arc<dyn FocusTarget>> {
        lock(&self.shared.focus).clone()
    }

    /// Dispatch raw terminal input to the focused component.
    ///
    /// The chunk is split into individual keys. Kitty key releases are
    /// dropped unless the target asks for them.
    pub fn handle_input(&self, data: &[u8]) {
        let Some(target) = self.focused() else {
            return;
        };
        let wants_release = target.wants_key_release();

        let mut dispatched = false;
        for key in split_keys(data) {
            if !wants_release && is_key_release(key) {
                continue;
            }
            target.handle_input(key);
            dispatched = true;
        }
        if dispatched {
            self.request_render();
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::warn!(%err, "renderer shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RenderBuffer;
    use crate::component::{Focusable, Guarded, InputHandler, Text};
    use std::io;

    #[derive(Clone, Default)]
    struct SharedOutput(Arc<Mutex<Vec<u8>>>);

    impl SharedOutput {
        fn take(&self) -> String {
            let bytes = mem::take(&mut *self.0.lock().expect("output lock"));
            String::from_utf8(bytes).expect("utf8")
        }
    }

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("output lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Lines(Guarded<Vec<String>>);

    impl Lines {
        fn new(lines: &[&str]) -> Arc<Self> {
            let this = Arc::new(Self::default());
            this.set(lines);
            this
        }

        fn set(&self, lines: &[&str]) {
            self.0.replace(lines.iter().map(|s| (*s).to_string()).collect());
        }
    }

    impl Component for Lines {
        fn render(&self, buf: &mut RenderBuffer, _width: usize) {
            buf.extend(self.0.snapshot());
        }
    }

    #[derive(Default)]
    struct Input {
        keys: Guarded<Vec<Vec<u8>>>,
        focused: AtomicBool,
        releases: bool,
    }

    impl InputHandler for Input {
        fn handle_input(&self, data: &[u8]) {
            self.keys.update(|keys| keys.push(data.to_vec()));
        }

        fn wants_key_release(&self) -> bool {
            self.releases
        }
    }

    impl Focusable for Input {
        fn set_focused(&self, focused: bool) {
            self.focused.store(focused, Ordering::SeqCst);
        }

        fn is_focused(&self) -> bool {
            self.focused.load(Ordering::SeqCst)
        }
    }

    fn plain_options() -> RendererOptions {
        RendererOptions {
            synchronized_output: false,
            ..RendererOptions::default()
        }
    }

    fn renderer(options: RendererOptions) -> (Renderer, SharedOutput) {
        let out = SharedOutput::default();
        (Renderer::with_options(out.clone(), options), out)
    }

    #[test]
    fn test_no_output_without_size() {
        let (r, out) = renderer(plain_options());
        r.root().add(Lines::new(&["hello"]));
        r.render_once().expect("render");
        assert!(out.take().is_empty());
        assert_eq!(r.stats().frames, 0);
    }

    #[test]
    fn test_frame_is_synchronized() {
        let (r, out) = renderer(RendererOptions::default());
        r.root().add(Lines::new(&["hello"]));
        r.set_size(20, 5);
        r.render_once().expect("render");
        let written = out.take();
        assert!(written.starts_with(sync::BEGIN));
        assert!(written.ends_with(sync::END));
        assert!(written.contains("hello"));
        assert_eq!(r.stats().last_frame_bytes, written.len());
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let (r, out) = renderer(RendererOptions::default());
        r.root().add(Lines::new(&["a", "b"]));
        r.set_size(20, 5);
        r.render_once().expect("render");
        out.take();
        r.render_once().expect("render");
        assert!(out.take().is_empty());
        let stats = r.stats();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.last_frame_bytes, 0);
    }

    #[test]
    fn test_changed_line_is_diffed() {
        let (r, out) = renderer(plain_options());
        let lines = Lines::new(&["a", "b"]);
        r.root().add(lines.clone());
        r.set_size(20, 5);
        r.render_once().expect("render");
        out.take();

        lines.set(&["a", "c"]);
        r.render_once().expect("render");
        assert_eq!(out.take(), "\r\x1b[2Kc\x1b[?25l");
        assert_eq!(r.stats().full_redraws, 1);
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let (r, out) = renderer(plain_options());
        r.root().add(Lines::new(&["a"]));
        r.set_size(20, 5);
        r.render_once().expect("render");
        r.set_size(30, 5);
        out.take();
        r.render_once().expect("render");
        assert!(out.take().starts_with("\x1b[2J\x1b[H"));
        assert_eq!(r.stats().full_redraws, 2);
    }

    #[test]
    fn test_clamp_keeps_last_rows() {
        let (r, out) = renderer(plain_options());
        r.root().add(Lines::new(&["1", "2", "3", "4"]));
        r.set_size(20, 2);
        r.render_once().expect("render");
        assert_eq!(out.take(), "3\r\n4\x1b[?25l");
    }

    #[test]
    fn test_cursor_marker_places_cursor() {
        let (r, out) = renderer(plain_options());
        r.root().add(Lines::new(&[&format!("> ab{CURSOR_MARKER}"), "footer"]));
        r.set_size(20, 5);
        r.render_once().expect("render");
        assert_eq!(out.take(), "> ab\r\nfooter\x1b[1A\x1b[5G\x1b[?25h");
    }

    #[test]
    fn test_marker_stripped_without_hardware_cursor() {
        let options = RendererOptions {
            hardware_cursor: false,
            ..plain_options()
        };
        let (r, out) = renderer(options);
        r.root().add(Lines::new(&[&format!("x{CURSOR_MARKER}")]));
        r.set_size(20, 5);
        r.render_once().expect("render");
        assert_eq!(out.take(), "x\x1b[?25l");
    }

    #[test]
    fn test_overlay_push_and_pop() {
        let (r, out) = renderer(plain_options());
        r.root().add(Lines::new(&["base"]));
        r.set_size(20, 3);
        r.push_overlay(Overlay::new(Lines::new(&["popup"]), OverlayPosition::Bottom));
        assert_eq!(r.overlay_count(), 1);
        r.render_once().expect("render");
        assert_eq!(out.take(), "base\r\n\r\npopup\x1b[?25l");

        assert!(r.pop_overlay().is_some());
        r.render_once().expect("render");
        assert!(!out.take().contains("popup"));
    }

    #[test]
    fn test_request_render_coalesces() {
        let (r, _out) = renderer(plain_options());
        for _ in 0..5 {
            r.request_render();
        }
        let pending = r.pending.lock().expect("lock").take().expect("receiver");
        assert_eq!(pending.try_iter().count(), 1);
    }

    #[test]
    fn test_start_twice_fails() {
        let (r, _out) = renderer(plain_options());
        r.start().expect("start");
        assert!(matches!(r.start(), Err(Error::AlreadyStarted)));
        r.stop().expect("stop");
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (r, _out) = renderer(plain_options());
        r.start().expect("start");
        r.stop().expect("first stop");
        r.stop().expect("second stop");
        assert!(r.is_stopped());
        assert!(matches!(r.start(), Err(Error::Stopped)));
        r.render_once().expect("no-op");
    }

    #[test]
    fn test_loop_renders_requested_frames() {
        let (r, out) = renderer(plain_options());
        r.root().add(Lines::new(&["looped"]));
        r.set_size(20, 5);
        r.start().expect("start");

        let deadline = Instant::now() + Duration::from_secs(5);
        while r.stats().frames == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        r.stop().expect("stop");
        assert!(out.take().contains("looped"));
    }

    #[test]
    fn test_set_size_does_not_wait_for_rewrap() {
        let r = Renderer::with_options(io::sink(), plain_options());
        r.root()
            .add(Arc::new(Text::new("héllo wörld 漢字 ".repeat(200_000))));
        r.set_size(37, 24);
        r.start().expect("start");
        thread::sleep(Duration::from_millis(20));

        let started = Instant::now();
        r.set_size(80, 24);
        r.request_render();
        r.push_overlay(Overlay::new(Lines::new(&["popup"]), OverlayPosition::Top));
        let blocked = started.elapsed();

        r.stop().expect("stop");
        assert!(blocked < Duration::from_millis(10), "mutations blocked for {blocked:?}");
    }

    #[test]
    fn test_stop_leaves_cursor_below_block() {
        let (r, out) = renderer(plain_options());
        r.root().add(Lines::new(&[&format!("a{CURSOR_MARKER}"), "b"]));
        r.set_size(20, 5);
        r.render_once().expect("render");
        out.take();
        r.stop().expect("stop");
        assert_eq!(out.take(), "\x1b[1B\r\n\x1b[?25h");
    }

    #[test]
    fn test_focus_switch_updates_targets() {
        let (r, _out) = renderer(plain_options());
        let first = Arc::new(Input::default());
        let second = Arc::new(Input::default());
        r.set_focus(Some(first.clone()));
        assert!(first.is_focused());
        r.set_focus(Some(second.clone()));
        assert!(!first.is_focused());
        assert!(second.is_focused());
        r.set_focus(None);
        assert!(!second.is_focused());
        assert!(r.focused().is_none());
    }

    #[test]
    fn test_input_is_split_and_releases_dropped() {
        let (r, _out) = renderer(plain_options());
        let input = Arc::new(Input::default());
        r.set_focus(Some(input.clone()));
        r.handle_input(b"ab\x1b[A\x1b[97;1:3u");
        let keys = input.keys.snapshot();
        assert_eq!(keys, [b"a".to_vec(), b"b".to_vec(), b"\x1b[A".to_vec()]);
    }

    #[test]
    fn test_releases_delivered_on_request() {
        let (r, _out) = renderer(plain_options());
        let input = Arc::new(Input {
            releases: true,
            ..Input::default()
        });
        r.set_focus(Some(input.clone()));
        r.handle_input(b"\x1b[97;1:3u");
        assert_eq!(input.keys.snapshot().len(), 1);
    }

    #[test]
    fn test_options_detect_keeps_defaults() {
        let options = RendererOptions::detect();
        assert!(options.clamp_to_height);
        assert!(options.hardware_cursor);
        assert_eq!(options.thread_name, "inline-tui-render");
    }
}
