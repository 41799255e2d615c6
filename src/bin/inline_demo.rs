//! `inline_demo` - `inline-tui` demonstration binary
//!
//! A small chat-log UI rendered inline below the shell prompt: a transcript,
//! a prompt line with a hardware cursor, and a help overlay.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin inline_demo
//! cargo run --bin inline_demo -- --no-sync
//! cargo run --bin inline_demo -- --headless-smoke
//! ```
//!
//! Enter submits, Ctrl+O toggles help, Ctrl+L switches theme, Ctrl+C quits.

use inline_tui::terminal::{Capabilities, ColorSupport, Terminal, is_tty, terminal_size};
use inline_tui::unicode::{grapheme_width, graphemes};
use inline_tui::{
    CURSOR_MARKER, Component, Container, Focusable, Guarded, InputHandler, KeyCode, Overlay,
    OverlayPosition, PaddingBox, RenderBuffer, Renderer, RendererOptions, Rgb, Spacer, Style,
    Text, Theme, ThemeRole, ThemeSlot, parse_key, split_keys, visible_width,
};
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// ============================================================================
// CLI Parsing
// ============================================================================

const HELP_TEXT: &str = "inline_demo - inline-tui demonstration binary

USAGE:
    inline_demo [OPTIONS]

OPTIONS:
    -h, --help              Print this help message and exit
    --no-sync               Don't wrap frames in synchronized output
    --no-kitty              Don't negotiate the Kitty keyboard protocol
    --accent <#RRGGBB>      Accent colour for the prompt and help title
    --headless-smoke        Render a few frames into memory (no TTY required)
    --headless-size <WxH>   Size used by --headless-smoke (default: 80x24)
";

/// Application configuration parsed from command-line arguments.
#[derive(Clone, Debug)]
struct Config {
    sync: bool,
    kitty: bool,
    headless_smoke: bool,
    headless_size: (usize, usize),
    accent: Option<Rgb>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync: true,
            kitty: true,
            headless_smoke: false,
            headless_size: (80, 24),
            accent: None,
        }
    }
}

enum ParseResult {
    Config(Config),
    Help,
    Error(String),
}

impl Config {
    fn from_args(args: impl IntoIterator<Item = OsString>) -> ParseResult {
        let mut config = Self::default();
        let mut args = args.into_iter().skip(1);

        while let Some(arg) = args.next() {
            let Some(arg) = arg.to_str() else {
                return ParseResult::Error("arguments must be valid UTF-8".to_string());
            };
            match arg {
                "-h" | "--help" => return ParseResult::Help,
                "--no-sync" => config.sync = false,
                "--no-kitty" => config.kitty = false,
                "--headless-smoke" => config.headless_smoke = true,
                "--headless-size" => {
                    let value = args.next().and_then(|v| v.into_string().ok());
                    match value.as_deref().and_then(parse_size) {
                        Some(size) => config.headless_size = size,
                        None => {
                            return ParseResult::Error(
                                "--headless-size expects WxH, e.g. 80x24".to_string(),
                            );
                        }
                    }
                }
                "--accent" => {
                    let value = args.next().and_then(|v| v.into_string().ok());
                    match value.as_deref().and_then(Rgb::from_hex) {
                        Some(color) => config.accent = Some(color),
                        None => {
                            return ParseResult::Error(
                                "--accent expects a hex colour, e.g. #5fafff".to_string(),
                            );
                        }
                    }
                }
                other => return ParseResult::Error(format!("unknown option: {other}")),
            }
        }
        ParseResult::Config(config)
    }

    fn renderer_options(&self) -> RendererOptions {
        let detected = RendererOptions::detect();
        RendererOptions {
            synchronized_output: self.sync && detected.synchronized_output,
            ..detected
        }
    }
}

fn parse_size(s: &str) -> Option<(usize, usize)> {
    let (w, h) = s.split_once('x')?;
    let size = (w.parse().ok()?, h.parse().ok()?);
    (size.0 > 0 && size.1 > 0).then_some(size)
}

// ============================================================================
// Components
// ============================================================================

/// Presentation settings derived from the terminal's capabilities.
#[derive(Clone, Copy, Debug)]
struct Look {
    color: ColorSupport,
    prompt: &'static str,
    accent: Option<Rgb>,
}

impl Look {
    fn new(caps: &Capabilities, accent: Option<Rgb>) -> Self {
        Self {
            color: caps.color,
            prompt: if caps.unicode { "❯ " } else { "> " },
            accent,
        }
    }

    fn theme(&self, dark: bool) -> Theme {
        let base = if dark { Theme::dark() } else { Theme::light() };
        let base = match self.accent {
            Some(color) => base.with_style(ThemeRole::Accent, Style::fg(color).with_bold()),
            None => base,
        };
        base.with_color_support(self.color)
    }
}

#[derive(Default)]
struct PromptState {
    input: String,
    focused: bool,
}

/// Single-line prompt that appends submitted lines to the transcript.
struct Prompt {
    state: Guarded<PromptState>,
    transcript: Arc<Text>,
    theme: ThemeSlot,
    glyph: &'static str,
}

impl Prompt {
    fn new(transcript: Arc<Text>, theme: ThemeSlot, glyph: &'static str) -> Self {
        Self {
            state: Guarded::default(),
            transcript,
            theme,
            glyph,
        }
    }

    fn submit(&self) {
        let line = self.state.update(|s| std::mem::take(&mut s.input));
        if !line.trim().is_empty() {
            self.transcript.append(&format!("\n> {line}"));
        }
    }
}

impl Component for Prompt {
    fn render(&self, buf: &mut RenderBuffer, width: usize) {
        let (input, focused) = self.state.read(|s| (s.input.clone(), s.focused));
        let glyph_width = visible_width(self.glyph);
        if width < glyph_width + 1 {
            buf.push_blank(1);
            return;
        }

        // Keep the tail visible, leaving a column for the cursor.
        let budget = width - glyph_width - 1;
        let clusters: Vec<&str> = graphemes(&input).collect();
        let mut used = 0;
        let mut start = clusters.len();
        while start > 0 && used + grapheme_width(clusters[start - 1]) <= budget {
            start -= 1;
            used += grapheme_width(clusters[start]);
        }
        let visible: String = clusters[start..].concat();

        let theme = self.theme.current();
        let marker = if focused { CURSOR_MARKER } else { "" };
        buf.push_line(format!("{}{visible}{marker}", theme.paint(ThemeRole::Accent, self.glyph)));
    }
}

impl InputHandler for Prompt {
    fn handle_input(&self, data: &[u8]) {
        let Some(key) = parse_key(data) else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.state.update(|s| {
                s.input.pop();
            }),
            KeyCode::Char(c) if !key.ctrl() && !key.alt() => {
                self.state.update(|s| s.input.push(c));
            }
            _ => {}
        }
    }
}

impl Focusable for Prompt {
    fn set_focused(&self, focused: bool) {
        self.state.update(|s| s.focused = focused);
    }

    fn is_focused(&self) -> bool {
        self.state.read(|s| s.focused)
    }
}

/// Everything the demo puts on screen.
struct App {
    renderer: Renderer,
    look: Look,
    theme: ThemeSlot,
    transcript: Arc<Text>,
    prompt: Arc<Prompt>,
    help_open: AtomicBool,
}

impl App {
    fn new(renderer: Renderer, look: Look) -> Self {
        let theme = ThemeSlot::new(look.theme(true));
        let transcript = Arc::new(Text::new(
            "inline-tui demo. Enter submits, Ctrl+O help, Ctrl+L theme, Ctrl+C quits.",
        ));
        let prompt = Arc::new(Prompt::new(Arc::clone(&transcript), theme.clone(), look.prompt));
        let footer = Arc::new(Text::styled(
            "ctrl+o help | ctrl+l theme | ctrl+c quit",
            theme.clone(),
            ThemeRole::Muted,
        ));

        let root = renderer.root();
        root.add(transcript.clone());
        root.add(Arc::new(Spacer::new(1)));
        root.add(prompt.clone());
        root.add(footer);
        renderer.set_focus(Some(prompt.clone()));

        Self {
            renderer,
            look,
            theme,
            transcript,
            prompt,
            help_open: AtomicBool::new(false),
        }
    }

    fn toggle_help(&self) {
        if self.help_open.fetch_xor(true, Ordering::AcqRel) {
            self.renderer.pop_overlay();
            return;
        }
        let help = Container::new();
        help.add(Arc::new(Text::styled(
            "Help",
            self.theme.clone(),
            ThemeRole::Accent,
        )));
        help.add(Arc::new(Text::new(
            "Type and press Enter to add a line to the transcript.",
        )));
        let boxed = PaddingBox::new(Arc::new(help), 2, 1);
        let overlay = Overlay::new(Arc::new(boxed), OverlayPosition::Center).with_width(60);
        self.renderer.push_overlay(overlay);
    }

    fn toggle_theme(&self) {
        let dark = self.theme.current().name() != "dark";
        self.theme.replace(self.look.theme(dark));
        self.renderer.root().invalidate();
        self.renderer.request_render();
    }

    /// Handle one chunk of terminal input. Returns false when the user quits.
    fn handle_input(&self, data: &[u8]) -> bool {
        for chunk in split_keys(data) {
            match parse_key(chunk).map(|key| key.code) {
                Some(KeyCode::CtrlC | KeyCode::CtrlD) => return false,
                Some(KeyCode::CtrlO) => self.toggle_help(),
                Some(KeyCode::CtrlL) => self.toggle_theme(),
                _ => self.renderer.handle_input(chunk),
            }
        }
        true
    }
}

// ============================================================================
// Headless Smoke Test
// ============================================================================

#[derive(Clone, Default)]
struct MemorySink(Arc<Mutex<Vec<u8>>>);

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("sink poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn run_headless_smoke(config: &Config) -> inline_tui::Result<()> {
    let (width, height) = config.headless_size;
    eprintln!("Running headless smoke test ({width}x{height})...");

    let sink = MemorySink::default();
    let look = Look::new(&Capabilities::default(), config.accent);
    let app = App::new(
        Renderer::with_options(sink.clone(), config.renderer_options()),
        look,
    );
    app.renderer.set_size(width, height);
    app.renderer.render_once()?;

    app.handle_input(b"hello\r");
    app.renderer.render_once()?;
    app.toggle_help();
    app.renderer.render_once()?;
    app.toggle_theme();
    app.renderer.render_once()?;
    app.renderer.stop()?;

    let stats = app.renderer.stats();
    let bytes = sink.0.lock().map(|out| out.len()).unwrap_or_default();
    eprintln!(
        "frames={} full_redraws={} bytes={bytes} transcript_version={}",
        stats.frames,
        stats.full_redraws,
        app.transcript.version()
    );
    eprintln!("prompt focused: {}", app.prompt.is_focused());
    eprintln!("Headless smoke test passed.");
    Ok(())
}

// ============================================================================
// Interactive Mode
// ============================================================================

fn run_interactive(config: &Config) -> inline_tui::Result<()> {
    if !is_tty(&io::stdout()) || !is_tty(&io::stdin()) {
        eprintln!("Error: inline_demo requires an interactive terminal.");
        eprintln!("For non-interactive use, try: inline_demo --headless-smoke");
        std::process::exit(1);
    }

    let caps = Capabilities::detect();
    let look = Look::new(&caps, config.accent);
    let mut terminal = Terminal::with_capabilities(io::stdout(), caps);
    terminal.enter_raw_mode()?;
    terminal.enable_bracketed_paste()?;
    if config.kitty {
        terminal.enable_kitty_keyboard(false)?;
    }

    let app = Arc::new(App::new(
        Renderer::with_options(io::stdout(), config.renderer_options()),
        look,
    ));
    let (width, height) = terminal_size().unwrap_or((80, 24));
    app.renderer.set_size(usize::from(width), usize::from(height));
    app.renderer.start()?;

    let quit = Arc::new(AtomicBool::new(false));
    let resize = {
        let app = Arc::clone(&app);
        let quit = Arc::clone(&quit);
        thread::spawn(move || {
            let mut last = (width, height);
            while !quit.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(200));
                if let Ok(size) = terminal_size() {
                    if size != last {
                        last = size;
                        app.renderer.set_size(usize::from(size.0), usize::from(size.1));
                    }
                }
            }
        })
    };

    let mut stdin = io::stdin();
    let mut input_buf = [0u8; 256];
    loop {
        let n = stdin.read(&mut input_buf)?;
        if n == 0 || !app.handle_input(&input_buf[..n]) {
            break;
        }
    }

    quit.store(true, Ordering::Release);
    let _ = resize.join();
    app.renderer.stop()?;
    terminal.cleanup()?;
    Ok(())
}

fn main() -> inline_tui::Result<()> {
    match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => {
            if config.headless_smoke {
                run_headless_smoke(&config)
            } else {
                run_interactive(&config)
            }
        }
        ParseResult::Help => {
            print!("{HELP_TEXT}");
            Ok(())
        }
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    }
}
