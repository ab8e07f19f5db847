//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui,
//! and executes effects against the display controller.
//!
//! Architecture: a key reader thread feeds an mpsc channel. The event loop
//! is the UI thread: it waits on the channel no longer than the scroll
//! timer allows, so auto-scroll steps run here too and the controller is
//! never touched from another thread.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use humansize::{BINARY, format_size};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{error, info, warn};

use crate::controller::{Change, ConfigLoad, Controller, expand_path};
use crate::error::AppError;

use super::state::{Action, App, AppEvent, Command, Effect, Mode, PromptKind, Transition};
use super::update::update;
use super::view::{render, text_area};

/// Files to open before the first frame.
#[derive(Debug, Default, Clone)]
pub struct Startup {
    /// Settings to load instead of the controller's settings path.
    pub config: Option<PathBuf>,
    /// Text file to show.
    pub text: Option<PathBuf>,
}

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// In text input mode printable keys become `Input`; otherwise they are
/// hotkeys. Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent, text_input: bool) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Enter => return Some(Action::Enter),
        KeyCode::Esc => return Some(Action::Back),
        KeyCode::F(10) => return Some(Action::OpenMenu),
        _ => {}
    }

    if text_input {
        return match key.code {
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) if !ctrl => Some(Action::Input(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('s') if ctrl => Some(Action::Command(Command::SaveSettings)),
        _ if ctrl => None,

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::Top),
        KeyCode::Char('m') => Some(Action::OpenMenu),

        // File
        KeyCode::Char('o') => Some(Action::Command(Command::OpenText)),
        KeyCode::Char('c') => Some(Action::Command(Command::OpenConfig)),
        KeyCode::Char('w') => Some(Action::Command(Command::SaveSettings)),
        KeyCode::Char('q') => Some(Action::Quit),

        // Settings
        KeyCode::Char('f') => Some(Action::Command(Command::Font)),
        KeyCode::Char('z') => Some(Action::Command(Command::FontSize)),
        KeyCode::Char('v') => Some(Action::Command(Command::ScrollSpeed)),
        KeyCode::Char('a') => Some(Action::Command(Command::Alignment)),
        KeyCode::Char('t') => Some(Action::Command(Command::ChangeTheme)),

        // Scrolling
        KeyCode::Char(' ') | KeyCode::Char('s') => Some(Action::Command(Command::ToggleScroll)),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREAD
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards keys and resizes.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let app_event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Resize(cols, rows)) => AppEvent::Resize(cols, rows),
                Ok(_) => continue, // ignore mouse, focus, key release
                Err(_) => break,
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Size the controller's viewport for a terminal of `cols` x `rows`.
fn resize(app: &mut App, cols: u16, rows: u16) {
    let area = text_area(Rect::new(0, 0, cols, rows));
    app.controller.resize(area.width, area.height);
}

/// Run the teleprompter until the user quits.
///
/// Sets up the terminal, applies the startup files, and runs the event
/// loop. The controller lives exactly as long as the window.
pub fn run(controller: Controller, startup: Startup) -> Result<(), AppError> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(controller);

    let size = terminal.size()?;
    resize(&mut app, size.width, size.height);
    apply_startup(&mut app, startup);

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_key_reader(tx);

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        if app.should_quit {
            break;
        }

        // Block on input, but never past the next scroll step
        let event = match app.controller.tick_timeout(Instant::now()) {
            Some(timeout) => match rx.recv_timeout(timeout) {
                Ok(e) => Some(e),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match rx.recv() {
                Ok(e) => Some(e),
                Err(_) => break, // key reader gone
            },
        };

        match event {
            Some(AppEvent::Key(key)) => {
                if let Some(action) = map_key(key, app.mode.is_text_input()) {
                    dispatch(&mut app, &action, Instant::now());
                }
            }
            Some(AppEvent::Resize(cols, rows)) => resize(&mut app, cols, rows),
            None => {}
        }

        app.controller.tick(Instant::now());
    }

    app.controller.shutdown();
    restore_terminal()?;
    info!("Window closed");
    Ok(())
}

/// Load the startup config and text, reporting problems in the status bar.
fn apply_startup(app: &mut App, startup: Startup) {
    match startup.config {
        Some(config) => open_config(app, config, ConfigSource::Chosen),
        None => {
            let config = app.controller.settings_path().to_path_buf();
            open_config(app, config, ConfigSource::Default);
        }
    }

    if let Some(text) = startup.text {
        open_text(app, text);
    }
}

/// Run one action through the pure update and execute what it asks for.
pub fn dispatch(app: &mut App, action: &Action, now: Instant) {
    // A message lasts until the next key
    app.status = None;

    let mode = std::mem::take(&mut app.mode);
    match update(mode, action, app.controller.settings()) {
        Transition::Mode(mode) => {
            app.mode = mode;
        }
        Transition::Quit => {
            app.should_quit = true;
        }
        Transition::Effect(effect) => {
            app.mode = Mode::Reading;
            handle_effect(effect, app, now);
        }
    }
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Execute a side effect requested by a pure transition.
fn handle_effect(effect: Effect, app: &mut App, now: Instant) {
    match effect {
        Effect::Submit { kind, value } => submit(kind, &value, app),
        Effect::SaveSettings => match app.controller.save_settings() {
            Ok(()) => {
                let path = app.controller.settings_path().display().to_string();
                app.info(format!("Settings saved to {path}"));
            }
            Err(e) => {
                error!(error = %e, "Saving settings failed");
                app.error(e.to_string());
            }
        },
        Effect::ToggleScroll => {
            if app.controller.toggle_scrolling(now) {
                app.info("Scrolling");
            } else {
                app.info("Paused");
            }
        }
        Effect::Scroll(rows) => app.controller.scroll_by(rows),
        Effect::ScrollPages(pages) => {
            let rows = app.controller.page_rows() as isize * pages;
            app.controller.scroll_by(rows);
        }
        Effect::ScrollTop => app.controller.scroll_to_top(),
    }
}

/// Apply a prompt answer to the controller.
fn submit(kind: PromptKind, value: &str, app: &mut App) {
    let value = value.trim();
    let result = match kind {
        PromptKind::OpenText => {
            open_text(app, expand_path(value));
            return;
        }
        PromptKind::OpenConfig => {
            open_config(app, expand_path(value), ConfigSource::Chosen);
            return;
        }
        PromptKind::Font => app.controller.change_font(value),
        // Non-numeric answers are a cancel, like an empty one
        PromptKind::FontSize => match value.parse::<u32>() {
            Ok(size) => app.controller.change_font_size(size),
            Err(_) => Ok(Change::Ignored),
        },
        PromptKind::ScrollSpeed => match value.parse::<u64>() {
            Ok(ms) => app.controller.change_scroll_speed(ms),
            Err(_) => Ok(Change::Ignored),
        },
        PromptKind::Alignment => app.controller.change_alignment(value),
        PromptKind::Theme => app.controller.change_theme(value),
    };

    match result {
        Ok(Change::Applied) => app.info(format!("{} set to {value}", kind.title())),
        Ok(Change::Ignored) => {}
        Err(e) => {
            warn!(error = %e, "Setting applied but not saved");
            app.warn(format!("{} set to {value}, but not saved: {e}", kind.title()));
        }
    }
}

fn open_text(app: &mut App, path: PathBuf) {
    match app.controller.load_text(&path) {
        Ok(summary) => app.info(format!(
            "Opened {} ({}, {} lines)",
            summary.path.display(),
            format_size(summary.bytes, BINARY),
            summary.lines
        )),
        Err(e) => {
            error!(error = %e, "Opening text failed");
            app.error(e.to_string());
        }
    }
}

/// Where a config path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    /// The settings file, which may not exist yet.
    Default,
    /// Named by the user, so it must exist.
    Chosen,
}

fn open_config(app: &mut App, path: PathBuf, source: ConfigSource) {
    match app.controller.load_config(&path) {
        Ok(ConfigLoad::Applied) => app.info(format!("Loaded settings from {}", path.display())),
        Ok(ConfigLoad::Absent) if source == ConfigSource::Default => {}
        Ok(ConfigLoad::Absent) => {
            warn!(path = %path.display(), "Config file not found");
            app.error(format!("Config file not found: {}", path.display()));
        }
        Err(e) if e.is_invalid_settings() => {
            app.warn(format!("{e}; keeping current settings"));
        }
        Err(e) => {
            error!(error = %e, "Opening config failed");
            app.error(e.to_string());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
