//! TUI state algebra: pure types, zero effects.
//!
//! Design principle: `Mode` carries only transient interaction state
//! (which menu is open, what has been typed into a prompt). Everything
//! that persists or is shown (settings, text, viewport) lives in the
//! [`Controller`] owned by [`App`].

use crossterm::event::KeyEvent;

use crate::controller::Controller;
use crate::settings::Settings;

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// The key reader thread is the only producer. Scroll steps are not
/// events: the loop wakes itself when the scroll timer is due.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key press.
    Key(KeyEvent),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    /// The display controller: settings, text, viewport, scroll state.
    pub controller: Controller,

    /// Current interaction mode.
    pub mode: Mode,

    /// Last message for the status bar.
    pub status: Option<Status>,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

/// Severity of a status bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

// ============================================================================
// MODES
// ============================================================================

/// What keys currently mean.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Reading the text; hotkeys and manual scrolling are live.
    #[default]
    Reading,

    /// Menu bar has focus.
    Menu {
        /// Index into [`MENU_BAR`].
        selected: usize,
        /// Highlighted item in the open dropdown, `None` when closed.
        item: Option<usize>,
    },

    /// Modal text prompt.
    Prompt(Prompt),
}

/// A modal prompt: what is being asked and what has been typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// The questions the app can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OpenText,
    OpenConfig,
    Font,
    FontSize,
    ScrollSpeed,
    Alignment,
    Theme,
}

// ============================================================================
// MENU
// ============================================================================

/// Commands reachable from the menu bar and hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenText,
    OpenConfig,
    SaveSettings,
    Exit,
    Font,
    FontSize,
    ScrollSpeed,
    Alignment,
    ChangeTheme,
    ToggleScroll,
}

/// A top-level menu bar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    /// Opens a dropdown of commands.
    Cascade {
        label: &'static str,
        items: &'static [(&'static str, Command)],
    },
    /// Runs a command directly.
    Command {
        label: &'static str,
        command: Command,
    },
}

impl MenuEntry {
    pub fn label(&self) -> &'static str {
        match self {
            MenuEntry::Cascade { label, .. } | MenuEntry::Command { label, .. } => *label,
        }
    }

    /// Dropdown items; empty for direct commands.
    pub fn items(&self) -> &'static [(&'static str, Command)] {
        match self {
            MenuEntry::Cascade { items, .. } => *items,
            MenuEntry::Command { .. } => &[],
        }
    }
}

pub const FILE_MENU: &[(&str, Command)] = &[
    ("Open text file", Command::OpenText),
    ("Open config file", Command::OpenConfig),
    ("Save settings", Command::SaveSettings),
    ("Exit", Command::Exit),
];

pub const SETTINGS_MENU: &[(&str, Command)] = &[
    ("Font", Command::Font),
    ("Font Size", Command::FontSize),
    ("Scroll Speed", Command::ScrollSpeed),
    ("Alignment", Command::Alignment),
];

pub const MENU_BAR: &[MenuEntry] = &[
    MenuEntry::Cascade {
        label: "File",
        items: FILE_MENU,
    },
    MenuEntry::Cascade {
        label: "Settings",
        items: SETTINGS_MENU,
    },
    MenuEntry::Command {
        label: "Change Theme",
        command: Command::ChangeTheme,
    },
    MenuEntry::Command {
        label: "Start/Stop",
        command: Command::ToggleScroll,
    },
];

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Top,
    Enter,
    Back,
    /// Give the menu bar focus.
    OpenMenu,
    /// A hotkey bound directly to a command.
    Command(Command),
    /// A character typed into a prompt.
    Input(char),
    Backspace,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// Pure code describes WHAT should happen; the effects boundary in
/// `run` decides HOW.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Switch to (or stay in) this mode.
    Mode(Mode),
    /// Quit the application.
    Quit,
    /// Execute a side effect, then return to reading.
    Effect(Effect),
}

/// Side effect requested by a pure transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A prompt was answered.
    Submit { kind: PromptKind, value: String },
    SaveSettings,
    ToggleScroll,
    /// Move the viewport by this many rows.
    Scroll(isize),
    /// Move the viewport by this many pages.
    ScrollPages(isize),
    ScrollTop,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    pub fn new(controller: Controller) -> Self {
        App {
            controller,
            mode: Mode::Reading,
            status: None,
            should_quit: false,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_status(StatusLevel::Info, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.set_status(StatusLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_status(StatusLevel::Error, text);
    }

    fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(Status {
            level,
            text: text.into(),
        });
    }
}

impl Mode {
    /// Menu bar focused on the first entry, dropdown closed.
    pub fn menu() -> Self {
        Mode::Menu {
            selected: 0,
            item: None,
        }
    }

    /// Whether keys should be read as text.
    pub fn is_text_input(&self) -> bool {
        matches!(self, Mode::Prompt(_))
    }
}

impl Prompt {
    /// A prompt pre-filled with the current value of what it changes.
    pub fn seeded(kind: PromptKind, settings: &Settings) -> Self {
        Prompt {
            kind,
            input: kind.seed(settings),
        }
    }
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::OpenText => "Open",
            PromptKind::OpenConfig => "Open Config",
            PromptKind::Font => "Font",
            PromptKind::FontSize => "Font Size",
            PromptKind::ScrollSpeed => "Scroll Speed",
            PromptKind::Alignment => "Alignment",
            PromptKind::Theme => "Theme",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::OpenText => "Path to text file:",
            PromptKind::OpenConfig => "Path to config file (.json):",
            PromptKind::Font => "Enter font name:",
            PromptKind::FontSize => "Enter font size:",
            PromptKind::ScrollSpeed => "Enter scroll speed (ms):",
            PromptKind::Alignment => "Enter alignment (left/right/center):",
            PromptKind::Theme => "Enter theme (light/dark):",
        }
    }

    /// Current value shown when the prompt opens.
    pub fn seed(&self, settings: &Settings) -> String {
        match self {
            PromptKind::OpenText | PromptKind::OpenConfig => String::new(),
            PromptKind::Font => settings.font.clone(),
            PromptKind::FontSize => settings.font_size.to_string(),
            PromptKind::ScrollSpeed => settings.scroll_speed.to_string(),
            PromptKind::Alignment => settings.alignment.as_str().to_string(),
            PromptKind::Theme => settings.theme.as_str().to_string(),
        }
    }
}

impl Command {
    /// The prompt this command opens, if it asks for a value.
    pub fn prompt(&self) -> Option<PromptKind> {
        match self {
            Command::OpenText => Some(PromptKind::OpenText),
            Command::OpenConfig => Some(PromptKind::OpenConfig),
            Command::Font => Some(PromptKind::Font),
            Command::FontSize => Some(PromptKind::FontSize),
            Command::ScrollSpeed => Some(PromptKind::ScrollSpeed),
            Command::Alignment => Some(PromptKind::Alignment),
            Command::ChangeTheme => Some(PromptKind::Theme),
            Command::SaveSettings | Command::Exit | Command::ToggleScroll => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
