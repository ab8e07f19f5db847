//! TUI colour palettes.
//!
//! Pure data consumed by the rendering layer. The text and window colours
//! come from the user's [`Theme`] as one linked pair; chrome (menu bar,
//! status bar, overlays) is derived from the same pair, inverted.

use ratatui::style::{Color, Modifier, Style};

use crate::settings::Theme;
use crate::tui::state::StatusLevel;

// ============================================================================
// FIXED STYLES
// ============================================================================

/// Keybinding hint in the status bar.
pub const STYLE_INTERACTIVE: Style = Style::new().fg(Color::Cyan);

/// Scrolling indicator.
pub const STYLE_SCROLLING: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Warning message.
pub const STYLE_WARNING: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Error message.
pub const STYLE_DANGER: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

// ============================================================================
// THEMED PALETTE
// ============================================================================

/// Every style the view needs for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Window and text: background and foreground of the reading area.
    pub text: Style,
    /// Menu bar and status bar.
    pub chrome: Style,
    /// Focused menu entry or dropdown item.
    pub selected: Style,
    /// Prompt and dropdown overlays.
    pub overlay: Style,
}

/// Background/foreground pair for a theme.
pub fn colors(theme: Theme) -> (Color, Color) {
    match theme {
        Theme::Light => (Color::White, Color::Black),
        Theme::Dark => (Color::Black, Color::White),
    }
}

pub fn palette(theme: Theme) -> Palette {
    let (bg, fg) = colors(theme);
    Palette {
        text: Style::new().bg(bg).fg(fg),
        chrome: Style::new().bg(fg).fg(bg),
        selected: Style::new()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        overlay: Style::new().bg(bg).fg(fg),
    }
}

/// Style for a status message, layered over the chrome style.
pub fn status_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => Style::new(),
        StatusLevel::Warning => STYLE_WARNING,
        StatusLevel::Error => STYLE_DANGER,
    }
}

// ============================================================================
// TESTS
// ============================================================================
