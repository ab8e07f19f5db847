//! The persisted display settings record.
//!
//! Structure:
//! - Enums: theme and alignment with lenient user-input parsing
//! - Settings: the five-field record, validation, JSON load/save
//!
//! Loading distinguishes three outcomes explicitly: the file is absent
//! (`Ok(None)`, ignorable), present and valid (`Ok(Some)`), or present but
//! unusable (`Err`, the caller warns and keeps what it has).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings filename used when no path is given.
pub const DEFAULT_SETTINGS_FILENAME: &str = "settings.json";

pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_FONT_SIZE: u32 = 20;
pub const DEFAULT_SCROLL_SPEED_MS: u64 = 100;

/// Default settings location: `settings.json` in the working directory.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_FILENAME)
}

// ============================================================================
// ENUMS
// ============================================================================

/// Colour theme. Background and foreground always switch together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Black text on white.
    #[default]
    Light,
    /// White text on black.
    Dark,
}

impl Theme {
    /// Parse user input, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Paragraph justification of the displayed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Right,
    Center,
}

impl TextAlignment {
    /// Parse user input, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlignment::Left),
            "right" => Some(TextAlignment::Right),
            "center" => Some(TextAlignment::Center),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Right => "right",
            TextAlignment::Center => "center",
        }
    }
}

// ============================================================================
// SETTINGS RECORD
// ============================================================================

/// Display preferences persisted between sessions.
///
/// Field names are the on-disk JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Typeface name.
    pub font: String,
    /// Point size; also scales the reading column width.
    pub font_size: u32,
    /// Delay between scroll steps, in milliseconds.
    pub scroll_speed: u64,
    pub theme: Theme,
    pub alignment: TextAlignment,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            scroll_speed: DEFAULT_SCROLL_SPEED_MS,
            theme: Theme::default(),
            alignment: TextAlignment::default(),
        }
    }
}

impl Settings {
    /// Check the invariants serde cannot express.
    ///
    /// Returns the reason for the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.font.trim().is_empty() {
            return Err("font must not be empty".to_string());
        }
        if self.font_size == 0 {
            return Err("font_size must be positive".to_string());
        }
        if self.scroll_speed == 0 {
            return Err("scroll_speed must be positive".to_string());
        }
        Ok(())
    }

    /// Load settings from disk.
    ///
    /// # Returns
    /// * `Ok(None)` - No file at `path`
    /// * `Ok(Some(settings))` - File parsed and validated
    /// * `Err(AppError)` - File unreadable, malformed, or out of range
    pub fn load(path: &Path) -> Result<Option<Self>, AppError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::io(path, e)),
        };

        let settings: Settings =
            serde_json::from_str(&contents).map_err(|source| AppError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;

        settings
            .validate()
            .map_err(|reason| AppError::invalid_settings(path, reason))?;

        Ok(Some(settings))
    }

    /// Serialize to the on-disk JSON form.
    pub fn to_json(&self) -> Result<String, AppError> {
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');
        Ok(contents)
    }

    /// Write settings to disk, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let contents = self.to_json()?;
        fs::write(path, contents).map_err(|e| AppError::write(path, e))
    }
}

// ============================================================================
// TESTS
// ============================================================================
