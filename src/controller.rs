//! Display controller: the single owner of everything on screen.
//!
//! Holds the text buffer, the live settings, the viewport and the scroll
//! timer. Every user command ends up as one method call here. The TUI
//! layer reads from it to render and never mutates it directly.
//!
//! Each successful settings change is persisted to the settings path
//! immediately. A failed write leaves the change applied in memory and is
//! reported to the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::scroll::{SCROLL_STEP_ROWS, ScrollTimer};
use crate::settings::{Settings, TextAlignment, Theme};
use crate::wrap::{column_width, wrap_text};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Outcome of a user-requested settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The value was accepted and is now in effect.
    Applied,
    /// The input was empty or invalid; nothing changed.
    Ignored,
}

/// Outcome of loading a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLoad {
    /// All five fields were applied.
    Applied,
    /// No file at the path; current settings kept.
    Absent,
}

/// What was loaded into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSummary {
    pub path: PathBuf,
    pub bytes: u64,
    pub lines: usize,
}

/// The text buffer and where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub path: Option<PathBuf>,
    pub text: String,
}

// ============================================================================
// CONTROLLER
// ============================================================================

#[derive(Debug)]
pub struct Controller {
    settings: Settings,
    settings_path: PathBuf,
    document: Document,
    /// Wrapped rows of the document at the current column width.
    rows: Vec<String>,
    /// Index of the first visible row.
    offset: usize,
    /// Text area size in cells: (width, height).
    area: (u16, u16),
    timer: ScrollTimer,
}

impl Controller {
    /// Create a controller with default settings that persists to `settings_path`.
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings: Settings::default(),
            settings_path: settings_path.into(),
            document: Document::default(),
            rows: Vec::new(),
            offset: 0,
            area: (0, 0),
            timer: ScrollTimer::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.timer.is_running()
    }

    /// Rows currently inside the viewport.
    pub fn visible_rows(&self) -> &[String] {
        let start = self.offset.min(self.rows.len());
        let end = (start + self.area.1 as usize).min(self.rows.len());
        &self.rows[start..end]
    }

    /// Width of the reading column for the current area and font size.
    pub fn column_width(&self) -> u16 {
        column_width(self.area.0, self.settings.font_size)
    }

    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self) -> usize {
        self.rows.len().saturating_sub(self.area.1 as usize)
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// Record the text area size and rewrap if the width changed.
    pub fn resize(&mut self, width: u16, height: u16) {
        let width_changed = width != self.area.0;
        self.area = (width, height);
        if width_changed {
            self.relayout();
        } else {
            self.clamp_offset();
        }
    }

    fn relayout(&mut self) {
        let width = self.column_width();
        self.rows = if width == 0 {
            self.document.text.lines().map(str::to_string).collect()
        } else {
            wrap_text(&self.document.text, width as usize)
        };
        self.clamp_offset();
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    // ------------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------------

    /// Replace the buffer with the contents of `path` and return to the top.
    pub fn load_text(&mut self, path: &Path) -> Result<TextSummary, AppError> {
        let text = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let summary = TextSummary {
            path: path.to_path_buf(),
            bytes: text.len() as u64,
            lines: text.lines().count(),
        };

        self.document = Document {
            path: Some(path.to_path_buf()),
            text,
        };
        self.offset = 0;
        self.relayout();

        info!(
            path = %path.display(),
            bytes = summary.bytes,
            lines = summary.lines,
            "Loaded text"
        );
        Ok(summary)
    }

    /// Load a settings file and apply every field.
    ///
    /// An absent file keeps the current settings. A malformed one returns
    /// an error and also keeps them, so the caller only has to warn.
    pub fn load_config(&mut self, path: &Path) -> Result<ConfigLoad, AppError> {
        match Settings::load(path) {
            Ok(Some(settings)) => {
                info!(path = %path.display(), ?settings, "Applied settings");
                self.apply(settings);
                Ok(ConfigLoad::Applied)
            }
            Ok(None) => {
                debug!(path = %path.display(), "No settings file, keeping current settings");
                Ok(ConfigLoad::Absent)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unusable settings file");
                Err(e)
            }
        }
    }

    /// Save the live settings to the default settings path.
    pub fn save_settings(&self) -> Result<(), AppError> {
        self.save_settings_to(&self.settings_path)
    }

    pub fn save_settings_to(&self, path: &Path) -> Result<(), AppError> {
        self.settings.save(path)?;
        debug!(path = %path.display(), "Saved settings");
        Ok(())
    }

    fn apply(&mut self, settings: Settings) {
        let rewrap = settings.font_size != self.settings.font_size;
        self.settings = settings;
        if rewrap {
            self.relayout();
        }
    }

    /// Apply a changed record and persist it.
    fn commit(&mut self, settings: Settings) -> Result<Change, AppError> {
        self.apply(settings);
        self.save_settings()?;
        Ok(Change::Applied)
    }

    // ------------------------------------------------------------------------
    // Settings changes
    // ------------------------------------------------------------------------

    pub fn change_font(&mut self, name: &str) -> Result<Change, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Change::Ignored);
        }
        let settings = Settings {
            font: name.to_string(),
            ..self.settings.clone()
        };
        self.commit(settings)
    }

    pub fn change_font_size(&mut self, size: u32) -> Result<Change, AppError> {
        if size == 0 {
            return Ok(Change::Ignored);
        }
        let settings = Settings {
            font_size: size,
            ..self.settings.clone()
        };
        self.commit(settings)
    }

    /// Set the delay between scroll steps. A running scroll picks it up
    /// on its next step.
    pub fn change_scroll_speed(&mut self, millis: u64) -> Result<Change, AppError> {
        if millis == 0 {
            return Ok(Change::Ignored);
        }
        let settings = Settings {
            scroll_speed: millis,
            ..self.settings.clone()
        };
        self.commit(settings)
    }

    /// Set alignment from user input. Unknown names are ignored.
    pub fn change_alignment(&mut self, input: &str) -> Result<Change, AppError> {
        let Some(alignment) = TextAlignment::parse(input) else {
            debug!(input, "Ignoring unknown alignment");
            return Ok(Change::Ignored);
        };
        let settings = Settings {
            alignment,
            ..self.settings.clone()
        };
        self.commit(settings)
    }

    /// Set theme from user input. Unknown names are ignored.
    pub fn change_theme(&mut self, input: &str) -> Result<Change, AppError> {
        let Some(theme) = Theme::parse(input) else {
            debug!(input, "Ignoring unknown theme");
            return Ok(Change::Ignored);
        };
        let settings = Settings {
            theme,
            ..self.settings.clone()
        };
        self.commit(settings)
    }

    // ------------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------------

    /// Flip auto-scroll on or off. Returns the new state.
    pub fn toggle_scrolling(&mut self, now: Instant) -> bool {
        if self.timer.is_running() {
            self.timer.stop();
            info!(offset = self.offset, "Scrolling stopped");
            false
        } else {
            self.timer.start(now);
            info!(interval_ms = self.settings.scroll_speed, "Scrolling started");
            true
        }
    }

    /// How long the event loop may wait before calling [`Controller::tick`].
    pub fn tick_timeout(&self, now: Instant) -> Option<Duration> {
        self.timer.timeout(now)
    }

    /// Advance the viewport one step if the scroll timer is due.
    ///
    /// Returns true if a step was taken (even one clamped at the end).
    pub fn tick(&mut self, now: Instant) -> bool {
        let interval = Duration::from_millis(self.settings.scroll_speed);
        if !self.timer.poll(now, interval) {
            return false;
        }
        self.scroll_by(SCROLL_STEP_ROWS as isize);
        true
    }

    /// Move the viewport by `delta` rows, clamped to the text.
    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = self
            .offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
    }

    /// Rows moved by a page scroll: the viewport height less one row of overlap.
    pub fn page_rows(&self) -> usize {
        (self.area.1 as usize).saturating_sub(1).max(1)
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    /// Stop everything tied to the window. Called when the UI exits.
    pub fn shutdown(&mut self) {
        if self.timer.stop() {
            debug!("Scroll timer stopped at shutdown");
        }
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(input: &str) -> PathBuf {
    let input = input.trim();
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn controller_in(temp: &TempDir) -> Controller {
        let mut controller = Controller::new(temp.path().join("settings.json"));
        controller.resize(40, 5);
        controller
    }

    fn write_text(temp: &TempDir, lines: usize) -> PathBuf {
        let path = temp.path().join("script.txt");
        let text: String = (0..lines).map(|i| format!("line {i}\n")).collect();
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn starts_with_defaults_when_no_settings_file() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        let path = controller.settings_path().to_path_buf();

        assert_eq!(controller.load_config(&path).unwrap(), ConfigLoad::Absent);
        assert_eq!(controller.settings(), &Settings::default());
    }

    #[test]
    fn load_config_applies_all_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.json");
        fs::write(
            &path,
            r#"{"font":"Courier","font_size":24,"scroll_speed":50,"theme":"dark","alignment":"center"}"#,
        )
        .unwrap();

        let mut controller = controller_in(&temp);
        assert_eq!(controller.load_config(&path).unwrap(), ConfigLoad::Applied);

        let settings = controller.settings();
        assert_eq!(settings.font, "Courier");
        assert_eq!(settings.font_size, 24);
        assert_eq!(settings.scroll_speed, 50);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.alignment, TextAlignment::Center);
    }

    #[test]
    fn malformed_config_keeps_pre_load_settings() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        controller.change_theme("dark").unwrap();

        let path = temp.path().join("broken.json");
        fs::write(
            &path,
            r#"{"font":"Courier","font_size":24,"scroll_speed":50,"alignment":"center"}"#,
        )
        .unwrap();

        let err = controller.load_config(&path).unwrap_err();
        assert!(err.is_invalid_settings());
        assert_eq!(controller.settings().theme, Theme::Dark);
        assert_eq!(controller.settings().font, "Arial");
    }

    #[test]
    fn changes_are_persisted_immediately() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);

        assert_eq!(controller.change_font("Courier").unwrap(), Change::Applied);

        let saved = Settings::load(controller.settings_path()).unwrap().unwrap();
        assert_eq!(saved.font, "Courier");
    }

    #[test]
    fn font_then_size_and_size_then_font_agree() {
        let temp = TempDir::new().unwrap();

        let mut a = Controller::new(temp.path().join("a.json"));
        a.change_font("Georgia").unwrap();
        a.change_font_size(32).unwrap();

        let mut b = Controller::new(temp.path().join("b.json"));
        b.change_font_size(32).unwrap();
        b.change_font("Georgia").unwrap();

        assert_eq!(a.settings(), b.settings());
        assert_eq!(a.settings().font, "Georgia");
        assert_eq!(a.settings().font_size, 32);
    }

    #[test]
    fn empty_font_is_ignored() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        assert_eq!(controller.change_font("   ").unwrap(), Change::Ignored);
        assert_eq!(controller.settings().font, "Arial");
        assert!(!controller.settings_path().exists());
    }

    #[test]
    fn zero_values_are_ignored() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        assert_eq!(controller.change_font_size(0).unwrap(), Change::Ignored);
        assert_eq!(controller.change_scroll_speed(0).unwrap(), Change::Ignored);
        assert_eq!(controller.settings(), &Settings::default());
    }

    #[test]
    fn invalid_alignment_and_theme_are_ignored() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        assert_eq!(controller.change_alignment("justify").unwrap(), Change::Ignored);
        assert_eq!(controller.change_theme("sepia").unwrap(), Change::Ignored);
        assert_eq!(controller.settings(), &Settings::default());
    }

    #[test]
    fn alignment_input_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        assert_eq!(controller.change_alignment("RIGHT").unwrap(), Change::Applied);
        assert_eq!(controller.settings().alignment, TextAlignment::Right);
    }

    #[test]
    fn failed_persist_keeps_change_applied() {
        let temp = TempDir::new().unwrap();
        let mut controller = Controller::new(temp.path().join("missing-dir").join("s.json"));
        let err = controller.change_scroll_speed(250).unwrap_err();
        assert!(matches!(err, AppError::Write { .. }));
        assert_eq!(controller.settings().scroll_speed, 250);
    }

    #[test]
    fn load_text_replaces_buffer_and_resets_viewport() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        let path = write_text(&temp, 20);

        controller.load_text(&path).unwrap();
        controller.scroll_by(4);
        assert_eq!(controller.offset(), 4);

        fs::write(&path, "fresh\n").unwrap();
        let summary = controller.load_text(&path).unwrap();
        assert_eq!(summary.lines, 1);
        assert_eq!(controller.document().text, "fresh\n");
        assert_eq!(controller.offset(), 0);
        assert_eq!(controller.rows(), ["fresh"]);
    }

    #[test]
    fn load_text_error_leaves_buffer_alone() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        let path = write_text(&temp, 3);
        controller.load_text(&path).unwrap();

        let err = controller.load_text(&temp.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert_eq!(controller.rows().len(), 3);
    }

    #[test]
    fn toggle_twice_restores_flag_with_no_pending_step() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        let now = Instant::now();

        assert!(controller.toggle_scrolling(now));
        assert!(controller.is_scrolling());
        assert!(!controller.toggle_scrolling(now));
        assert!(!controller.is_scrolling());
        assert_eq!(controller.tick_timeout(now), None);
        assert!(!controller.tick(now + Duration::from_secs(1)));
    }

    #[test]
    fn tick_advances_one_row_per_interval() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        let path = write_text(&temp, 20);
        controller.load_text(&path).unwrap();

        let start = Instant::now();
        controller.toggle_scrolling(start);
        assert!(controller.tick(start));
        assert_eq!(controller.offset(), 1);

        assert!(!controller.tick(start + Duration::from_millis(50)));
        assert!(controller.tick(start + Duration::from_millis(100)));
        assert_eq!(controller.offset(), 2);
    }

    #[test]
    fn speed_change_applies_to_next_step() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        controller.load_text(&write_text(&temp, 20)).unwrap();

        let start = Instant::now();
        controller.toggle_scrolling(start);
        controller.tick(start);
        controller.change_scroll_speed(500).unwrap();

        // Already scheduled at the old interval.
        let second = start + Duration::from_millis(100);
        assert!(controller.tick(second));
        assert!(!controller.tick(second + Duration::from_millis(100)));
        assert!(controller.tick(second + Duration::from_millis(500)));
    }

    #[test]
    fn scrolling_clamps_at_last_page() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        controller.load_text(&write_text(&temp, 8)).unwrap();

        controller.scroll_by(100);
        assert_eq!(controller.offset(), 3);
        assert_eq!(controller.visible_rows().len(), 5);

        controller.scroll_by(-100);
        assert_eq!(controller.offset(), 0);
    }

    #[test]
    fn larger_font_wraps_sooner() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("long.txt");
        fs::write(&path, "aaaa bbbb cccc dddd eeee ffff gggg").unwrap();

        let mut controller = controller_in(&temp);
        controller.load_text(&path).unwrap();
        let rows_at_default = controller.rows().len();

        controller.change_font_size(40).unwrap();
        assert_eq!(controller.column_width(), 20);
        assert!(controller.rows().len() > rows_at_default);
    }

    #[test]
    fn resize_rewraps_and_clamps() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        controller.load_text(&write_text(&temp, 10)).unwrap();
        controller.scroll_by(5);

        controller.resize(40, 10);
        assert_eq!(controller.offset(), 0);
        assert_eq!(controller.page_rows(), 9);
    }

    #[test]
    fn shutdown_stops_scrolling() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller_in(&temp);
        controller.toggle_scrolling(Instant::now());
        controller.shutdown();
        assert!(!controller.is_scrolling());
    }

    #[test]
    fn expand_path_handles_home_prefix() {
        assert_eq!(expand_path(" notes.txt "), PathBuf::from("notes.txt"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/notes.txt"), home.join("notes.txt"));
        }
    }
}
