//! Pure rendering: map App state to ratatui widget trees.
//!
//! Layout: menu bar on the top row, the reading column in the middle,
//! status bar on the bottom row. Menus and prompts draw as overlays on
//! top. Widget-building functions are pure (state in, widgets out); the
//! only effect is Frame::render_widget() writing to the terminal buffer.

use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::controller::Controller;
use crate::settings::TextAlignment;
use crate::wrap::wrap_text;

use super::state::{App, MENU_BAR, Mode, Prompt, Status};
use super::theme::{self, Palette};

/// Widest a prompt overlay gets.
const PROMPT_MAX_WIDTH: u16 = 64;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the whole window to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let palette = theme::palette(app.controller.settings().theme);

    // Window background follows the theme
    frame.render_widget(Block::new().style(palette.text), area);

    let chunks = layout(area);

    let menu_open = match app.mode {
        Mode::Menu { selected, .. } => Some(selected),
        _ => None,
    };
    frame.render_widget(render_menu_bar(menu_open, &app.controller, &palette), chunks[0]);
    render_text(&app.controller, &palette, frame, chunks[1]);
    render_status(app, &palette, frame, chunks[2]);

    match &app.mode {
        Mode::Reading => {}
        Mode::Menu { selected, item } => {
            if let Some(item) = item {
                render_dropdown(*selected, *item, &palette, frame, area);
            }
        }
        Mode::Prompt(prompt) => render_prompt(prompt, &palette, frame, area),
    }
}

/// Split the window into menu bar, text area and status bar.
fn layout(area: Rect) -> Rc<[Rect]> {
    Layout::vertical([
        Constraint::Length(1), // menu bar
        Constraint::Min(0),    // text
        Constraint::Length(1), // status
    ])
    .split(area)
}

/// The region the text is drawn in, for sizing the viewport.
pub fn text_area(area: Rect) -> Rect {
    layout(area)[1]
}

fn to_ratatui(alignment: TextAlignment) -> Alignment {
    match alignment {
        TextAlignment::Left => Alignment::Left,
        TextAlignment::Right => Alignment::Right,
        TextAlignment::Center => Alignment::Center,
    }
}

// ============================================================================
// MENU BAR
// ============================================================================

/// Label as drawn on the menu bar, padded for click-free spacing.
fn menu_label(label: &str) -> String {
    format!(" {label} ")
}

/// Column where each menu bar entry starts.
fn menu_offsets() -> Vec<u16> {
    MENU_BAR
        .iter()
        .scan(0u16, |x, entry| {
            let start = *x;
            *x += menu_label(entry.label()).len() as u16;
            Some(start)
        })
        .collect()
}

fn render_menu_bar(
    focused: Option<usize>,
    controller: &Controller,
    palette: &Palette,
) -> Paragraph<'static> {
    let mut spans: Vec<Span> = MENU_BAR
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if focused == Some(i) {
                palette.selected
            } else {
                palette.chrome
            };
            Span::styled(menu_label(entry.label()), style)
        })
        .collect();

    let name = controller
        .document()
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "untitled".to_string());
    spans.push(Span::styled(format!("   {name}"), palette.chrome));

    Paragraph::new(Line::from(spans)).style(palette.chrome)
}

fn render_dropdown(
    selected: usize,
    item: usize,
    palette: &Palette,
    frame: &mut Frame,
    area: Rect,
) {
    let Some(entry) = MENU_BAR.get(selected) else {
        return;
    };
    let items = entry.items();
    if items.is_empty() {
        return;
    }

    let x = menu_offsets().get(selected).copied().unwrap_or(0);
    let inner_width = items.iter().map(|(label, _)| label.len()).max().unwrap_or(0) as u16 + 2;
    let dropdown = Rect {
        x: area.x + x,
        y: area.y + 1,
        width: inner_width + 2,
        height: items.len() as u16 + 2,
    }
    .intersection(area);

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(i, (label, _))| {
            let style = if i == item {
                palette.selected
            } else {
                palette.overlay
            };
            Line::from(Span::styled(
                format!(" {label:<width$} ", width = inner_width as usize - 2),
                style,
            ))
        })
        .collect();

    frame.render_widget(Clear, dropdown);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().style(palette.overlay)),
        dropdown,
    );
}

// ============================================================================
// TEXT
// ============================================================================

fn render_text(controller: &Controller, palette: &Palette, frame: &mut Frame, area: Rect) {
    let rows = controller.visible_rows();

    if controller.document().path.is_none() && rows.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from("No text loaded"),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("o", theme::STYLE_INTERACTIVE),
                Span::raw(" to open a file or "),
                Span::styled("m", theme::STYLE_INTERACTIVE),
                Span::raw(" for the menu"),
            ]),
        ])
        .alignment(Alignment::Center)
        .style(palette.text);
        frame.render_widget(hint, area);
        return;
    }

    // Centre the reading column in the text area
    let width = controller.column_width().min(area.width);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let lines: Vec<Line> = rows.iter().map(|row| Line::from(row.as_str())).collect();
    let paragraph = Paragraph::new(lines)
        .alignment(to_ratatui(controller.settings().alignment))
        .style(palette.text);
    frame.render_widget(paragraph, column);
}

// ============================================================================
// STATUS BAR
// ============================================================================

fn render_status(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    match &app.status {
        Some(status) => render_message(status, palette, frame, area),
        None => {
            let summary = status_summary(&app.controller);
            let chunks = Layout::horizontal([
                Constraint::Min(0),
                Constraint::Length(summary.width() as u16),
            ])
            .split(area);

            let help = Line::from(format!(" {}", help_text(&app.mode)));
            frame.render_widget(Paragraph::new(help).style(palette.chrome), chunks[0]);
            frame.render_widget(Paragraph::new(summary).style(palette.chrome), chunks[1]);
        }
    }
}

/// Draw a status message across the whole status bar.
///
/// A message wider than the bar wraps and grows upward over the text,
/// up to half the window.
fn render_message(status: &Status, palette: &Palette, frame: &mut Frame, status_bar: Rect) {
    let area = frame.area();
    let rows = wrap_text(&status.text, status_bar.width.saturating_sub(1) as usize);
    let max_rows = (area.height / 2).max(1).min(status_bar.y + 1);
    let height = (rows.len() as u16).clamp(1, max_rows);

    let message_area = Rect {
        y: status_bar.y + 1 - height,
        height,
        ..status_bar
    };

    let style = theme::status_style(status.level);
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|row| Line::from(Span::styled(format!(" {row}"), style)))
        .collect();

    frame.render_widget(Clear, message_area);
    frame.render_widget(Paragraph::new(lines).style(palette.chrome), message_area);
}

/// Right-hand status: typeface, layout, speed, scroll state, position.
fn status_summary(controller: &Controller) -> Line<'static> {
    let settings = controller.settings();
    let total = controller.rows().len();
    let position = if total == 0 {
        0
    } else {
        controller.offset() + 1
    };

    let state = if controller.is_scrolling() {
        Span::styled("▶ scrolling", theme::STYLE_SCROLLING)
    } else {
        Span::raw("❚❚ paused")
    };

    Line::from(vec![
        Span::raw(format!(
            "{} {}pt │ {} │ {} ms │ ",
            settings.font,
            settings.font_size,
            settings.alignment.as_str(),
            settings.scroll_speed
        )),
        state,
        Span::raw(format!(" │ {position}/{total} ")),
    ])
}

/// Help line showing available keybindings for the current mode.
fn help_text(mode: &Mode) -> &'static str {
    match mode {
        Mode::Reading => "[m] menu  [space] start/stop  [o] open  [t] theme  [q] quit",
        Mode::Menu { .. } => "[←→] menus  [↑↓] items  [Enter] select  [Esc] close",
        Mode::Prompt(_) => "[Enter] ok  [Esc] cancel",
    }
}

// ============================================================================
// PROMPT
// ============================================================================

fn render_prompt(prompt: &Prompt, palette: &Palette, frame: &mut Frame, area: Rect) {
    let width = PROMPT_MAX_WIDTH.min(area.width.saturating_sub(2));
    let height = 5.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    // Keep the end of long input visible
    let visible = width.saturating_sub(6) as usize;
    let input: String = {
        let chars: Vec<char> = prompt.input.chars().collect();
        let skip = chars.len().saturating_sub(visible);
        chars[skip..].iter().collect()
    };

    let lines = vec![
        Line::from(prompt.kind.label()),
        Line::from(vec![
            Span::styled("› ", theme::STYLE_INTERACTIVE),
            Span::raw(input),
            Span::styled("_", theme::STYLE_INTERACTIVE),
        ]),
        Line::from(""),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .title(format!(" {} ", prompt.kind.title()))
                .style(palette.overlay),
        ),
        popup,
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Controller;
    use crate::settings::Theme;
    use crate::tui::state::{PromptKind, StatusLevel};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use std::fs;
    use tempfile::TempDir;

    const WIDTH: u16 = 60;
    const HEIGHT: u16 = 20;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(WIDTH, HEIGHT);
        Terminal::new(backend).unwrap()
    }

    /// App sized to the test terminal with `text` loaded.
    fn app_with_text(temp: &TempDir, text: &str) -> App {
        let path = temp.path().join("script.txt");
        fs::write(&path, text).unwrap();

        let mut controller = Controller::new(temp.path().join("settings.json"));
        let area = text_area(Rect::new(0, 0, WIDTH, HEIGHT));
        controller.resize(area.width, area.height);
        controller.load_text(&path).unwrap();
        App::new(controller)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..WIDTH)
            .map(|x| buffer.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn empty_app_shows_open_hint() {
        let mut terminal = make_terminal();
        let app = App::new(Controller::new("settings.json"));
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("No text loaded"));
        assert!(content.contains("File"));
        assert!(content.contains("Start/Stop"));
    }

    #[test]
    fn loaded_text_appears_below_menu_bar() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let app = app_with_text(&temp, "Good evening\nand welcome\n");
        terminal.draw(|frame| render(&app, frame)).unwrap();

        assert!(row_text(&terminal, 1).starts_with("Good evening"));
        assert!(row_text(&terminal, 2).starts_with("and welcome"));
        assert!(row_text(&terminal, 0).contains("script.txt"));
    }

    #[test]
    fn dark_theme_paints_white_on_black() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app_with_text(&temp, "hello\n");
        app.controller.change_theme("dark").unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text_cell = buffer.cell((0, 1)).unwrap();
        assert_eq!(text_cell.bg, Color::Black);
        assert_eq!(text_cell.fg, Color::White);
        // Empty window space shares the background
        assert_eq!(buffer.cell((WIDTH - 1, HEIGHT - 3)).unwrap().bg, Color::Black);
    }

    #[test]
    fn light_theme_paints_black_on_white() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let app = app_with_text(&temp, "hello\n");
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let cell = terminal.backend().buffer().cell((0, 1)).unwrap().clone();
        assert_eq!(cell.bg, Color::White);
        assert_eq!(cell.fg, Color::Black);
        assert_eq!(app.controller.settings().theme, Theme::Light);
    }

    #[test]
    fn center_alignment_centres_within_column() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app_with_text(&temp, "hi\n");
        app.controller.change_font_size(24).unwrap();
        app.controller.change_alignment("center").unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        // Column is 60 * 20 / 24 = 50 wide at x = 5; "hi" centred inside it
        let row = row_text(&terminal, 1);
        assert_eq!(row.find("hi"), Some(29));
    }

    #[test]
    fn right_alignment_hugs_column_edge() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app_with_text(&temp, "end\n");
        app.controller.change_alignment("right").unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let row = row_text(&terminal, 1);
        assert_eq!(row.find("end"), Some(WIDTH as usize - 3));
    }

    #[test]
    fn status_bar_shows_font_and_state() {
        let temp = TempDir::new().unwrap();
        let mut terminal = make_terminal();
        let mut app = app_with_text(&temp, "x\n");
        app.controller.change_font("Courier").unwrap();
        app.controller.change_font_size(24).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let status = row_text(&terminal, HEIGHT - 1);
        assert!(status.contains("Courier 24pt"), "status was {status:?}");
        assert!(status.contains("paused"));
    }

    #[test]
    fn status_message_replaces_help() {
        let mut terminal = make_terminal();
        let mut app = App::new(Controller::new("settings.json"));
        app.warn("Settings file ignored");
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let status = row_text(&terminal, HEIGHT - 1);
        assert!(status.contains("Settings file ignored"));
        assert_eq!(app.status.as_ref().map(|s| s.level), Some(StatusLevel::Warning));
    }

    #[test]
    fn settings_warning_is_shown_in_full() {
        const WIDE: u16 = 80;
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(
            &path,
            r#"{"font":"Courier","font_size":24,"scroll_speed":50,"alignment":"center"}"#,
        )
        .unwrap();

        let mut app = App::new(Controller::new(&path));
        let err = app.controller.load_config(&path).unwrap_err();
        let message = format!("{err}; keeping current settings");
        assert!(message.len() > WIDE as usize);
        app.warn(message.clone());

        let mut terminal = Terminal::new(TestBackend::new(WIDE, HEIGHT)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..HEIGHT)
            .map(|y| {
                (0..WIDE)
                    .map(|x| buffer.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .collect();
        let first = rows
            .iter()
            .position(|row| row.starts_with("Malformed settings"))
            .expect("warning should be on screen");
        assert!(first < HEIGHT as usize - 1, "long warning should wrap");

        let shown = rows[first..].join(" ");
        assert_eq!(shown, message);
        assert!(shown.contains("missing field `theme`"));
    }

    #[test]
    fn message_hides_summary_until_cleared() {
        let mut terminal = make_terminal();
        let mut app = App::new(Controller::new("settings.json"));
        app.info("Paused");
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(!row_text(&terminal, HEIGHT - 1).contains("20pt"));

        app.status = None;
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(row_text(&terminal, HEIGHT - 1).contains("Arial 20pt"));
    }

    #[test]
    fn prompt_overlay_shows_label_and_input() {
        let mut terminal = make_terminal();
        let mut app = App::new(Controller::new("settings.json"));
        app.mode = Mode::Prompt(Prompt {
            kind: PromptKind::ScrollSpeed,
            input: "250".to_string(),
        });
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Enter scroll speed (ms):"));
        assert!(content.contains("250_"));
        assert!(content.contains("Scroll Speed"));
    }

    #[test]
    fn open_dropdown_lists_items() {
        let mut terminal = make_terminal();
        let mut app = App::new(Controller::new("settings.json"));
        app.mode = Mode::Menu {
            selected: 0,
            item: Some(1),
        };
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Open text file"));
        assert!(content.contains("Open config file"));
        assert!(content.contains("Exit"));
    }

    #[test]
    fn every_mode_renders_in_a_tiny_terminal() {
        let backend = TestBackend::new(8, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let modes = vec![
            Mode::Reading,
            Mode::menu(),
            Mode::Menu {
                selected: 1,
                item: Some(3),
            },
            Mode::Prompt(Prompt {
                kind: PromptKind::OpenText,
                input: "a/very/long/path/to/a/script.txt".to_string(),
            }),
        ];
        for mode in modes {
            let mut app = App::new(Controller::new("settings.json"));
            app.mode = mode;
            terminal
                .draw(|frame| render(&app, frame))
                .expect("every mode should render without panic");
        }
    }

    #[test]
    fn menu_offsets_follow_labels() {
        let offsets = menu_offsets();
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[1], " File ".len() as u16);
        assert_eq!(offsets.len(), MENU_BAR.len());
    }
}
