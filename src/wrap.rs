//! Word wrapping of the text buffer into display rows.
//!
//! Pure functions: text and a column width in, rows out. The viewport
//! scrolls over these rows, so their count bounds the scroll offset.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Spaces a tab expands to.
const TAB_WIDTH: usize = 4;

/// Font size at which the reading column spans the full text area.
pub const BASE_FONT_SIZE: u32 = 20;

/// Width in cells of the reading column for a font size.
///
/// Larger sizes give a narrower column, so text wraps sooner the way a
/// bigger typeface would. Never wider than the area, never zero unless
/// the area is.
pub fn column_width(area_width: u16, font_size: u32) -> u16 {
    if area_width == 0 {
        return 0;
    }
    let size = font_size.max(1) as u64;
    let scaled = area_width as u64 * BASE_FONT_SIZE as u64 / size;
    scaled.clamp(1, area_width as u64) as u16
}

/// Wrap `text` into rows no wider than `width` cells.
///
/// Every logical line yields at least one row, so blank lines survive.
/// Words wider than the column are split by character.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.lines() {
        let expanded = line.replace('\t', &" ".repeat(TAB_WIDTH));
        wrap_line(&expanded, width, &mut rows);
    }
    rows
}

fn wrap_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let mut row = String::new();
    let mut row_width = 0;

    for word in line.split_inclusive(' ') {
        let bare = word.trim_end_matches(' ');
        let bare_width = bare.width();

        if row_width + bare_width > width && !row.is_empty() {
            flush_row(&mut row, rows);
            row_width = 0;
        }

        for ch in bare.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > width && !row.is_empty() {
                flush_row(&mut row, rows);
                row_width = 0;
            }
            row.push(ch);
            row_width += ch_width;
        }

        let spaces = (word.len() - bare.len()).min(width.saturating_sub(row_width));
        row.extend(std::iter::repeat_n(' ', spaces));
        row_width += spaces;
    }

    rows.push(row.trim_end().to_string());
}

/// End a row that a later word overflowed. Indentation alone is not a row.
fn flush_row(row: &mut String, rows: &mut Vec<String>) {
    let trimmed = row.trim_end();
    if !trimmed.is_empty() {
        rows.push(trimmed.to_string());
    }
    row.clear();
}
