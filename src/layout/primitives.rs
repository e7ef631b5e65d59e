//! Drawing primitives shared by all document builders.
//!
//! Every primitive takes the y cursor it should start at and, where it
//! consumes vertical space, returns the cursor below what it drew so the
//! caller can keep composing.

use super::canvas::{Canvas, Color, Font, TextStyle};
use super::metrics::text_width;
use super::{CONTENT_BOTTOM, CONTENT_WIDTH, MARGIN_X};
use log::debug;

const ROW_HEIGHT: f64 = 7.0;
const CELL_PADDING: f64 = 2.0;

/// Maps a 0-100 value to a bar colour.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRule {
    /// Descending thresholds; the first one `value >= threshold` wins, else `fallback`
    Tiered { tiers: Vec<(f64, Color)>, fallback: Color },
    Solid(Color),
}

impl ColorRule {
    /// ≥80 green, ≥60 amber, otherwise red
    pub fn health() -> Self {
        ColorRule::Tiered { tiers: vec![(80.0, Color::GREEN), (60.0, Color::AMBER)], fallback: Color::RED }
    }

    pub fn solid(color: Color) -> Self {
        ColorRule::Solid(color)
    }

    pub fn color_for(&self, value: f64) -> Color {
        match self {
            ColorRule::Solid(color) => *color,
            ColorRule::Tiered { tiers, fallback } => {
                tiers.iter().find(|(threshold, _)| value >= *threshold).map(|(_, c)| *c).unwrap_or(*fallback)
            }
        }
    }
}

impl Default for ColorRule {
    fn default() -> Self {
        ColorRule::health()
    }
}

/// Split `text` into lines no wider than `max_width` millimetres.
///
/// Explicit newlines start a new line, words wider than the limit are
/// broken by character, and empty or whitespace-only input yields no lines.
pub fn wrap_lines(text: &str, max_width: f64, font: Font, size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() { word.to_string() } else { format!("{} {}", current, word) };
            if text_width(&candidate, font, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, font, size) <= max_width {
                current = word.to_string();
            } else {
                // Break an over-long word at character granularity
                for c in word.chars() {
                    current.push(c);
                    if text_width(&current, font, size) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Write `text` wrapped to `max_width`, one line per `style.line_height`.
///
/// Returns the y after the last line; empty text returns `y` unchanged.
pub fn draw_wrapped_text(canvas: &mut Canvas, text: &str, x: f64, y: f64, max_width: f64, style: TextStyle) -> f64 {
    let mut y = y;
    for line in wrap_lines(text, max_width, style.font, style.size) {
        y = canvas.ensure_space(y, style.line_height);
        canvas.text(x, y, &line, style);
        y += style.line_height;
    }
    y
}

/// Width of the filled part of a proportional bar.
///
/// The value is clamped to 0-100, so the overlay never exceeds the track;
/// non-finite values draw nothing.
pub fn overlay_width(width: f64, value: f64) -> f64 {
    if !value.is_finite() || !width.is_finite() || width <= 0.0 {
        return 0.0;
    }
    width * value.clamp(0.0, 100.0) / 100.0
}

/// Draw a background track and a coloured overlay proportional to `value`.
///
/// Returns the overlay width actually drawn.
pub fn draw_proportional_bar(
    canvas: &mut Canvas,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    value: f64,
    rule: &ColorRule,
) -> f64 {
    canvas.fill_rect(x, y, width, height, Color::TRACK);
    let filled = overlay_width(width, value);
    if filled > 0.0 {
        canvas.fill_rect(x, y, filled, height, rule.color_for(value));
    }
    filled
}

/// Truncate `text` with "..." so it fits within `max_width`.
pub fn truncate_to_width(text: &str, max_width: f64, font: Font, size: f64) -> String {
    if text_width(text, font, size) <= max_width {
        return text.to_string();
    }
    let mut result = String::new();
    for c in text.chars() {
        result.push(c);
        if text_width(&format!("{}...", result), font, size) > max_width {
            result.pop();
            break;
        }
    }
    format!("{}...", result.trim_end())
}

fn draw_row(canvas: &mut Canvas, cells: &[String], y: f64, column_widths: &[f64], style: TextStyle) {
    let mut x = MARGIN_X;
    for (cell, width) in cells.iter().zip(column_widths) {
        let fitted = truncate_to_width(cell, width - 2.0 * CELL_PADDING, style.font, style.size);
        canvas.text(x + CELL_PADDING, y + ROW_HEIGHT - 2.2, &fitted, style);
        x += width;
    }
}

/// Render a table: a filled header row, then alternately shaded body rows.
///
/// Rows that would cross the footer band continue on a new page with the
/// header repeated. Returns the y immediately below the last row.
pub fn draw_table(
    canvas: &mut Canvas,
    headers: &[&str],
    rows: &[Vec<String>],
    start_y: f64,
    column_widths: &[f64],
) -> f64 {
    let table_width: f64 = column_widths.iter().sum::<f64>().min(CONTENT_WIDTH);
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let header_style = TextStyle::label().with_color(Color::WHITE);
    let body_style = TextStyle::body();

    let draw_header = |canvas: &mut Canvas, y: f64| {
        canvas.fill_rect(MARGIN_X, y, table_width, ROW_HEIGHT, Color::BRAND);
        draw_row(canvas, &header_cells, y, column_widths, header_style);
        y + ROW_HEIGHT
    };

    let mut y = canvas.ensure_space(start_y, 2.0 * ROW_HEIGHT);
    y = draw_header(&mut *canvas, y);

    for (i, row) in rows.iter().enumerate() {
        if y + ROW_HEIGHT > CONTENT_BOTTOM {
            debug!("table continues on page {}", canvas.page_count() + 1);
            y = canvas.new_page();
            y = draw_header(&mut *canvas, y);
        }
        if i % 2 == 1 {
            canvas.fill_rect(MARGIN_X, y, table_width, ROW_HEIGHT, Color::STRIPE);
        }
        draw_row(canvas, row, y, column_widths, body_style);
        y += ROW_HEIGHT;
    }

    canvas.line(MARGIN_X, y, MARGIN_X + table_width, y, Color::BORDER, 0.3);
    y + 4.0
}

/// Bordered panel with a title strip spanning the content width.
///
/// Returns the y where the panel's content should start.
pub fn draw_labeled_box(canvas: &mut Canvas, title: &str, y: f64, height: f64) -> f64 {
    let y = canvas.ensure_space(y, height);
    canvas.rect(MARGIN_X, y, CONTENT_WIDTH, height, Some(Color::PANEL), Some(Color::BORDER));
    canvas.text(MARGIN_X + 4.0, y + 6.5, title, TextStyle::heading());
    y + 12.0
}

#[cfg(test)]
#[path = "primitives_test.rs"]
mod primitives_test;
