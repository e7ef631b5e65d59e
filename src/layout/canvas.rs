//! Page canvas that records drawing instructions.
//!
//! The canvas is the rendering-engine abstraction the builders draw onto.
//! It never rasterizes anything: every call appends a `DrawOp` to the
//! current page, and the finished `Document` is handed to the PDF writer.
//! Units are millimetres with the origin at the top-left corner.

use super::{CONTENT_BOTTOM, MARGIN_X, PAGE_HEIGHT, PAGE_WIDTH, TOP_MARGIN};

/// RGB colour, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TEXT: Color = Color::rgb(33, 37, 41);
    pub const MUTED: Color = Color::rgb(108, 117, 125);
    pub const BRAND: Color = Color::rgb(16, 122, 87);
    pub const GREEN: Color = Color::rgb(34, 197, 94);
    pub const AMBER: Color = Color::rgb(245, 158, 11);
    pub const RED: Color = Color::rgb(239, 68, 68);
    pub const BLUE: Color = Color::rgb(59, 130, 246);
    pub const TRACK: Color = Color::rgb(229, 231, 235);
    pub const PANEL: Color = Color::rgb(248, 250, 252);
    pub const BORDER: Color = Color::rgb(203, 213, 225);
    pub const STRIPE: Color = Color::rgb(241, 245, 249);
}

/// The two standard faces the PDF writer embeds by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// Font, size and colour for a run of text, plus the line advance used when wrapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    /// Size in points
    pub size: f64,
    pub color: Color,
    /// Vertical advance per line in millimetres
    pub line_height: f64,
}

impl TextStyle {
    pub const fn body() -> Self {
        Self { font: Font::Regular, size: 10.0, color: Color::TEXT, line_height: 5.0 }
    }

    pub const fn small() -> Self {
        Self { font: Font::Regular, size: 8.0, color: Color::MUTED, line_height: 4.0 }
    }

    pub const fn label() -> Self {
        Self { font: Font::Bold, size: 10.0, color: Color::TEXT, line_height: 5.0 }
    }

    pub const fn heading() -> Self {
        Self { font: Font::Bold, size: 13.0, color: Color::BRAND, line_height: 7.0 }
    }

    pub const fn title() -> Self {
        Self { font: Font::Bold, size: 18.0, color: Color::TEXT, line_height: 9.0 }
    }

    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// One recorded drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline at `y`
    Text { x: f64, y: f64, text: String, font: Font, size: f64, color: Color },
    /// Rectangle with its top-left corner at (`x`, `y`)
    Rect { x: f64, y: f64, width: f64, height: f64, fill: Option<Color>, stroke: Option<Color> },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// A finished, paginated document ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    /// All text runs across all pages, in drawing order
    #[cfg(test)]
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.ops.iter()).filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// True if any single text run contains `needle`
    #[cfg(test)]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_runs().any(|t| t.contains(needle))
    }
}

/// Drawing surface with automatic page management
#[derive(Debug, Clone)]
pub struct Canvas {
    title: String,
    pages: Vec<Page>,
}

impl Canvas {
    pub fn new(title: &str) -> Self {
        Self { title: title.to_string(), pages: vec![Page::default()] }
    }

    fn current(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.current().ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            font: style.font,
            size: style.size,
            color: style.color,
        });
    }

    /// Right-aligned text ending at `right`
    pub fn text_right(&mut self, right: f64, y: f64, text: &str, style: TextStyle) {
        let width = super::metrics::text_width(text, style.font, style.size);
        self.text(right - width, y, text, style);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Option<Color>, stroke: Option<Color>) {
        if width <= 0.0 || height <= 0.0 || !(width.is_finite() && height.is_finite()) {
            return;
        }
        self.current().ops.push(DrawOp::Rect { x, y, width, height, fill, stroke });
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.rect(x, y, width, height, Some(color), None);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64) {
        self.current().ops.push(DrawOp::Line { x1, y1, x2, y2, color, width });
    }

    /// Horizontal rule across the content width
    pub fn rule(&mut self, y: f64, color: Color) {
        self.line(MARGIN_X, y, PAGE_WIDTH - MARGIN_X, y, color, 0.3);
    }

    /// Start a new page and return the y cursor at its top margin
    pub fn new_page(&mut self) -> f64 {
        self.pages.push(Page::default());
        TOP_MARGIN
    }

    /// Return `y` if `needed` millimetres still fit above the footer band,
    /// otherwise break to a new page and return its top margin.
    pub fn ensure_space(&mut self, y: f64, needed: f64) -> f64 {
        if y + needed > CONTENT_BOTTOM && y > TOP_MARGIN {
            self.new_page()
        } else {
            y
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Close the document, stamping the footer line on every page.
    pub fn finish(mut self, footer: &str) -> Document {
        let total = self.pages.len();
        let style = TextStyle::small();
        let footer_y = PAGE_HEIGHT - 12.0;
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.ops.push(DrawOp::Line {
                x1: MARGIN_X,
                y1: footer_y - 5.0,
                x2: PAGE_WIDTH - MARGIN_X,
                y2: footer_y - 5.0,
                color: Color::BORDER,
                width: 0.3,
            });
            page.ops.push(DrawOp::Text {
                x: MARGIN_X,
                y: footer_y,
                text: footer.to_string(),
                font: style.font,
                size: style.size,
                color: style.color,
            });
            let counter = format!("Page {} of {}", i + 1, total);
            let width = super::metrics::text_width(&counter, style.font, style.size);
            page.ops.push(DrawOp::Text {
                x: PAGE_WIDTH - MARGIN_X - width,
                y: footer_y,
                text: counter,
                font: style.font,
                size: style.size,
                color: style.color,
            });
        }
        Document { title: self.title, pages: self.pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_space_breaks_page_near_bottom() {
        let mut canvas = Canvas::new("t");
        assert_eq!(canvas.ensure_space(100.0, 20.0), 100.0);
        assert_eq!(canvas.page_count(), 1);

        let y = canvas.ensure_space(CONTENT_BOTTOM - 5.0, 20.0);
        assert_eq!(y, TOP_MARGIN);
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn test_ensure_space_never_breaks_at_top_of_page() {
        let mut canvas = Canvas::new("t");
        // A block taller than the page must not loop on empty pages
        assert_eq!(canvas.ensure_space(TOP_MARGIN, 500.0), TOP_MARGIN);
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn test_finish_stamps_footer_on_every_page() {
        let mut canvas = Canvas::new("t");
        canvas.text(20.0, 30.0, "first", TextStyle::body());
        canvas.new_page();
        canvas.text(20.0, 30.0, "second", TextStyle::body());

        let doc = canvas.finish("Confidential");
        assert_eq!(doc.pages.len(), 2);
        for page in &doc.pages {
            let texts: Vec<&str> = page
                .ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            assert!(texts.contains(&"Confidential"));
        }
        assert!(doc.contains_text("Page 2 of 2"));
    }

    #[test]
    fn test_degenerate_rects_are_skipped() {
        let mut canvas = Canvas::new("t");
        canvas.fill_rect(0.0, 0.0, 0.0, 5.0, Color::RED);
        canvas.fill_rect(0.0, 0.0, f64::NAN, 5.0, Color::RED);
        let doc = canvas.finish("");
        assert!(doc.pages[0].ops.iter().all(|op| !matches!(op, DrawOp::Rect { .. })));
    }
}
