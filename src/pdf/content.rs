//! Translation of draw instructions into PDF content-stream operators.
//!
//! Layout works top-down in millimetres; PDF user space is bottom-up in
//! points, so every coordinate goes through `to_pt_x` / `to_pt_y` here.

use crate::layout::{Color, DrawOp, Font, PAGE_HEIGHT, Page};
use std::fmt::Write;

const MM_TO_PT: f64 = 72.0 / 25.4;

fn to_pt_x(x: f64) -> f64 {
    x * MM_TO_PT
}

fn to_pt_y(y: f64) -> f64 {
    (PAGE_HEIGHT - y) * MM_TO_PT
}

fn rgb(color: Color) -> (f64, f64, f64) {
    (color.r as f64 / 255.0, color.g as f64 / 255.0, color.b as f64 / 255.0)
}

/// Resource name of a font in the page resource dictionary
pub fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Regular => "F1",
        Font::Bold => "F2",
    }
}

/// Encode text as a PDF literal string in WinAnsiEncoding.
///
/// Latin-1 characters map directly; anything else the standard fonts
/// cannot show becomes '?'.
pub fn encode_literal(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        let byte = match c {
            '€' => 0x80,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) <= 0xFF => c as u32 as u8,
            _ => b'?',
        };
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

/// Render one page's ops as an uncompressed content stream.
pub fn render_page(page: &Page) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut ops = String::new();

    for op in &page.ops {
        match op {
            DrawOp::Rect { x, y, width, height, fill, stroke } => {
                let (px, py) = (to_pt_x(*x), to_pt_y(y + height));
                let (pw, ph) = (width * MM_TO_PT, height * MM_TO_PT);
                if let Some(color) = fill {
                    let (r, g, b) = rgb(*color);
                    let _ = writeln!(ops, "{:.3} {:.3} {:.3} rg", r, g, b);
                }
                if let Some(color) = stroke {
                    let (r, g, b) = rgb(*color);
                    let _ = writeln!(ops, "{:.3} {:.3} {:.3} RG 0.5 w", r, g, b);
                }
                let paint = match (fill, stroke) {
                    (Some(_), Some(_)) => "B",
                    (Some(_), None) => "f",
                    (None, Some(_)) => "S",
                    (None, None) => "n",
                };
                let _ = writeln!(ops, "{:.2} {:.2} {:.2} {:.2} re {}", px, py, pw, ph, paint);
            }
            DrawOp::Line { x1, y1, x2, y2, color, width } => {
                let (r, g, b) = rgb(*color);
                let _ = writeln!(
                    ops,
                    "{:.3} {:.3} {:.3} RG {:.2} w {:.2} {:.2} m {:.2} {:.2} l S",
                    r,
                    g,
                    b,
                    width * MM_TO_PT,
                    to_pt_x(*x1),
                    to_pt_y(*y1),
                    to_pt_x(*x2),
                    to_pt_y(*y2)
                );
            }
            DrawOp::Text { x, y, text, font, size, color } => {
                let (r, g, b) = rgb(*color);
                let _ = write!(
                    ops,
                    "BT {:.3} {:.3} {:.3} rg /{} {:.1} Tf {:.2} {:.2} Td ",
                    r,
                    g,
                    b,
                    font_resource(*font),
                    size,
                    to_pt_x(*x),
                    to_pt_y(*y)
                );
                // Literal strings may carry Latin-1 bytes, so flush the ASCII buffer first
                out.extend_from_slice(ops.as_bytes());
                ops.clear();
                out.extend_from_slice(&encode_literal(text));
                out.extend_from_slice(b" Tj ET\n");
            }
        }
    }
    out.extend_from_slice(ops.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_literal_escapes_delimiters() {
        assert_eq!(encode_literal("a(b)c\\"), b"(a\\(b\\)c\\\\)".to_vec());
    }

    #[test]
    fn test_encode_literal_maps_unsupported_glyphs() {
        assert_eq!(encode_literal("₹5"), b"(?5)".to_vec());
        assert_eq!(encode_literal("25°C"), vec![b'(', b'2', b'5', 0xB0, b'C', b')']);
    }

    #[test]
    fn test_text_is_positioned_from_bottom() {
        let page = Page {
            ops: vec![DrawOp::Text {
                x: 0.0,
                y: PAGE_HEIGHT,
                text: "97%".to_string(),
                font: Font::Bold,
                size: 12.0,
                color: Color::rgb(0, 0, 0),
            }],
        };
        let stream = String::from_utf8(render_page(&page)).unwrap();
        assert!(stream.contains("/F2 12.0 Tf 0.00 0.00 Td (97%) Tj ET"));
    }

    #[test]
    fn test_filled_and_stroked_rect_uses_b_operator() {
        let page = Page {
            ops: vec![DrawOp::Rect {
                x: 10.0,
                y: 10.0,
                width: 20.0,
                height: 5.0,
                fill: Some(Color::PANEL),
                stroke: Some(Color::BORDER),
            }],
        };
        let stream = String::from_utf8(render_page(&page)).unwrap();
        assert!(stream.trim_end().ends_with(" re B"));
    }
}
