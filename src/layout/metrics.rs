//! Font metrics for the standard Helvetica faces.
//!
//! Advance widths come from the Adobe core-14 AFM files, in 1/1000 em units,
//! for printable ASCII and the Latin-1 upper half (WinAnsi 0xA0-0xFF).
//! Anything else is measured as a digit-width glyph.

use super::canvas::Font;

/// Points to millimetres
pub const PT_TO_MM: f64 = 25.4 / 72.0;

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    // nbsp ¡ ¢ £ ¤ ¥ ¦ § ¨ © ª « ¬ soft-hyphen ® ¯
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // ° ± ² ³ ´ µ ¶ · ¸ ¹ º » ¼ ½ ¾ ¿
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // À-Ï
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // Ð-ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // à-ï
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // ð-ÿ
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Advance width of one character in 1/1000 em
pub fn char_width(c: char, font: Font) -> u16 {
    let (ascii, latin1) = match font {
        Font::Regular => (&HELVETICA, &HELVETICA_LATIN1),
        Font::Bold => (&HELVETICA_BOLD, &HELVETICA_BOLD_LATIN1),
    };
    match c as u32 {
        code @ 32..=126 => ascii[(code - 32) as usize],
        code @ 0xA0..=0xFF => latin1[(code - 0xA0) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Rendered width of `text` in millimetres at `size` points
pub fn text_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| char_width(c, font) as u32).sum();
    units as f64 / 1000.0 * size * PT_TO_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_zero_width() {
        assert_eq!(text_width("", Font::Regular, 10.0), 0.0);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let regular = text_width("Battery Health", Font::Regular, 10.0);
        let bold = text_width("Battery Health", Font::Bold, 10.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width("97%", Font::Regular, 10.0);
        let large = text_width("97%", Font::Regular, 20.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn test_known_glyph_widths() {
        assert_eq!(char_width(' ', Font::Regular), 278);
        assert_eq!(char_width('W', Font::Bold), 944);
        assert_eq!(char_width('₹', Font::Regular), FALLBACK_WIDTH);
    }

    #[test]
    fn test_latin1_glyph_widths() {
        assert_eq!(char_width('°', Font::Regular), 400);
        assert_eq!(char_width('°', Font::Bold), 400);
        assert_eq!(char_width('é', Font::Regular), 556);
        assert_eq!(char_width('ß', Font::Bold), 611);
        assert_eq!(char_width('ÿ', Font::Bold), 556);
        assert!(text_width("28.4 °C", Font::Regular, 10.0) < text_width("28.4 0C", Font::Regular, 10.0));
    }
}
