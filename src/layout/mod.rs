//! Layout primitives - deterministic placement of text, bars and tables.
//!
//! # Module Organization
//!
//! - `canvas` - Page canvas, draw instructions, colours and text styles
//! - `metrics` - Helvetica advance widths for text measurement
//! - `primitives` - Wrapped text, proportional bars, tables and labeled boxes

mod canvas;
pub mod metrics;
mod primitives;

pub use canvas::{Canvas, Color, Document, DrawOp, Font, Page, TextStyle};
pub use primitives::{ColorRule, draw_labeled_box, draw_proportional_bar, draw_table, draw_wrapped_text};

/// A4 portrait, millimetres
pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN_X: f64 = 20.0;
/// Where y restarts after a page break
pub const TOP_MARGIN: f64 = 25.0;
/// Lowest y content may reach; below it is the footer band
pub const CONTENT_BOTTOM: f64 = PAGE_HEIGHT - 25.0;
pub const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN_X;
