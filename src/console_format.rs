/// Console formatting module - run summary rendering
///
/// This module handles console output for the export summary:
/// - Table layout and borders
/// - Color terminal output
/// - Text truncation and padding
/// - Human-readable artifact sizes
///
/// ## Output Flexibility
///
/// `TableWriter` writes to any `std::io::Write` destination, so the same
/// table can go to stderr with colors or into a buffer for tests.

use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors
            && let Some(ref mut t) = term::stderr()
        {
            let _ = t.fg(color);
            let _ = t.write_all(text.as_bytes());
            let _ = t.reset();
            return Ok(());
        }
        write!(self.writer, "{}", text)
    }

    /// Write table header (title line plus column headings)
    pub fn write_table_header(&mut self, job_count: usize, destination: &str) -> io::Result<()> {
        write!(self.writer, "{}", format_table_header(job_count, destination))
    }

    /// Write table footer
    pub fn write_table_footer(&mut self) -> io::Result<()> {
        write!(self.writer, "{}", format_table_footer())
    }

    /// Write one 5-column job row in the given color
    pub fn write_row(&mut self, cells: [&str; 5], color: Color) -> io::Result<()> {
        let row = format_row(cells);
        self.write_colored(&row, color)?;
        writeln!(self.writer)
    }

    /// Write the closing "N exported, M failed" line
    pub fn write_totals(&mut self, exported: usize, failed: usize) -> io::Result<()> {
        writeln!(self.writer, "{} exported, {} failed", exported, failed)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

//
// Table Layout and Widths
//

/// Column widths for the 5-column summary table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableWidths {
    pub report: usize,
    pub format: usize,
    pub file: usize,
    pub size: usize,
    pub result: usize,
}

impl TableWidths {
    pub fn new(terminal_width: usize) -> Self {
        // Borders: │ = 6 characters (1 before each column + 1 at end)
        let borders = 6;
        let available = terminal_width.saturating_sub(borders);

        // "service-ticket" is the longest report slug
        let report = 16;
        let format = 8;
        // "1023.9 KB"
        let size = 11;
        // "unsupported" or "failed"
        let result = 14;

        // File gets remaining space (paths can be long)
        let fixed_total = report + format + size + result;
        let file = if available > fixed_total + 20 { available - fixed_total } else { 20 };

        TableWidths { report, format, file, size, result }
    }

    fn columns(&self) -> [usize; 5] {
        [self.report, self.format, self.file, self.size, self.result]
    }
}

/// Get terminal width or default to 100
fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        100
    }
}

static WIDTHS: OnceLock<TableWidths> = OnceLock::new();

/// Fix the console width instead of detecting it (first call wins)
pub fn set_console_width(width: usize) {
    let _ = WIDTHS.set(TableWidths::new(width));
}

/// Get table widths, detecting the terminal width on first use
pub fn get_widths() -> &'static TableWidths {
    WIDTHS.get_or_init(|| TableWidths::new(get_terminal_width()))
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }

    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }
    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }
    result
}

/// "512 B", "12.3 KB", "1.4 MB"
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

//
// Table Rendering
//

fn border(left: char, mid: char, right: char) -> String {
    let cols: Vec<String> = get_widths().columns().iter().map(|w| "─".repeat(*w)).collect();
    format!("{}{}{}\n", left, cols.join(&mid.to_string()), right)
}

/// Format a single row; cells are truncated to their column
pub fn format_row(cells: [&str; 5]) -> String {
    let displays: Vec<String> = cells
        .iter()
        .zip(get_widths().columns().iter())
        .map(|(cell, width)| truncate_with_padding(cell, width.saturating_sub(2)))
        .collect();
    format!("│ {} │ {} │ {} │ {} │ {} │", displays[0], displays[1], displays[2], displays[3], displays[4])
}

/// Format table header as a string
pub fn format_table_header(job_count: usize, destination: &str) -> String {
    let mut output = String::new();
    output.push('\n');
    output.push_str(&format!("Exported {} report(s) to {}\n\n", job_count, destination));
    output.push_str(&border('┌', '┬', '┐'));
    output.push_str(&format_row(["Report", "Format", "File", "Size", "Result"]));
    output.push('\n');
    output.push_str(&border('├', '┼', '┤'));
    output
}

/// Format table footer as a string
pub fn format_table_footer() -> String {
    border('└', '┴', '┘')
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
