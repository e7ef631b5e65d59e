/// Tests for console formatting module
///
/// These tests keep the run summary layout stable.

#[cfg(test)]
mod tests {
    use crate::console_format::*;

    /// Standard width for tests to ensure reproducible output
    const TEST_CONSOLE_WIDTH: usize = 120;

    /// Set up test environment with fixed console width
    fn setup_test_width() {
        set_console_width(TEST_CONSOLE_WIDTH);
    }

    #[test]
    fn test_display_width_ascii() {
        assert_eq!(display_width("battery"), 7);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_display_width_unicode() {
        assert_eq!(display_width("│"), 1);
        assert_eq!(display_width("₹"), 1);
        assert_eq!(display_width("📄"), 2);
    }

    #[test]
    fn test_truncate_with_padding_needs_padding() {
        let result = truncate_with_padding("pdf", 6);
        assert_eq!(result, "pdf   ");
        assert_eq!(display_width(&result), 6);
    }

    #[test]
    fn test_truncate_with_padding_needs_truncation() {
        let result = truncate_with_padding("service-ticket-report", 10);
        assert_eq!(result, "service...");
        assert_eq!(display_width(&result), 10);
    }

    #[test]
    fn test_truncate_with_padding_wide_chars() {
        let result = truncate_with_padding("report 📄📄📄 final", 12);
        assert_eq!(display_width(&result), 12);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }

    #[test]
    fn test_widths_fill_terminal() {
        let w = TableWidths::new(120);
        assert_eq!(w.report + w.format + w.file + w.size + w.result + 6, 120);
    }

    #[test]
    fn test_narrow_terminal_keeps_minimum_file_column() {
        let w = TableWidths::new(40);
        assert_eq!(w.file, 20);
    }

    #[test]
    fn test_rows_match_border_width() {
        setup_test_width();
        let header = format_table_header(2, "/tmp/exports");
        let footer = format_table_footer();
        let row = format_row(["battery", "pdf", "battery-report-2024-03-15.pdf", "3.1 KB", "saved"]);

        let border_line = header.lines().find(|l| l.starts_with('┌')).unwrap();
        assert_eq!(display_width(border_line), TEST_CONSOLE_WIDTH);
        assert_eq!(display_width(&row), TEST_CONSOLE_WIDTH);
        assert_eq!(display_width(footer.trim_end()), TEST_CONSOLE_WIDTH);
        assert!(header.contains("Exported 2 report(s) to /tmp/exports"));
    }

    #[test]
    fn test_table_writer_plain_output() {
        setup_test_width();
        let mut writer = TableWriter::new(Vec::new(), false);
        writer.write_table_header(1, "out").unwrap();
        let row = ["invoice", "csv", "invoice-data-2024-03-15.csv", "180 B", "saved"];
        writer.write_row(row, term::color::GREEN).unwrap();
        writer.write_table_footer().unwrap();
        writer.write_totals(1, 0).unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(text.contains("│ invoice"));
        assert!(text.contains("invoice-data-2024-03-15.csv"));
        assert!(text.ends_with("1 exported, 0 failed\n"));
        assert!(!text.contains('\x1b'));
    }
}
