//! PDF serialization of finished documents.
//!
//! Writes a minimal PDF 1.4 file: catalog, page tree, the two standard
//! Helvetica faces, one content stream per page and an info dictionary.
//! Content streams are zlib-compressed (`FlateDecode`) unless disabled.

mod content;

use crate::error::ExportError;
use crate::layout::{Document, PAGE_HEIGHT, PAGE_WIDTH};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use log::debug;
use std::io::Write;

pub use content::{encode_literal, render_page};

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Serialization options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfOptions {
    /// Compress page content streams
    pub compress: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

/// Accumulates numbered indirect objects and their byte offsets
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self { buf, offsets: Vec::new() }
    }

    /// Reserve the next object number
    fn reserve(&mut self) -> usize {
        self.offsets.push(0);
        self.offsets.len()
    }

    fn begin(&mut self, id: usize) {
        self.offsets[id - 1] = self.buf.len();
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.begin(id);
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, data: &[u8], compressed: bool) {
        self.begin(id);
        let filter = if compressed { " /Filter /FlateDecode" } else { "" };
        self.buf.extend_from_slice(format!("<< /Length {}{} >>\nstream\n", data.len(), filter).as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let count = self.offsets.len() + 1;
        self.buf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", count).as_bytes());
        for offset in &self.offsets {
            self.buf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        let trailer = format!("<< /Size {} /Root {} 0 R /Info {} 0 R >>", count, root, info);
        self.buf.extend_from_slice(format!("trailer\n{}\nstartxref\n{}\n%%EOF\n", trailer, xref_offset).as_bytes());
        self.buf
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(|e| ExportError::Pdf(e.to_string()))?;
    encoder.finish().map_err(|e| ExportError::Pdf(e.to_string()))
}

/// Serialize `doc` into PDF bytes.
pub fn write_pdf(doc: &Document, options: PdfOptions) -> Result<Vec<u8>, ExportError> {
    let mut w = ObjectWriter::new();

    let catalog = w.reserve();
    let pages_root = w.reserve();
    let font_regular = w.reserve();
    let font_bold = w.reserve();
    let info = w.reserve();

    let page_ids: Vec<(usize, usize)> = doc.pages.iter().map(|_| (w.reserve(), w.reserve())).collect();

    w.object(catalog, format!("<< /Type /Catalog /Pages {} 0 R >>", pages_root).as_bytes());

    let kids: Vec<String> = page_ids.iter().map(|(page, _)| format!("{} 0 R", page)).collect();
    w.object(
        pages_root,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), page_ids.len()).as_bytes(),
    );

    for (id, base) in [(font_regular, "Helvetica"), (font_bold, "Helvetica-Bold")] {
        w.object(
            id,
            format!("<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>", base).as_bytes(),
        );
    }

    let mut info_body = b"<< /Title ".to_vec();
    info_body.extend_from_slice(&encode_literal(&doc.title));
    info_body.extend_from_slice(b" /Producer (retrofit-reports) >>");
    w.object(info, &info_body);

    let media_box = format!("[0 0 {:.2} {:.2}]", PAGE_WIDTH * MM_TO_PT, PAGE_HEIGHT * MM_TO_PT);
    let resources = format!("<< /Font << /F1 {} 0 R /F2 {} 0 R >> >>", font_regular, font_bold);
    for (page, (page_id, content_id)) in doc.pages.iter().zip(&page_ids) {
        w.object(
            *page_id,
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox {} /Resources {} /Contents {} 0 R >>",
                pages_root, media_box, resources, content_id
            )
            .as_bytes(),
        );

        let raw = render_page(page);
        if options.compress {
            w.stream(*content_id, &deflate(&raw)?, true);
        } else {
            w.stream(*content_id, &raw, false);
        }
    }

    let bytes = w.finish(catalog, info);
    debug!("serialized '{}' ({} pages, {} bytes)", doc.title, doc.pages.len(), bytes.len());
    Ok(bytes)
}
