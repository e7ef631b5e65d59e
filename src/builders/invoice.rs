//! Subscription tax invoice.
//!
//! The base amount is split into CGST and SGST at 9% each. The same
//! totals feed the CSV and JSON exports so every format agrees.

use super::format::{money, require_finite, require_text, round2, text_or_na};
use super::{RenderContext, draw_header, draw_key_values, draw_section_heading, draw_title, finish};
use crate::error::BuildError;
use crate::layout::{
    CONTENT_WIDTH, Canvas, Color, Document, MARGIN_X, PAGE_WIDTH, TextStyle, draw_labeled_box, draw_table,
    draw_wrapped_text,
};
use crate::types::InvoiceRecord;
use serde::Serialize;

pub const CGST_RATE: f64 = 0.09;
pub const SGST_RATE: f64 = 0.09;

/// Tax breakdown of an invoice amount, rounded to paise
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub base: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub total: f64,
}

impl InvoiceTotals {
    pub fn compute(base: f64) -> Self {
        let base = round2(base);
        let cgst = round2(base * CGST_RATE);
        let sgst = round2(base * SGST_RATE);
        Self { base, cgst, sgst, total: round2(base + cgst + sgst) }
    }
}

/// Build the invoice document.
pub fn build(invoice: &InvoiceRecord, ctx: &RenderContext) -> Result<Document, BuildError> {
    let number = require_text("invoiceNumber", &invoice.invoice_number)?;
    let amount = require_finite("amount", invoice.amount)?;
    let totals = InvoiceTotals::compute(amount);
    let prefix = ctx.company.currency_prefix.as_str();

    let mut canvas = Canvas::new(&format!("Invoice {}", number));
    let mut y = draw_header(&mut canvas, ctx);
    y = draw_title(&mut canvas, ctx, "Tax Invoice", y);

    // Invoice meta on the left, bill-to panel on the right
    let meta = vec![
        ("Invoice No.", number.to_string()),
        ("Invoice date", text_or_na(&invoice.date)),
        ("Plan", text_or_na(&invoice.plan)),
    ];
    let meta_end = draw_key_values(&mut canvas, &meta, MARGIN_X, y, 28.0);

    let panel_x = MARGIN_X + CONTENT_WIDTH * 0.55;
    let panel_width = PAGE_WIDTH - MARGIN_X - panel_x;
    let panel_height = 24.0;
    canvas.rect(panel_x, y - 5.0, panel_width, panel_height, Some(Color::PANEL), Some(Color::BORDER));
    canvas.text(panel_x + 3.0, y, "Bill To", TextStyle::label().with_color(Color::BRAND));
    canvas.text(panel_x + 3.0, y + 5.5, &text_or_na(&invoice.customer), TextStyle::body());
    canvas.text(panel_x + 3.0, y + 10.5, &text_or_na(&invoice.email), TextStyle::small());
    y = meta_end.max(y - 5.0 + panel_height) + 8.0;

    // Line items
    y = draw_section_heading(&mut canvas, "Details", y);
    let line_items = vec![vec![
        format!("{} subscription", text_or_na(&invoice.plan)),
        text_or_na(&invoice.billing_period),
        money(prefix, totals.base),
    ]];
    y = draw_table(&mut canvas, &["Description", "Billing Period", "Amount"], &line_items, y, &[80.0, 50.0, 40.0]);

    // Totals
    let rows = [
        ("Subtotal", totals.base),
        ("CGST (9%)", totals.cgst),
        ("SGST (9%)", totals.sgst),
    ];
    let box_height = 14.0 + (rows.len() + 1) as f64 * 6.0 + 4.0;
    let box_top = canvas.ensure_space(y + 2.0, box_height);
    let mut ty = draw_labeled_box(&mut canvas, "Amount Due", box_top, box_height);
    let right = PAGE_WIDTH - MARGIN_X - 4.0;
    for (label, value) in rows {
        canvas.text(MARGIN_X + 4.0, ty, label, TextStyle::body());
        canvas.text_right(right, ty, &money(prefix, value), TextStyle::body());
        ty += 6.0;
    }
    canvas.line(MARGIN_X + 4.0, ty - 4.0, right, ty - 4.0, Color::BORDER, 0.3);
    canvas.text(MARGIN_X + 4.0, ty + 1.0, "Total", TextStyle::heading());
    canvas.text_right(right, ty + 1.0, &money(prefix, totals.total), TextStyle::heading());
    y = box_top + box_height + 8.0;

    if !invoice.next_billing.trim().is_empty() {
        y = canvas.ensure_space(y, 10.0);
        canvas.text(MARGIN_X, y, &format!("Next billing date: {}", invoice.next_billing.trim()), TextStyle::label());
        y += 8.0;
    }

    draw_wrapped_text(
        &mut canvas,
        "This is a computer-generated invoice and does not require a signature. \
         Amounts include GST split equally between the central and state governments.",
        MARGIN_X,
        y,
        CONTENT_WIDTH,
        TextStyle::small(),
    );

    Ok(finish(canvas, ctx))
}
