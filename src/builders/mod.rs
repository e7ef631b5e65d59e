//! Document builders - one per downloadable PDF document type.
//!
//! Each builder is a pure function from records plus a `RenderContext` to a
//! paginated `Document`. Builders validate the fields that drive layout
//! arithmetic and return `BuildError` when they cannot proceed;
//! `render_or_fallback` turns that into a one-page error document so the
//! caller always gets a PDF back.
//!
//! # Module Organization
//!
//! - `battery` - Battery health report
//! - `ticket` - Service ticket
//! - `invoice` - Subscription invoice with GST split
//! - `analytics` - Period analytics report
//! - `labels` - Ticket status/priority/category label maps
//! - `format` - Value formatting and field validation

pub mod analytics;
pub mod battery;
pub mod format;
pub mod invoice;
pub mod labels;
pub mod ticket;

use crate::config::CompanyProfile;
use crate::error::BuildError;
use crate::layout::{CONTENT_WIDTH, Canvas, Color, Document, MARGIN_X, PAGE_WIDTH, TextStyle, draw_wrapped_text};
use crate::types::UserContext;
use chrono::{Local, NaiveDateTime, TimeZone};
use log::warn;

/// Everything a builder needs besides the records themselves
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub user: UserContext,
    pub company: CompanyProfile,
    /// Local wall-clock time the export was requested
    pub generated_at: NaiveDateTime,
}

impl RenderContext {
    pub fn new(user: UserContext, company: CompanyProfile, generated_at: NaiveDateTime) -> Self {
        Self { user, company, generated_at }
    }

    /// YYYY-MM-DD, used in filenames and CSV rows
    pub fn generated_date(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    /// Unix milliseconds of `generated_at`, read as local time.
    ///
    /// A local time skipped by a DST jump falls back to reading it as UTC.
    pub fn generated_millis(&self) -> i64 {
        match Local.from_local_datetime(&self.generated_at).earliest() {
            Some(local) => local.timestamp_millis(),
            None => self.generated_at.and_utc().timestamp_millis(),
        }
    }

    pub fn generated_display(&self) -> String {
        self.generated_at.format("%d %b %Y, %H:%M").to_string()
    }
}

/// PDF document types, with the prefix used in fallback reference codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    BatteryHealth,
    ServiceTicket,
    Invoice,
    Analytics,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::BatteryHealth => "BHR",
            DocumentKind::ServiceTicket => "TKT",
            DocumentKind::Invoice => "INV",
            DocumentKind::Analytics => "ANR",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::BatteryHealth => "Battery Health Report",
            DocumentKind::ServiceTicket => "Service Ticket",
            DocumentKind::Invoice => "Tax Invoice",
            DocumentKind::Analytics => "Analytics Report",
        }
    }
}

/// `{PREFIX}-ERR-{unix millis}` for support lookups
pub fn reference_code(kind: DocumentKind, ctx: &RenderContext) -> String {
    format!("{}-ERR-{}", kind.prefix(), ctx.generated_millis())
}

/// Run a builder, substituting the error document if it fails.
pub fn render_or_fallback<F>(kind: DocumentKind, ctx: &RenderContext, build: F) -> Document
where
    F: FnOnce(&RenderContext) -> Result<Document, BuildError>,
{
    match build(ctx) {
        Ok(doc) => doc,
        Err(e) => {
            let code = reference_code(kind, ctx);
            warn!("{} generation failed ({}), emitting fallback {}", kind.title(), e, code);
            fallback_document(kind, ctx, &e, &code)
        }
    }
}

/// One-page document stating that generation failed, with a reference code.
pub fn fallback_document(kind: DocumentKind, ctx: &RenderContext, error: &BuildError, code: &str) -> Document {
    let mut canvas = Canvas::new(kind.title());
    let mut y = draw_header(&mut canvas, ctx);
    y = draw_title(&mut canvas, ctx, "Report generation failed", y);

    let body = TextStyle::body();
    y = draw_wrapped_text(
        &mut canvas,
        &format!(
            "We could not generate your {}. The source data contained values that could not be laid out.",
            kind.title().to_lowercase()
        ),
        MARGIN_X,
        y,
        CONTENT_WIDTH,
        body,
    );
    y += 3.0;
    y = draw_wrapped_text(&mut canvas, &format!("Reason: {}", error), MARGIN_X, y, CONTENT_WIDTH, body);
    y += 3.0;
    canvas.text(MARGIN_X, y, &format!("Reference code: {}", code), TextStyle::label().with_color(Color::RED));
    y += 8.0;
    draw_wrapped_text(
        &mut canvas,
        "Please retry the export. If the problem persists, contact support and quote the reference code above.",
        MARGIN_X,
        y,
        CONTENT_WIDTH,
        TextStyle::small(),
    );

    finish(canvas, ctx)
}

/// Company name, wrapped address and contact line. Returns the y below the rule.
pub(crate) fn draw_header(canvas: &mut Canvas, ctx: &RenderContext) -> f64 {
    let company = &ctx.company;
    let mut y = 20.0;
    canvas.text(MARGIN_X, y, &company.name, TextStyle::heading().with_color(Color::BRAND));
    y += 5.5;
    y = draw_wrapped_text(canvas, &company.address, MARGIN_X, y, CONTENT_WIDTH * 0.6, TextStyle::small());
    canvas.text(MARGIN_X, y, &company.contact, TextStyle::small());
    y += 3.0;
    canvas.line(MARGIN_X, y, PAGE_WIDTH - MARGIN_X, y, Color::BRAND, 0.6);
    y + 10.0
}

/// Document label, generation date and recipient.
pub(crate) fn draw_title(canvas: &mut Canvas, ctx: &RenderContext, label: &str, y: f64) -> f64 {
    canvas.text(MARGIN_X, y, label, TextStyle::title());
    let meta = TextStyle::small();
    canvas.text_right(PAGE_WIDTH - MARGIN_X, y - 4.0, &format!("Generated: {}", ctx.generated_display()), meta);
    canvas.text_right(PAGE_WIDTH - MARGIN_X, y + 0.5, &format!("Generated for: {}", ctx.user.display_name), meta);
    y + 10.0
}

/// Section heading with a thin rule beneath
pub(crate) fn draw_section_heading(canvas: &mut Canvas, title: &str, y: f64) -> f64 {
    let y = canvas.ensure_space(y, 20.0);
    canvas.text(MARGIN_X, y, title, TextStyle::heading());
    canvas.rule(y + 2.0, Color::BORDER);
    y + 8.0
}

/// Two-column label/value lines inside a panel
pub(crate) fn draw_key_values(canvas: &mut Canvas, pairs: &[(&str, String)], x: f64, y: f64, label_width: f64) -> f64 {
    let mut y = y;
    for (label, value) in pairs {
        canvas.text(x, y, &format!("{}:", label), TextStyle::label());
        canvas.text(x + label_width, y, value, TextStyle::body());
        y += 5.5;
    }
    y
}

/// Bulleted advisory list under a "Recommendations"-style heading
pub(crate) fn draw_bullets(canvas: &mut Canvas, heading: &str, items: &[String], y: f64) -> f64 {
    if items.is_empty() {
        return y;
    }
    let mut y = draw_section_heading(canvas, heading, y);
    let style = TextStyle::body();
    for item in items {
        y = canvas.ensure_space(y, style.line_height);
        canvas.text(MARGIN_X + 2.0, y, "-", style);
        y = draw_wrapped_text(canvas, item, MARGIN_X + 7.0, y, CONTENT_WIDTH - 7.0, style);
        y += 1.0;
    }
    y
}

/// Close the canvas with the company disclaimer as the per-page footer
pub(crate) fn finish(canvas: Canvas, ctx: &RenderContext) -> Document {
    canvas.finish(&ctx.company.disclaimer)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::RenderContext;
    use crate::config::CompanyProfile;
    use crate::types::UserContext;
    use chrono::NaiveDate;

    /// Fixed context so reference codes and dates are stable
    pub fn context() -> RenderContext {
        let generated_at = NaiveDate::from_ymd_opt(2024, 3, 15).and_then(|d| d.and_hms_opt(10, 30, 0)).unwrap();
        RenderContext::new(UserContext::new("Asha Rao"), CompanyProfile::default(), generated_at)
    }
}
