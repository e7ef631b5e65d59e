//! Service ticket document.

use super::format::{require_text, text_or_na};
use super::labels::{category_label, priority_color, priority_label, status_color, status_label};
use super::{RenderContext, draw_bullets, draw_header, draw_key_values, draw_section_heading, draw_title, finish};
use crate::error::BuildError;
use crate::layout::{
    CONTENT_WIDTH, Canvas, Color, Document, MARGIN_X, PAGE_WIDTH, TextStyle, draw_labeled_box, draw_wrapped_text,
    metrics,
};
use crate::types::{ServiceTicketRecord, TicketPriority, TicketStatus};

/// Customer-facing next steps for a ticket in its current state
pub fn next_steps(ticket: &ServiceTicketRecord) -> Vec<String> {
    let mut steps = Vec::new();
    let settled = matches!(ticket.status, TicketStatus::Resolved | TicketStatus::Closed);
    if ticket.priority == TicketPriority::Urgent && !settled {
        steps.push("Urgent tickets are escalated to the on-call technician immediately.".to_string());
    }
    let by_status: &[&str] = match ticket.status {
        TicketStatus::Open => &[
            "Our service team will review your ticket within 24 hours.",
            "Keep the vehicle available for a diagnostic inspection.",
        ],
        TicketStatus::InProgress => &[
            "A technician is working on your issue.",
            "You will be notified as soon as the work is complete.",
        ],
        TicketStatus::Resolved => &[
            "Please verify the fix and confirm within 7 days.",
            "Reply to this ticket if the issue returns.",
        ],
        TicketStatus::Closed => &["This ticket is closed. Raise a new ticket if you need further assistance."],
        TicketStatus::Other(_) => &["Contact support for the latest status of this ticket."],
    };
    steps.extend(by_status.iter().map(|s| s.to_string()));
    steps
}

/// Coloured pill with a white label, right-aligned at `right`
fn draw_badge(canvas: &mut Canvas, right: f64, y: f64, label: &str, color: Color) -> f64 {
    let style = TextStyle::label().with_color(Color::WHITE);
    let width = metrics::text_width(label, style.font, style.size) + 6.0;
    let x = right - width;
    canvas.fill_rect(x, y, width, 6.0, color);
    canvas.text(x + 3.0, y + 4.3, label, style);
    x
}

/// Build the service ticket document.
pub fn build(ticket: &ServiceTicketRecord, ctx: &RenderContext) -> Result<Document, BuildError> {
    let id = require_text("id", &ticket.id)?;
    require_text("title", &ticket.title)?;

    let mut canvas = Canvas::new(&format!("Service Ticket {}", id));
    let mut y = draw_header(&mut canvas, ctx);
    y = draw_title(&mut canvas, ctx, "Service Ticket", y);

    // Ticket details with status/priority badges in the panel corner
    let details = vec![
        ("Ticket ID", id.to_string()),
        ("Vehicle ID", text_or_na(&ticket.vehicle_id)),
        ("Category", category_label(&ticket.category).to_string()),
        ("Priority", priority_label(&ticket.priority).to_string()),
        ("Status", status_label(&ticket.status).to_string()),
        ("Created", text_or_na(&ticket.created_at)),
        ("Last updated", text_or_na(&ticket.updated_at)),
    ];
    let panel_top = canvas.ensure_space(y, 14.0 + details.len() as f64 * 5.5);
    let content_y = draw_labeled_box(&mut canvas, "Ticket Details", panel_top, 14.0 + details.len() as f64 * 5.5);
    let badge_right = PAGE_WIDTH - MARGIN_X - 4.0;
    let status = status_label(&ticket.status);
    let next = draw_badge(&mut canvas, badge_right, panel_top + 2.5, status, status_color(&ticket.status));
    draw_badge(
        &mut canvas,
        next - 2.0,
        panel_top + 2.5,
        priority_label(&ticket.priority),
        priority_color(&ticket.priority),
    );
    y = draw_key_values(&mut canvas, &details, MARGIN_X + 4.0, content_y, 35.0) + 8.0;

    // Issue
    y = draw_section_heading(&mut canvas, "Issue", y);
    y = draw_wrapped_text(&mut canvas, &ticket.title, MARGIN_X, y, CONTENT_WIDTH, TextStyle::label());
    y += 2.0;
    let description =
        if ticket.description.trim().is_empty() { "No description provided." } else { ticket.description.as_str() };
    y = draw_wrapped_text(&mut canvas, description, MARGIN_X, y, CONTENT_WIDTH, TextStyle::body());

    if !ticket.user_id.trim().is_empty() {
        y += 2.0;
        canvas.text(MARGIN_X, y, &format!("Raised by account {}", ticket.user_id), TextStyle::small());
        y += 4.0;
    }

    draw_bullets(&mut canvas, "Next Steps", &next_steps(ticket), y + 6.0);

    Ok(finish(canvas, ctx))
}
