//! Display labels for service ticket enums.
//!
//! Each map is total over its enum: known wire values get a fixed label and
//! unknown values (`Other`) pass through unchanged.

use crate::layout::Color;
use crate::types::{TicketCategory, TicketPriority, TicketStatus};

pub fn status_label(status: &TicketStatus) -> &str {
    match status {
        TicketStatus::Open => "Open",
        TicketStatus::InProgress => "In Progress",
        TicketStatus::Resolved => "Resolved",
        TicketStatus::Closed => "Closed",
        TicketStatus::Other(raw) => raw,
    }
}

pub fn priority_label(priority: &TicketPriority) -> &str {
    match priority {
        TicketPriority::Low => "Low",
        TicketPriority::Medium => "Medium",
        TicketPriority::High => "High",
        TicketPriority::Urgent => "Urgent",
        TicketPriority::Other(raw) => raw,
    }
}

pub fn category_label(category: &TicketCategory) -> &str {
    match category {
        TicketCategory::Battery => "Battery Issues",
        TicketCategory::Charging => "Charging Problems",
        TicketCategory::ElectricMotor => "Electric Motor",
        TicketCategory::Controller => "Controller Issues",
        TicketCategory::Mechanical => "Mechanical Problems",
        TicketCategory::Software => "Software/Firmware",
        TicketCategory::Misc => "Other",
        TicketCategory::Other(raw) => raw,
    }
}

pub fn status_color(status: &TicketStatus) -> Color {
    match status {
        TicketStatus::Open => Color::BLUE,
        TicketStatus::InProgress => Color::AMBER,
        TicketStatus::Resolved => Color::GREEN,
        TicketStatus::Closed | TicketStatus::Other(_) => Color::MUTED,
    }
}

pub fn priority_color(priority: &TicketPriority) -> Color {
    match priority {
        TicketPriority::Low => Color::GREEN,
        TicketPriority::Medium => Color::BLUE,
        TicketPriority::High => Color::AMBER,
        TicketPriority::Urgent => Color::RED,
        TicketPriority::Other(_) => Color::MUTED,
    }
}
