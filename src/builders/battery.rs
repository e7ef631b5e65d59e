//! Battery health report.
//!
//! Section order: header, title, vehicle panel, health summary bars,
//! charging cycles, battery metrics table, usage table, recommendations.

use super::format::{number, percent, require_finite, text_or_na};
use super::{RenderContext, draw_bullets, draw_header, draw_key_values, draw_section_heading, draw_title, finish};
use crate::error::BuildError;
use crate::layout::{
    Canvas, Color, ColorRule, Document, MARGIN_X, PAGE_WIDTH, TextStyle, draw_labeled_box, draw_proportional_bar,
    draw_table,
};
use crate::types::{BatteryHealthRecord, UsageRecord, VehicleRecord};
use log::debug;

/// Rated cycle life of the retrofit packs
pub const RATED_CYCLES: f64 = 1500.0;

const BAR_X: f64 = MARGIN_X + 62.0;
const BAR_WIDTH: f64 = 80.0;
const BAR_HEIGHT: f64 = 4.0;
const BAR_ROW: f64 = 9.0;

/// "124 of 1500"
pub fn cycles_text(cycles: f64) -> String {
    format!("{:.0} of {:.0}", cycles, RATED_CYCLES)
}

/// Advisory lines derived from the record's thresholds
pub fn recommendations(battery: &BatteryHealthRecord) -> Vec<String> {
    let mut items = Vec::new();

    if battery.current_health < 80.0 {
        items.push("Battery health is below 80%. Book a capacity test at your nearest service centre.".to_string());
    } else {
        items.push("Battery health is good. Continue your current charging routine.".to_string());
    }
    if battery.projected_health.is_finite() && battery.current_health - battery.projected_health > 5.0 {
        items.push(
            "Projected health drops by more than 5 points. Limit DC fast charging to long trips.".to_string(),
        );
    }
    if battery.average_temp.is_finite() && battery.average_temp > 35.0 {
        items.push(
            "Average pack temperature is high. Park in shade and let the pack cool before charging.".to_string(),
        );
    }
    if battery.cell_balance.is_finite() && battery.cell_balance < 90.0 {
        items.push("Cell balance is below 90%. A full balancing charge to 100% is recommended.".to_string());
    }
    if battery.charging_cycles > RATED_CYCLES * 0.8 {
        items.push(format!(
            "The pack has used {}. Plan for a module inspection before the rated cycle life is reached.",
            cycles_text(battery.charging_cycles)
        ));
    }
    items.push("Keep the state of charge between 20% and 80% for daily driving.".to_string());
    if !battery.next_service.trim().is_empty() {
        items.push(format!("Next scheduled service: {}.", battery.next_service.trim()));
    }

    items
}

fn draw_bar_row(canvas: &mut Canvas, label: &str, value: f64, y: f64, rule: &ColorRule) -> f64 {
    canvas.text(MARGIN_X + 4.0, y + BAR_HEIGHT, label, TextStyle::body());
    draw_proportional_bar(canvas, BAR_X, y, BAR_WIDTH, BAR_HEIGHT, value, rule);
    canvas.text_right(PAGE_WIDTH - MARGIN_X - 4.0, y + BAR_HEIGHT, &percent(value), TextStyle::label());
    y + BAR_ROW
}

/// Build the battery health report.
///
/// Fails when the fields that size the health bars or the cycle counter are
/// not finite; other missing values render as "N/A".
pub fn build(
    battery: &BatteryHealthRecord,
    vehicle: &VehicleRecord,
    usage: Option<&UsageRecord>,
    ctx: &RenderContext,
) -> Result<Document, BuildError> {
    let current = require_finite("currentHealth", battery.current_health)?;
    let projected = require_finite("projectedHealth", battery.projected_health)?;
    let cycles = require_finite("chargingCycles", battery.charging_cycles)?;
    debug!("battery report: health {} -> {}, {} cycles", current, projected, cycles);

    let mut canvas = Canvas::new("Battery Health Report");
    let mut y = draw_header(&mut canvas, ctx);
    y = draw_title(&mut canvas, ctx, "Battery Health Report", y);

    // Vehicle information
    let mut vehicle_rows = vec![
        ("Model", text_or_na(&vehicle.model)),
        ("Battery type", text_or_na(&vehicle.battery_type)),
        ("Rated range", text_or_na(&vehicle.range)),
        ("Motor power", text_or_na(&vehicle.power)),
        ("Pack capacity", text_or_na(&vehicle.capacity)),
    ];
    if let Some(ref reg) = vehicle.registration_number
        && !reg.trim().is_empty()
    {
        vehicle_rows.push(("Registration", reg.clone()));
    }
    let panel_height = 14.0 + vehicle_rows.len() as f64 * 5.5;
    let content_y = draw_labeled_box(&mut canvas, "Vehicle Information", y, panel_height);
    y = draw_key_values(&mut canvas, &vehicle_rows, MARGIN_X + 4.0, content_y, 40.0) + 8.0;

    // Health summary
    let content_y = draw_labeled_box(&mut canvas, "Health Summary", y, 14.0 + 4.0 * BAR_ROW + 12.0);
    let rule = ColorRule::health();
    let mut bar_y = draw_bar_row(&mut canvas, "Current health", current, content_y, &rule);
    bar_y = draw_bar_row(&mut canvas, "Projected health (12 months)", projected, bar_y, &rule);
    bar_y = draw_bar_row(&mut canvas, "Cell balance", battery.cell_balance, bar_y, &rule);
    bar_y = draw_bar_row(&mut canvas, "Capacity retention", battery.capacity_retention, bar_y, &rule);

    canvas.text(MARGIN_X + 4.0, bar_y + BAR_HEIGHT, "Charging cycles", TextStyle::body());
    let cycle_share = cycles / RATED_CYCLES * 100.0;
    let cycle_rule = ColorRule::solid(Color::BLUE);
    draw_proportional_bar(&mut canvas, BAR_X, bar_y, BAR_WIDTH, BAR_HEIGHT, cycle_share, &cycle_rule);
    canvas.text_right(PAGE_WIDTH - MARGIN_X - 4.0, bar_y + BAR_HEIGHT, &cycles_text(cycles), TextStyle::label());
    y = bar_y + BAR_ROW + 10.0;

    // Battery metrics
    y = draw_section_heading(&mut canvas, "Battery Metrics", y);
    let metrics = vec![
        vec!["Estimated range".to_string(), number(battery.range, 0, "km")],
        vec!["Efficiency".to_string(), percent(battery.efficiency)],
        vec!["Average temperature".to_string(), number(battery.average_temp, 1, "°C")],
        vec!["Capacity retention".to_string(), percent(battery.capacity_retention)],
        vec!["Last charge".to_string(), text_or_na(&battery.last_charge)],
        vec!["Next service".to_string(), text_or_na(&battery.next_service)],
    ];
    y = draw_table(&mut canvas, &["Metric", "Value"], &metrics, y, &[85.0, 85.0]);

    // Usage statistics
    if let Some(usage) = usage {
        y = draw_section_heading(&mut canvas, "Usage Statistics", y + 4.0);
        let rows = vec![
            vec!["Weekly distance".to_string(), number(usage.weekly_distance, 0, "km")],
            vec!["Monthly distance".to_string(), number(usage.monthly_distance, 0, "km")],
            vec!["Total distance".to_string(), number(usage.total_distance, 0, "km")],
            vec!["Average efficiency".to_string(), percent(usage.avg_efficiency)],
            vec!["Average temperature".to_string(), number(usage.avg_temp, 1, "°C")],
        ];
        y = draw_table(&mut canvas, &["Usage", "Value"], &rows, y, &[85.0, 85.0]);
    }

    draw_bullets(&mut canvas, "Recommendations", &recommendations(battery), y + 4.0);

    Ok(finish(canvas, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_support::context;
    use crate::builders::{DocumentKind, render_or_fallback};

    fn sample_battery() -> BatteryHealthRecord {
        BatteryHealthRecord {
            current_health: 97.0,
            projected_health: 90.0,
            cell_balance: 98.0,
            charging_cycles: 124.0,
            capacity_retention: 96.0,
            range: 312.0,
            efficiency: 91.0,
            average_temp: 28.0,
            last_charge: "2024-03-14 22:10".to_string(),
            next_service: "June 2024".to_string(),
        }
    }

    fn sample_vehicle() -> VehicleRecord {
        VehicleRecord {
            model: "X".to_string(),
            battery_type: "Y".to_string(),
            range: "320 km".to_string(),
            power: "45 kW".to_string(),
            capacity: "30 kWh".to_string(),
            registration_number: Some("KA 05 MX 1234".to_string()),
        }
    }

    #[test]
    fn test_report_draws_health_and_cycles() {
        let ctx = context();
        let doc = build(&sample_battery(), &sample_vehicle(), None, &ctx).unwrap();
        assert!(doc.contains_text("97%"));
        assert!(doc.contains_text("124 of 1500"));
        assert!(doc.contains_text("KA 05 MX 1234"));
        assert!(!doc.contains_text("Usage Statistics"));
    }

    #[test]
    fn test_usage_section_included_when_supplied() {
        let ctx = context();
        let usage = UsageRecord {
            weekly_distance: 180.0,
            monthly_distance: 760.0,
            total_distance: 15200.0,
            avg_efficiency: 89.0,
            avg_temp: 30.5,
        };
        let doc = build(&sample_battery(), &sample_vehicle(), Some(&usage), &ctx).unwrap();
        assert!(doc.contains_text("Usage Statistics"));
        assert!(doc.contains_text("15200 km"));
        assert!(doc.contains_text("30.5 °C"));
    }

    #[test]
    fn test_nan_health_is_a_build_error() {
        let ctx = context();
        let battery = BatteryHealthRecord { current_health: f64::NAN, ..sample_battery() };
        let err = build(&battery, &sample_vehicle(), None, &ctx).unwrap_err();
        assert_eq!(err, BuildError::MalformedField { field: "currentHealth" });
    }

    #[test]
    fn test_nan_health_falls_back_to_error_document() {
        let ctx = context();
        let battery = BatteryHealthRecord { current_health: f64::NAN, ..sample_battery() };
        let doc = render_or_fallback(DocumentKind::BatteryHealth, &ctx, |c| {
            build(&battery, &sample_vehicle(), None, c)
        });
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.contains_text("BHR-ERR-"));
    }

    #[test]
    fn test_display_only_nan_degrades_to_na() {
        let ctx = context();
        let battery = BatteryHealthRecord { average_temp: f64::NAN, cell_balance: f64::NAN, ..sample_battery() };
        let doc = build(&battery, &sample_vehicle(), None, &ctx).unwrap();
        assert!(doc.contains_text("N/A"));
    }

    #[test]
    fn test_recommendations_follow_thresholds() {
        let worn = BatteryHealthRecord {
            current_health: 72.0,
            projected_health: 60.0,
            average_temp: 38.0,
            cell_balance: 85.0,
            charging_cycles: 1300.0,
            ..sample_battery()
        };
        let items = recommendations(&worn).join("\n");
        assert!(items.contains("below 80%"));
        assert!(items.contains("more than 5 points"));
        assert!(items.contains("temperature is high"));
        assert!(items.contains("balancing charge"));
        assert!(items.contains("1300 of 1500"));

        let healthy = recommendations(&sample_battery()).join("\n");
        assert!(healthy.contains("Battery health is good"));
        assert!(healthy.contains("more than 5 points"));
    }
}
