//! Period analytics report.

use super::format::{number, percent, require_finite, text_or_na};
use super::{RenderContext, draw_bullets, draw_header, draw_key_values, draw_section_heading, draw_title, finish};
use crate::error::BuildError;
use crate::layout::{
    Canvas, Color, ColorRule, Document, MARGIN_X, PAGE_WIDTH, TextStyle, draw_labeled_box, draw_proportional_bar,
    draw_table,
};
use crate::types::{AnalyticsRecord, TrendPoint};

/// One month of the merged trend series: efficiency, temperature, range
pub type TrendRow = (String, [Option<f64>; 3]);

/// Merge the three trend series by month, in order of first appearance.
///
/// A month missing from a series (or with an unparseable value) leaves
/// that slot empty.
pub fn merge_trends(analytics: &AnalyticsRecord) -> Vec<TrendRow> {
    let mut rows: Vec<TrendRow> = Vec::new();
    let series: [&[TrendPoint]; 3] =
        [&analytics.efficiency_trend, &analytics.temperature_trend, &analytics.range_trend];

    for (slot, points) in series.iter().enumerate() {
        for point in points.iter() {
            let value = point.value.is_finite().then_some(point.value);
            match rows.iter_mut().find(|(month, _)| *month == point.month) {
                Some((_, values)) => values[slot] = value,
                None => {
                    let mut values = [None; 3];
                    values[slot] = value;
                    rows.push((point.month.clone(), values));
                }
            }
        }
    }
    rows
}

fn cell(value: Option<f64>, decimals: usize, unit: &str) -> String {
    number(value.unwrap_or(f64::NAN), decimals, unit)
}

/// Observations derived from the period's numbers
pub fn insights(analytics: &AnalyticsRecord) -> Vec<String> {
    let mut items = Vec::new();
    let change = analytics.battery_health_end - analytics.battery_health_start;
    if change < -2.0 {
        items.push(format!(
            "Battery health declined by {:.1} points over the period. Review charging habits and pack temperature.",
            -change
        ));
    } else {
        items.push("Battery health remained stable over the period.".to_string());
    }

    let efficiency: Vec<f64> =
        analytics.efficiency_trend.iter().map(|p| p.value).filter(|v| v.is_finite()).collect();
    if let (Some(first), Some(last)) = (efficiency.first(), efficiency.last())
        && efficiency.len() > 1
    {
        if last > first {
            items.push(format!("Efficiency improved from {} to {}.", percent(*first), percent(*last)));
        } else if last < first {
            items.push(format!("Efficiency dropped from {} to {}.", percent(*first), percent(*last)));
        }
    }

    let peak_temp = analytics
        .temperature_trend
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max);
    if peak_temp > 35.0 {
        let peak = number(peak_temp, 1, "°C");
        items.push(format!("Peak monthly temperature reached {}. Consider shaded parking.", peak));
    }

    if analytics.carbon_saved.is_finite() && analytics.carbon_saved > 0.0 {
        items.push(format!(
            "Your retrofit avoided {} of CO2 emissions this period.",
            number(analytics.carbon_saved, 0, "kg")
        ));
    }
    items
}

/// Build the analytics report.
pub fn build(analytics: &AnalyticsRecord, ctx: &RenderContext) -> Result<Document, BuildError> {
    let start = require_finite("batteryHealthStart", analytics.battery_health_start)?;
    let end = require_finite("batteryHealthEnd", analytics.battery_health_end)?;

    let mut canvas = Canvas::new("Analytics Report");
    let mut y = draw_header(&mut canvas, ctx);
    y = draw_title(&mut canvas, ctx, "Analytics Report", y);

    // Period and battery health change
    let content_y = draw_labeled_box(&mut canvas, "Reporting Period", y, 50.0);
    let period = vec![
        ("From", text_or_na(&analytics.period_start)),
        ("To", text_or_na(&analytics.period_end)),
    ];
    let mut py = draw_key_values(&mut canvas, &period, MARGIN_X + 4.0, content_y, 20.0) + 2.0;
    let rule = ColorRule::health();
    for (label, value) in [("Health at start", start), ("Health at end", end)] {
        canvas.text(MARGIN_X + 4.0, py + 4.0, label, TextStyle::body());
        draw_proportional_bar(&mut canvas, MARGIN_X + 40.0, py, 100.0, 4.0, value, &rule);
        canvas.text_right(PAGE_WIDTH - MARGIN_X - 4.0, py + 4.0, &percent(value), TextStyle::label());
        py += 8.0;
    }
    let change = end - start;
    let change_color = if change < 0.0 { Color::RED } else { Color::GREEN };
    canvas.text(
        MARGIN_X + 4.0,
        py + 3.0,
        &format!("Change: {:+.1} points", change),
        TextStyle::label().with_color(change_color),
    );
    y += 58.0;

    // Key metrics
    y = draw_section_heading(&mut canvas, "Key Metrics", y);
    let metrics = vec![
        vec!["Charge cycles".to_string(), number(analytics.charge_cycles, 0, "")],
        vec!["Top speed".to_string(), number(analytics.top_speed, 0, "km/h")],
        vec!["Average speed".to_string(), number(analytics.avg_speed, 0, "km/h")],
        vec!["Power consumption".to_string(), number(analytics.power_consumption, 1, "kWh")],
        vec!["Carbon saved".to_string(), number(analytics.carbon_saved, 0, "kg CO2")],
    ];
    y = draw_table(&mut canvas, &["Metric", "Value"], &metrics, y, &[85.0, 85.0]);

    // Monthly trends
    let trends = merge_trends(analytics);
    if !trends.is_empty() {
        y = draw_section_heading(&mut canvas, "Monthly Trends", y + 4.0);
        let rows: Vec<Vec<String>> = trends
            .iter()
            .map(|(month, [eff, temp, range])| {
                vec![month.clone(), cell(*eff, 0, "%"), cell(*temp, 1, "°C"), cell(*range, 0, "km")]
            })
            .collect();
        let headers = ["Month", "Efficiency", "Temperature", "Range"];
        y = draw_table(&mut canvas, &headers, &rows, y, &[50.0, 40.0, 40.0, 40.0]);
    }

    // Efficiency bars, one per month
    let efficiency: Vec<&TrendPoint> = analytics.efficiency_trend.iter().filter(|p| p.value.is_finite()).collect();
    if !efficiency.is_empty() {
        y = draw_section_heading(&mut canvas, "Efficiency by Month", y + 4.0);
        let bar_rule = ColorRule::solid(Color::BRAND);
        for point in efficiency {
            y = canvas.ensure_space(y, 7.0);
            canvas.text(MARGIN_X, y + 4.0, &point.month, TextStyle::body());
            draw_proportional_bar(&mut canvas, MARGIN_X + 30.0, y, 110.0, 4.0, point.value, &bar_rule);
            canvas.text_right(PAGE_WIDTH - MARGIN_X, y + 4.0, &percent(point.value), TextStyle::body());
            y += 7.0;
        }
    }

    draw_bullets(&mut canvas, "Insights", &insights(analytics), y + 6.0);

    Ok(finish(canvas, ctx))
}
