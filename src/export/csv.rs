//! CSV serialization of report records.
//!
//! Each report type has a fixed header row. Fields are quoted only when
//! they contain a delimiter, quote or line break; non-finite numbers are
//! written as empty fields.

use crate::builders::RenderContext;
use crate::builders::analytics::merge_trends;
use crate::builders::invoice::InvoiceTotals;
use crate::types::{AnalyticsRecord, BatteryPayload, ComplianceRecord, InvoiceRecord, ReportData, ServiceTicketRecord};

pub const BATTERY_HEADER: &[&str] = &["Date", "Health", "Efficiency", "Temperature", "Range", "Cycles"];
pub const ANALYTICS_HEADER: &[&str] = &["Month", "Efficiency", "Temperature", "Range"];
pub const COMPLIANCE_HEADER: &[&str] = &["Requirement", "Status", "Last Checked", "Notes"];
pub const TICKET_HEADER: &[&str] =
    &["ID", "Title", "Category", "Priority", "Status", "Vehicle ID", "Created", "Updated", "Description"];
pub const INVOICE_HEADER: &[&str] = &[
    "Invoice Number",
    "Date",
    "Customer",
    "Email",
    "Plan",
    "Billing Period",
    "Amount",
    "CGST",
    "SGST",
    "Total",
    "Next Billing",
];

/// Quote a field when it would otherwise break the row
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn num(value: f64) -> String {
    if value.is_finite() { value.to_string() } else { String::new() }
}

fn opt_num(value: Option<f64>) -> String {
    value.map(num).unwrap_or_default()
}

fn money(value: f64) -> String {
    if value.is_finite() { format!("{:.2}", value) } else { String::new() }
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f.as_ref())).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Render the CSV text for a report
pub fn render(data: &ReportData, ctx: &RenderContext) -> String {
    match data {
        ReportData::Battery(payload) => battery_csv(payload, ctx),
        ReportData::ServiceTicket { ticket } => ticket_csv(ticket),
        ReportData::Invoice { invoice } => invoice_csv(invoice),
        ReportData::Analytics { analytics } => analytics_csv(analytics),
        ReportData::Compliance { compliance } => compliance_csv(compliance),
    }
}

fn battery_csv(payload: &BatteryPayload, ctx: &RenderContext) -> String {
    let mut out = String::new();
    push_row(&mut out, BATTERY_HEADER);

    if payload.history.is_empty() {
        // Snapshot of the current record, dated at generation time
        let b = &payload.battery;
        push_row(
            &mut out,
            &[
                ctx.generated_date(),
                num(b.current_health),
                num(b.efficiency),
                num(b.average_temp),
                num(b.range),
                num(b.charging_cycles),
            ],
        );
    } else {
        for s in &payload.history {
            push_row(
                &mut out,
                &[s.date.clone(), num(s.health), num(s.efficiency), num(s.temperature), num(s.range), num(s.cycles)],
            );
        }
    }
    out
}

fn analytics_csv(analytics: &AnalyticsRecord) -> String {
    let mut out = String::new();
    push_row(&mut out, ANALYTICS_HEADER);
    for (month, [eff, temp, range]) in merge_trends(analytics) {
        push_row(&mut out, &[month, opt_num(eff), opt_num(temp), opt_num(range)]);
    }
    out
}

fn compliance_csv(compliance: &ComplianceRecord) -> String {
    let mut out = String::new();
    push_row(&mut out, COMPLIANCE_HEADER);
    for check in &compliance.checks {
        push_row(&mut out, &[&check.requirement, &check.status, &check.last_checked, &check.notes]);
    }
    out
}

fn ticket_csv(ticket: &ServiceTicketRecord) -> String {
    let mut out = String::new();
    push_row(&mut out, TICKET_HEADER);
    push_row(
        &mut out,
        &[
            ticket.id.as_str(),
            ticket.title.as_str(),
            ticket.category.as_str(),
            ticket.priority.as_str(),
            ticket.status.as_str(),
            ticket.vehicle_id.as_str(),
            ticket.created_at.as_str(),
            ticket.updated_at.as_str(),
            ticket.description.as_str(),
        ],
    );
    out
}

fn invoice_csv(invoice: &InvoiceRecord) -> String {
    let mut out = String::new();
    push_row(&mut out, INVOICE_HEADER);
    let (amount, cgst, sgst, total) = if invoice.amount.is_finite() {
        let t = InvoiceTotals::compute(invoice.amount);
        (money(t.base), money(t.cgst), money(t.sgst), money(t.total))
    } else {
        Default::default()
    };
    push_row(
        &mut out,
        &[
            invoice.invoice_number.clone(),
            invoice.date.clone(),
            invoice.customer.clone(),
            invoice.email.clone(),
            invoice.plan.clone(),
            invoice.billing_period.clone(),
            amount,
            cgst,
            sgst,
            total,
            invoice.next_billing.clone(),
        ],
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_support::context;
    use crate::types::{BatteryHealthRecord, BatterySample, ComplianceCheck, ReportType, VehicleRecord};
    use serde_json::json;

    fn battery_payload(history: Vec<BatterySample>) -> BatteryPayload {
        BatteryPayload {
            battery: BatteryHealthRecord {
                current_health: 97.0,
                projected_health: 90.0,
                cell_balance: 98.0,
                charging_cycles: 124.0,
                capacity_retention: 96.0,
                range: 312.0,
                efficiency: 91.5,
                average_temp: f64::NAN,
                last_charge: String::new(),
                next_service: String::new(),
            },
            vehicle: VehicleRecord {
                model: "X".to_string(),
                battery_type: "Y".to_string(),
                range: String::new(),
                power: String::new(),
                capacity: String::new(),
                registration_number: None,
            },
            usage: None,
            history,
        }
    }

    #[test]
    fn test_escape_field_quotes_only_when_needed() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_battery_snapshot_row_without_history() {
        let csv = render(&ReportData::Battery(battery_payload(vec![])), &context());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Health,Efficiency,Temperature,Range,Cycles");
        assert_eq!(lines[1], "2024-03-15,97,91.5,,312,124");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_battery_history_rows() {
        let history = vec![
            BatterySample {
                date: "2024-01-01".to_string(),
                health: 99.0,
                efficiency: 90.0,
                temperature: 25.0,
                range: 320.0,
                cycles: 80.0,
            },
            BatterySample {
                date: "2024-02-01".to_string(),
                health: 98.0,
                efficiency: 91.0,
                temperature: 26.5,
                range: 318.0,
                cycles: 102.0,
            },
        ];
        let csv = render(&ReportData::Battery(battery_payload(history)), &context());
        assert_eq!(csv.lines().nth(2), Some("2024-02-01,98,91,26.5,318,102"));
    }

    #[test]
    fn test_invoice_row_includes_gst_split() {
        let data = ReportData::from_value(
            ReportType::Invoice,
            json!({"invoice": {
                "invoiceNumber": "INV-7",
                "date": "2024-03-01",
                "customer": "Rao, Asha",
                "plan": "Basic",
                "amount": "₹1,000.00"
            }}),
        )
        .unwrap();
        let csv = render(&data, &context());
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "INV-7,2024-03-01,\"Rao, Asha\",,Basic,,1000.00,90.00,90.00,1180.00,");
    }

    #[test]
    fn test_compliance_rows() {
        let record = ComplianceRecord {
            vehicle_id: "VEH-1".to_string(),
            checks: vec![ComplianceCheck {
                requirement: "AIS-123 retrofit approval".to_string(),
                status: "compliant".to_string(),
                last_checked: "2024-02-20".to_string(),
                notes: String::new(),
            }],
        };
        let csv = render(&ReportData::Compliance { compliance: record }, &context());
        assert_eq!(csv, "Requirement,Status,Last Checked,Notes\nAIS-123 retrofit approval,compliant,2024-02-20,\n");
    }
}
