/// Core data structures for report exports
///
/// This module defines the records consumed by the document builders and
/// serializers, plus the report type / format selectors used by the dispatcher.
/// Records are plain value objects: they are deserialized once, passed by
/// reference into an export, and dropped.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

fn nan() -> f64 {
    f64::NAN
}

/// Accept numbers, numeric strings ("₹1,499.00", "97%") or null.
///
/// Anything that does not parse becomes NaN so the builders can decide
/// whether to degrade the field or fall back to an error document.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) => parse_loose_number(&s),
        _ => f64::NAN,
    })
}

/// Parse a display-formatted number, dropping currency symbols, units and separators.
///
/// The number starts at the first digit (or a sign or point directly before
/// one), so prefixes like "Rs. " or "INR " never leak a stray '.' into the
/// value. Commas are only accepted as thousands separators between digits.
pub fn parse_loose_number(s: &str) -> f64 {
    let chars: Vec<char> = s.chars().collect();
    let starts_number = |i: usize| {
        let c = chars[i];
        c.is_ascii_digit()
            || (matches!(c, '-' | '+' | '.') && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
    };
    let Some(start) = (0..chars.len()).find(|&i| starts_number(i)) else {
        return f64::NAN;
    };

    let run: Vec<char> = chars[start..]
        .iter()
        .copied()
        .take_while(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | 'e' | 'E' | '+' | '-'))
        .collect();
    let end = run.iter().rposition(|c| c.is_ascii_digit() || *c == '.').map_or(0, |i| i + 1);
    let run = &run[..end];

    let mut cleaned = String::with_capacity(run.len());
    for (i, c) in run.iter().enumerate() {
        if *c == ',' {
            let between_digits = i > 0
                && run[i - 1].is_ascii_digit()
                && run.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if !between_digits {
                return f64::NAN;
            }
        } else {
            cleaned.push(*c);
        }
    }
    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}

//
// Report selectors
//

/// Kind of report requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    Battery,
    ServiceTicket,
    Invoice,
    Analytics,
    Compliance,
}

impl ReportType {
    /// Slug used in filenames and JSON envelopes
    pub fn slug(&self) -> &'static str {
        match self {
            ReportType::Battery => "battery",
            ReportType::ServiceTicket => "service-ticket",
            ReportType::Invoice => "invoice",
            ReportType::Analytics => "analytics",
            ReportType::Compliance => "compliance",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Identity of the person the report is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl UserContext {
    pub fn new(display_name: &str) -> Self {
        Self { display_name: display_name.to_string(), email: None, user_id: None }
    }
}

//
// Battery records
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryHealthRecord {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub current_health: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub projected_health: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub cell_balance: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub charging_cycles: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub capacity_retention: f64,
    /// Estimated range in km
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub range: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub efficiency: f64,
    /// Average pack temperature in °C
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub average_temp: f64,
    #[serde(default)]
    pub last_charge: String,
    #[serde(default)]
    pub next_service: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub model: String,
    pub battery_type: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub power: String,
    #[serde(default)]
    pub capacity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub weekly_distance: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub monthly_distance: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub total_distance: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub avg_efficiency: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub avg_temp: f64,
}

/// One historical battery reading, used for the battery CSV export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySample {
    pub date: String,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub health: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub efficiency: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub temperature: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub range: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub cycles: f64,
}

//
// Service tickets
//

/// Declares a wire-string enum that keeps unknown values as `Other(raw)`.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Other(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

wire_enum!(
    /// Ticket category as stored by the support desk
    TicketCategory {
        Battery => "battery",
        Charging => "charging",
        ElectricMotor => "electric_motor",
        Controller => "controller",
        Mechanical => "mechanical",
        Software => "software",
        Misc => "other",
    }
);

wire_enum!(
    TicketPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
);

wire_enum!(
    TicketStatus {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTicketRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub vehicle_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

//
// Billing
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub invoice_number: String,
    pub date: String,
    pub customer: String,
    #[serde(default)]
    pub email: String,
    pub plan: String,
    /// Base amount before tax
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default)]
    pub next_billing: String,
    #[serde(default)]
    pub billing_period: String,
}

//
// Analytics
//

/// A single month→value point of a trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRecord {
    pub period_start: String,
    pub period_end: String,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub battery_health_start: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub battery_health_end: f64,
    #[serde(default)]
    pub efficiency_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub temperature_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub range_trend: Vec<TrendPoint>,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub charge_cycles: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub top_speed: f64,
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub avg_speed: f64,
    /// kWh consumed over the period
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub power_consumption: f64,
    /// kg of CO₂ avoided over the period
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub carbon_saved: f64,
}

//
// Compliance
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCheck {
    pub requirement: String,
    pub status: String,
    #[serde(default)]
    pub last_checked: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRecord {
    #[serde(default)]
    pub vehicle_id: String,
    #[serde(default)]
    pub checks: Vec<ComplianceCheck>,
}

//
// Per-report payloads
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryPayload {
    pub battery: BatteryHealthRecord,
    pub vehicle: VehicleRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageRecord>,
    #[serde(default)]
    pub history: Vec<BatterySample>,
}

/// Data handed to a single export, tagged by report type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Battery(BatteryPayload),
    ServiceTicket { ticket: ServiceTicketRecord },
    Invoice { invoice: InvoiceRecord },
    Analytics { analytics: AnalyticsRecord },
    Compliance { compliance: ComplianceRecord },
}

#[derive(Deserialize)]
struct TicketPayload {
    ticket: ServiceTicketRecord,
}

#[derive(Deserialize)]
struct InvoicePayload {
    invoice: InvoiceRecord,
}

#[derive(Deserialize)]
struct AnalyticsPayload {
    analytics: AnalyticsRecord,
}

#[derive(Deserialize)]
struct CompliancePayload {
    compliance: ComplianceRecord,
}

impl ReportData {
    /// Interpret a JSON payload according to the requested report type
    pub fn from_value(report_type: ReportType, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match report_type {
            ReportType::Battery => ReportData::Battery(serde_json::from_value(value)?),
            ReportType::ServiceTicket => {
                let payload: TicketPayload = serde_json::from_value(value)?;
                ReportData::ServiceTicket { ticket: payload.ticket }
            }
            ReportType::Invoice => {
                let payload: InvoicePayload = serde_json::from_value(value)?;
                ReportData::Invoice { invoice: payload.invoice }
            }
            ReportType::Analytics => {
                let payload: AnalyticsPayload = serde_json::from_value(value)?;
                ReportData::Analytics { analytics: payload.analytics }
            }
            ReportType::Compliance => {
                let payload: CompliancePayload = serde_json::from_value(value)?;
                ReportData::Compliance { compliance: payload.compliance }
            }
        })
    }

    pub fn report_type(&self) -> ReportType {
        match self {
            ReportData::Battery(_) => ReportType::Battery,
            ReportData::ServiceTicket { .. } => ReportType::ServiceTicket,
            ReportData::Invoice { .. } => ReportType::Invoice,
            ReportData::Analytics { .. } => ReportType::Analytics,
            ReportData::Compliance { .. } => ReportType::Compliance,
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
