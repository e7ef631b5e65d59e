//! Value formatting and validation helpers for document builders.

use crate::error::BuildError;

pub const NOT_AVAILABLE: &str = "N/A";

/// Fail the build if a layout-driving field is NaN or infinite
pub fn require_finite(field: &'static str, value: f64) -> Result<f64, BuildError> {
    if value.is_finite() { Ok(value) } else { Err(BuildError::MalformedField { field }) }
}

/// Fail the build if an identifying field is blank
pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, BuildError> {
    if value.trim().is_empty() { Err(BuildError::MissingField { field }) } else { Ok(value) }
}

/// "97%" (no decimals); "N/A" when not finite
pub fn percent(value: f64) -> String {
    if value.is_finite() { format!("{:.0}%", value) } else { NOT_AVAILABLE.to_string() }
}

/// Number with fixed decimals and a unit suffix; "N/A" when not finite
pub fn number(value: f64, decimals: usize, unit: &str) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if unit.is_empty() { format!("{:.*}", decimals, value) } else { format!("{:.*} {}", decimals, value, unit) }
}

/// Display text, or "N/A" when blank
pub fn text_or_na(value: &str) -> String {
    if value.trim().is_empty() { NOT_AVAILABLE.to_string() } else { value.to_string() }
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Currency amount with thousands separators: "Rs. 1,499.00"
pub fn money(prefix: &str, value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{:.2}", round2(value).abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && round2(value) != 0.0 { "-" } else { "" };
    format!("{}{}{}.{}", sign, prefix, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_formats_whole_numbers() {
        assert_eq!(percent(97.0), "97%");
        assert_eq!(percent(f64::NAN), "N/A");
    }

    #[test]
    fn test_number_with_unit() {
        assert_eq!(number(28.04, 1, "°C"), "28.0 °C");
        assert_eq!(number(312.0, 0, ""), "312");
        assert_eq!(number(f64::INFINITY, 0, "km"), "N/A");
    }

    #[test]
    fn test_money_groups_thousands() {
        assert_eq!(money("Rs. ", 1499.0), "Rs. 1,499.00");
        assert_eq!(money("Rs. ", 1234567.891), "Rs. 1,234,567.89");
        assert_eq!(money("", 999.5), "999.50");
        assert_eq!(money("Rs. ", -20.0), "-Rs. 20.00");
    }

    #[test]
    fn test_require_finite_rejects_nan() {
        assert_eq!(require_finite("currentHealth", 97.0), Ok(97.0));
        assert_eq!(
            require_finite("currentHealth", f64::NAN),
            Err(BuildError::MalformedField { field: "currentHealth" })
        );
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text("id", "  ").is_err());
        assert_eq!(require_text("id", "TKT-1"), Ok("TKT-1"));
    }
}
