//! JSON export envelope.

use crate::builders::RenderContext;
use crate::builders::invoice::InvoiceTotals;
use crate::error::ExportError;
use crate::types::ReportData;
use serde_json::json;

/// Serialize `{reportType, user, generatedAt, data}` as pretty-printed JSON.
///
/// Invoices also carry the computed `totals` so consumers do not need to
/// repeat the GST arithmetic. Non-finite numbers serialize as `null`.
pub fn render(data: &ReportData, ctx: &RenderContext) -> Result<Vec<u8>, ExportError> {
    let mut envelope = json!({
        "reportType": data.report_type(),
        "user": ctx.user,
        "generatedAt": ctx.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "data": data,
    });

    if let ReportData::Invoice { invoice } = data
        && invoice.amount.is_finite()
    {
        envelope["totals"] = serde_json::to_value(InvoiceTotals::compute(invoice.amount))?;
    }

    let mut bytes = serde_json::to_vec_pretty(&envelope)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_support::context;
    use crate::types::ReportType;
    use serde_json::Value;

    #[test]
    fn test_envelope_shape() {
        let data = ReportData::from_value(
            ReportType::ServiceTicket,
            json!({"ticket": {
                "id": "TKT-9",
                "title": "Noise",
                "category": "electric_motor",
                "priority": "low",
                "status": "escalated"
            }}),
        )
        .unwrap();
        let bytes = render(&data, &context()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["reportType"], "service-ticket");
        assert_eq!(value["user"]["displayName"], "Asha Rao");
        assert_eq!(value["generatedAt"], "2024-03-15T10:30:00");
        assert_eq!(value["data"]["ticket"]["category"], "electric_motor");
        assert_eq!(value["data"]["ticket"]["status"], "escalated");
        assert!(value.get("totals").is_none());
    }

    #[test]
    fn test_invoice_envelope_has_totals() {
        let data = ReportData::from_value(
            ReportType::Invoice,
            json!({"invoice": {
                "invoiceNumber": "INV-1",
                "date": "2024-03-01",
                "customer": "Asha Rao",
                "plan": "Premium",
                "amount": 2000
            }}),
        )
        .unwrap();
        let value: Value = serde_json::from_slice(&render(&data, &context()).unwrap()).unwrap();
        assert_eq!(value["totals"]["cgst"], 180.0);
        assert_eq!(value["totals"]["total"], 2360.0);
        assert_eq!(value["data"]["invoice"]["amount"], 2000.0);
    }

    #[test]
    fn test_nan_fields_serialize_as_null() {
        let data = ReportData::from_value(
            ReportType::Analytics,
            json!({"analytics": {
                "periodStart": "2024-01-01",
                "periodEnd": "2024-03-31",
                "batteryHealthStart": "n/a",
                "batteryHealthEnd": 95
            }}),
        )
        .unwrap();
        let value: Value = serde_json::from_slice(&render(&data, &context()).unwrap()).unwrap();
        assert!(value["data"]["analytics"]["batteryHealthStart"].is_null());
        assert_eq!(value["data"]["analytics"]["batteryHealthEnd"], 95.0);
    }
}
