//! Export dispatcher.
//!
//! Maps a (report type, format) request onto the right builder or
//! serializer and returns an in-memory `Artifact`. Delivering the artifact
//! is the job of a `DownloadSink`.

pub mod csv;
pub mod json;
pub mod sink;

use crate::builders::{self, DocumentKind, RenderContext, render_or_fallback};
use crate::config::CompanyProfile;
use crate::error::ExportError;
use crate::layout::Document;
use crate::pdf::{self, PdfOptions};
use crate::types::{ExportFormat, ReportData, ReportType, UserContext};
use chrono::NaiveDateTime;
use log::debug;
use std::collections::HashSet;

pub use sink::{Delivery, DirectorySink, DownloadSink, StdoutSink};

/// One requested export
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub data: ReportData,
    pub user: UserContext,
}

impl ExportRequest {
    pub fn report_type(&self) -> ReportType {
        self.data.report_type()
    }
}

/// Run-wide settings shared by every export
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub company: CompanyProfile,
    pub generated_at: NaiveDateTime,
    pub pdf_options: PdfOptions,
}

impl ExportSettings {
    fn context_for(&self, user: &UserContext) -> RenderContext {
        RenderContext::new(user.clone(), self.company.clone(), self.generated_at)
    }
}

/// A finished file, ready to hand to a sink
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// `{slug}-report-{date}.pdf` or `{slug}-data-{date}.{csv|json}`
pub fn artifact_filename(report_type: ReportType, format: ExportFormat, date: &str) -> String {
    let kind = match format {
        ExportFormat::Pdf => "report",
        ExportFormat::Csv | ExportFormat::Json => "data",
    };
    format!("{}-{}-{}.{}", report_type.slug(), kind, date, format.extension())
}

/// `name`, or `name` with `-2`, `-3`, ... before the extension when an
/// earlier artifact of the same run already took it
pub fn unique_filename(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    (2..)
        .map(|n| format!("{}-{}{}", stem, n, ext))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Lay out the PDF document for a report.
///
/// Builder failures become the one-page fallback document; only report
/// types without a document layout are errors.
pub fn build_document(data: &ReportData, ctx: &RenderContext) -> Result<Document, ExportError> {
    let doc = match data {
        ReportData::Battery(payload) => render_or_fallback(DocumentKind::BatteryHealth, ctx, |c| {
            builders::battery::build(&payload.battery, &payload.vehicle, payload.usage.as_ref(), c)
        }),
        ReportData::ServiceTicket { ticket } => {
            render_or_fallback(DocumentKind::ServiceTicket, ctx, |c| builders::ticket::build(ticket, c))
        }
        ReportData::Invoice { invoice } => {
            render_or_fallback(DocumentKind::Invoice, ctx, |c| builders::invoice::build(invoice, c))
        }
        ReportData::Analytics { analytics } => {
            render_or_fallback(DocumentKind::Analytics, ctx, |c| builders::analytics::build(analytics, c))
        }
        ReportData::Compliance { .. } => {
            return Err(ExportError::Unsupported { report_type: ReportType::Compliance, format: ExportFormat::Pdf });
        }
    };
    Ok(doc)
}

/// Produce the artifact for one request.
pub fn export(request: &ExportRequest, settings: &ExportSettings) -> Result<Artifact, ExportError> {
    let report_type = request.report_type();
    let ctx = settings.context_for(&request.user);
    debug!("exporting {} as {} for {}", report_type, request.format, ctx.user.display_name);

    let bytes = match request.format {
        ExportFormat::Pdf => {
            let doc = build_document(&request.data, &ctx)?;
            debug!("{} laid out on {} page(s)", doc.title, doc.pages.len());
            pdf::write_pdf(&doc, settings.pdf_options)?
        }
        ExportFormat::Csv => csv::render(&request.data, &ctx).into_bytes(),
        ExportFormat::Json => json::render(&request.data, &ctx)?,
    };

    Ok(Artifact {
        filename: artifact_filename(report_type, request.format, &ctx.generated_date()),
        mime: request.format.mime(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn settings() -> ExportSettings {
        ExportSettings {
            company: CompanyProfile::default(),
            generated_at: NaiveDate::from_ymd_opt(2024, 3, 15).and_then(|d| d.and_hms_opt(9, 0, 0)).unwrap(),
            pdf_options: PdfOptions { compress: false },
        }
    }

    fn request(report_type: ReportType, format: ExportFormat, data: serde_json::Value) -> ExportRequest {
        ExportRequest {
            format,
            data: ReportData::from_value(report_type, data).unwrap(),
            user: UserContext::new("Asha Rao"),
        }
    }

    fn ticket_json() -> serde_json::Value {
        json!({"ticket": {
            "id": "TKT-1",
            "title": "Charger fault",
            "category": "charging",
            "priority": "urgent",
            "status": "open"
        }})
    }

    #[test]
    fn test_artifact_filenames() {
        assert_eq!(
            artifact_filename(ReportType::Battery, ExportFormat::Pdf, "2024-03-15"),
            "battery-report-2024-03-15.pdf"
        );
        assert_eq!(
            artifact_filename(ReportType::ServiceTicket, ExportFormat::Csv, "2024-03-15"),
            "service-ticket-data-2024-03-15.csv"
        );
        assert_eq!(
            artifact_filename(ReportType::Analytics, ExportFormat::Json, "2024-03-15"),
            "analytics-data-2024-03-15.json"
        );
    }

    #[test]
    fn test_unique_filename_suffixes_before_extension() {
        let mut taken = HashSet::new();
        assert_eq!(unique_filename("battery-report-2024-03-15.pdf", &taken), "battery-report-2024-03-15.pdf");

        taken.insert("battery-report-2024-03-15.pdf".to_string());
        assert_eq!(unique_filename("battery-report-2024-03-15.pdf", &taken), "battery-report-2024-03-15-2.pdf");

        taken.insert("battery-report-2024-03-15-2.pdf".to_string());
        assert_eq!(unique_filename("battery-report-2024-03-15.pdf", &taken), "battery-report-2024-03-15-3.pdf");

        taken.insert("notes".to_string());
        assert_eq!(unique_filename("notes", &taken), "notes-2");
    }

    #[test]
    fn test_pdf_export_produces_pdf_bytes() {
        let artifact =
            export(&request(ReportType::ServiceTicket, ExportFormat::Pdf, ticket_json()), &settings()).unwrap();
        assert_eq!(artifact.mime, "application/pdf");
        assert_eq!(artifact.filename, "service-ticket-report-2024-03-15.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_csv_export_mime_and_header() {
        let artifact =
            export(&request(ReportType::ServiceTicket, ExportFormat::Csv, ticket_json()), &settings()).unwrap();
        assert_eq!(artifact.mime, "text/csv");
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.starts_with("ID,Title,Category"));
        assert!(text.contains("TKT-1,Charger fault,charging,urgent,open"));
    }

    #[test]
    fn test_compliance_pdf_is_unsupported() {
        let req = request(ReportType::Compliance, ExportFormat::Pdf, json!({"compliance": {"checks": []}}));
        let err = export(&req, &settings()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Unsupported { report_type: ReportType::Compliance, format: ExportFormat::Pdf }
        ));
    }

    #[test]
    fn test_compliance_csv_is_supported() {
        let req = request(ReportType::Compliance, ExportFormat::Csv, json!({"compliance": {"checks": []}}));
        let artifact = export(&req, &settings()).unwrap();
        assert_eq!(artifact.bytes, b"Requirement,Status,Last Checked,Notes\n");
    }

    #[test]
    fn test_broken_record_still_yields_fallback_pdf() {
        let data = json!({"invoice": {
            "invoiceNumber": "INV-3",
            "date": "2024-03-01",
            "customer": "Asha Rao",
            "plan": "Basic",
            "amount": "not a number"
        }});
        let ctx = settings().context_for(&UserContext::new("Asha Rao"));
        let doc = build_document(&ReportData::from_value(ReportType::Invoice, data).unwrap(), &ctx).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.contains_text("INV-ERR-"));
    }
}
