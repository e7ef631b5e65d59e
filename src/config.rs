/// Configuration resolution module
///
/// This module handles:
/// - Loading the company profile printed on every document
/// - Reading the input records (single export or batch manifest)
/// - Resolving the generation timestamp and output target
/// - Building an immutable ExportPlan from CLI arguments
use crate::cli::CliArgs;
use crate::error::ExportError;
use crate::export::ExportRequest;
use crate::pdf::PdfOptions;
use crate::types::{ExportFormat, ReportData, ReportType, UserContext};
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at a default company profile TOML
pub const COMPANY_CONFIG_ENV: &str = "RETROFIT_COMPANY_CONFIG";

/// Company details printed in document headers and footers.
///
/// Every field is optional in the TOML file; missing ones keep the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub contact: String,
    /// Footer line repeated on every page
    pub disclaimer: String,
    /// Prefix for rendered amounts; the standard PDF fonts cannot encode ₹
    pub currency_prefix: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "VoltRetro EV Conversions Pvt. Ltd.".to_string(),
            address: "Plot 42, Electronic City Phase II, Hosur Road, Bengaluru, Karnataka 560100, India".to_string(),
            contact: "support@voltretro.in | +91 80 4000 1234 | GSTIN 29AAECV1234F1Z5".to_string(),
            disclaimer: "This report is generated from telematics data and is indicative only.".to_string(),
            currency_prefix: "Rs. ".to_string(),
        }
    }
}

impl CompanyProfile {
    pub fn from_toml_str(content: &str) -> Result<Self, ExportError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        debug!("Loading company profile from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Where delivered artifacts go
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Directory(PathBuf),
    Stdout,
}

/// One job of a run; a batch entry that failed to load keeps its error
/// so the run can report it alongside the jobs that did load.
#[derive(Debug)]
pub struct PlannedJob {
    pub report: String,
    pub format: String,
    pub request: Result<ExportRequest, ExportError>,
}

impl PlannedJob {
    fn ready(request: ExportRequest) -> Self {
        Self {
            report: request.report_type().to_string(),
            format: request.format.to_string(),
            request: Ok(request),
        }
    }
}

/// Fully resolved, immutable description of a run
#[derive(Debug)]
pub struct ExportPlan {
    pub jobs: Vec<PlannedJob>,
    pub company: CompanyProfile,
    pub output: OutputTarget,
    pub generated_at: NaiveDateTime,
    pub pdf_options: PdfOptions,
    pub is_batch: bool,
}

/// One entry of a batch manifest
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    report_type: ReportType,
    format: ExportFormat,
    user: String,
    #[serde(default)]
    email: Option<String>,
    data: serde_json::Value,
}

/// Build a complete ExportPlan from CLI arguments
///
/// Everything is loaded and validated upfront. A malformed batch entry
/// becomes a failed job instead of aborting the whole run.
pub fn build_export_plan(args: &CliArgs) -> Result<ExportPlan, ExportError> {
    debug!("Building export plan from CLI args");

    let company = resolve_company(args)?;
    let generated_at = resolve_generated_at(args)?;

    let (jobs, is_batch) = match args.batch {
        Some(ref manifest) => (load_batch(manifest)?, true),
        None => (vec![PlannedJob::ready(load_single_job(args)?)], false),
    };

    debug!("Resolved {} export job(s)", jobs.len());

    let output = if args.stdout { OutputTarget::Stdout } else { OutputTarget::Directory(args.get_output_dir()) };

    Ok(ExportPlan {
        jobs,
        company,
        output,
        generated_at,
        pdf_options: PdfOptions { compress: !args.no_compress },
        is_batch,
    })
}

/// --company, then $RETROFIT_COMPANY_CONFIG, then the built-in profile
fn resolve_company(args: &CliArgs) -> Result<CompanyProfile, ExportError> {
    if let Some(ref path) = args.company {
        return CompanyProfile::load(path);
    }
    match env::var(COMPANY_CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => CompanyProfile::load(Path::new(&path)),
        _ => Ok(CompanyProfile::default()),
    }
}

/// --date keeps the current time of day so reference codes stay unique
fn resolve_generated_at(args: &CliArgs) -> Result<NaiveDateTime, ExportError> {
    let now = Local::now().naive_local();
    match args.date {
        Some(ref date) => {
            let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| ExportError::InvalidInput(format!("--date '{}': {}", date, e)))?;
            Ok(day.and_time(now.time()))
        }
        None => Ok(now),
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value, ExportError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ExportError::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&content)?)
}

fn load_single_job(args: &CliArgs) -> Result<ExportRequest, ExportError> {
    let report_type = args.report_type.ok_or_else(|| ExportError::InvalidInput("missing --type".to_string()))?;
    let input = args.input.as_ref().ok_or_else(|| ExportError::InvalidInput("missing --input".to_string()))?;
    let user_name = args.user.as_deref().unwrap_or_default();

    debug!("Loading {} records from {:?}", report_type, input);
    let data = ReportData::from_value(report_type, read_json(input)?).map_err(|e| {
        ExportError::InvalidInput(format!("{} does not hold {} records: {}", input.display(), report_type, e))
    })?;

    let mut user = UserContext::new(user_name);
    user.email = args.email.clone();

    Ok(ExportRequest { format: args.format, data, user })
}

fn load_batch(manifest: &Path) -> Result<Vec<PlannedJob>, ExportError> {
    debug!("Loading batch manifest {:?}", manifest);
    let entries: Vec<serde_json::Value> = serde_json::from_value(read_json(manifest)?)?;
    if entries.is_empty() {
        return Err(ExportError::InvalidInput(format!("{} contains no jobs", manifest.display())));
    }

    Ok(entries.into_iter().enumerate().map(|(i, raw)| load_batch_entry(i + 1, raw)).collect())
}

fn load_batch_entry(number: usize, raw: serde_json::Value) -> PlannedJob {
    let label = |key: &str| raw.get(key).and_then(|v| v.as_str()).unwrap_or("?").to_string();
    let (report, format) = (label("reportType"), label("format"));

    let request = serde_json::from_value::<BatchEntry>(raw)
        .map_err(|e| ExportError::InvalidInput(format!("job #{}: {}", number, e)))
        .and_then(|entry| {
            let data = ReportData::from_value(entry.report_type, entry.data).map_err(|e| {
                ExportError::InvalidInput(format!("job #{} ({}): {}", number, entry.report_type, e))
            })?;
            let mut user = UserContext::new(&entry.user);
            user.email = entry.email;
            Ok(ExportRequest { format: entry.format, data, user })
        });

    if let Err(ref e) = request {
        debug!("Batch entry rejected: {}", e);
    }
    PlannedJob { report, format, request }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
