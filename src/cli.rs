use crate::types::{ExportFormat, ReportType};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Get the default download directory for exported reports
/// Uses the platform download directory:
/// - Linux: $XDG_DOWNLOAD_DIR or ~/Downloads
/// - macOS: ~/Downloads
/// - Windows: {FOLDERID_Downloads}
/// Falls back to ./exports when no download directory is known.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("exports"))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "retrofit-reports")]
#[command(about = "Export battery health, service, billing and analytics reports as PDF, CSV or JSON")]
#[command(version)]
pub struct CliArgs {
    /// Kind of report to export
    #[arg(long = "type", short = 't', value_enum, value_name = "REPORT")]
    pub report_type: Option<ReportType>,

    /// Artifact format
    #[arg(long, short = 'f', value_enum, default_value = "pdf")]
    pub format: ExportFormat,

    /// JSON file holding the records for the report
    /// Battery: {"battery": {...}, "vehicle": {...}, "usage": {...}, "history": [...]}
    /// Others: {"ticket": {...}}, {"invoice": {...}}, {"analytics": {...}}, {"compliance": {...}}
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Display name of the person the report is generated for
    #[arg(long, short = 'u', value_name = "NAME")]
    pub user: Option<String>,

    /// Email of the person the report is generated for
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Export every job in a JSON manifest:
    /// [{"reportType": "battery", "format": "pdf", "user": "...", "data": {...}}, ...]
    #[arg(long, value_name = "MANIFEST", conflicts_with_all = ["report_type", "input"])]
    pub batch: Option<PathBuf>,

    /// Directory to save artifacts into
    /// Default: the platform download directory
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the artifact to stdout instead of a file
    #[arg(long, conflicts_with = "output_dir")]
    pub stdout: bool,

    /// Company profile TOML (name, address, contact, disclaimer, currency_prefix)
    /// Default: $RETROFIT_COMPANY_CONFIG, then built-in profile
    #[arg(long, value_name = "FILE")]
    pub company: Option<PathBuf>,

    /// Override the generation date used in filenames and documents
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Leave PDF content streams uncompressed (useful for inspecting output)
    #[arg(long)]
    pub no_compress: bool,

    /// Override console width for the batch summary table (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.batch.is_some() {
            if self.stdout {
                return Err("Cannot use --stdout with --batch (a batch produces several files)".to_string());
            }
        } else {
            if self.report_type.is_none() {
                return Err("Must specify --type (or --batch <MANIFEST>)".to_string());
            }
            if self.input.is_none() {
                return Err("Must specify --input <FILE> with the report records".to_string());
            }
            if self.user.as_deref().map(str::trim).unwrap_or("").is_empty() {
                return Err("Must specify --user <NAME> for the report recipient".to_string());
            }
        }

        if let Some(ref date) = self.date
            && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err()
        {
            return Err(format!("Invalid --date '{}': expected YYYY-MM-DD", date));
        }

        Ok(())
    }

    /// Get the output directory, using the platform download directory if not specified
    pub fn get_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_download_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            report_type: Some(ReportType::Battery),
            format: ExportFormat::Pdf,
            input: Some(PathBuf::from("battery.json")),
            user: Some("Asha Rao".to_string()),
            email: None,
            batch: None,
            output_dir: None,
            stdout: false,
            company: None,
            date: None,
            no_compress: false,
            console_width: None,
        }
    }

    #[test]
    fn test_validate_valid_single_export_succeeds() {
        assert!(base_args().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_user_fails() {
        let args = CliArgs { user: Some("  ".to_string()), ..base_args() };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_missing_type_without_batch_fails() {
        let args = CliArgs { report_type: None, ..base_args() };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_batch_with_stdout_fails() {
        let args = CliArgs {
            report_type: None,
            input: None,
            batch: Some(PathBuf::from("jobs.json")),
            stdout: true,
            ..base_args()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_bad_date_fails() {
        let args = CliArgs { date: Some("15/03/2024".to_string()), ..base_args() };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "retrofit-reports",
            "--type",
            "service-ticket",
            "--format",
            "csv",
            "--input",
            "ticket.json",
            "--user",
            "Asha",
        ])
        .unwrap();
        assert_eq!(args.report_type, Some(ReportType::ServiceTicket));
        assert_eq!(args.format, ExportFormat::Csv);
    }

    #[test]
    fn test_batch_conflicts_with_type() {
        let result =
            CliArgs::try_parse_from(["retrofit-reports", "--batch", "jobs.json", "--type", "battery"]);
        assert!(result.is_err());
    }
}
