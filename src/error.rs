//! Error types for the export pipeline.
//!
//! `BuildError` stays inside the document builders and is turned into a
//! fallback document. `ExportError` is what callers of the dispatcher and
//! the download sinks see.

use crate::types::{ExportFormat, ReportType};
use thiserror::Error;

/// Export errors surfaced to the caller.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{format} export is not supported for {report_type} reports")]
    Unsupported { report_type: ReportType, format: ExportFormat },

    #[error("PDF encoding failed: {0}")]
    Pdf(String),
}

/// Reasons a document builder gives up on a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("field `{field}` is not a finite number")]
    MalformedField { field: &'static str },

    #[error("field `{field}` is empty")]
    MissingField { field: &'static str },
}
