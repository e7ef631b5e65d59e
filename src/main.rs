// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod builders;
mod cli;
mod config;
mod console_format;
mod error;
mod export;
mod layout;
mod pdf;
mod types;
mod ui;

use config::{OutputTarget, PlannedJob};
use console_format::{TableWriter, format_size};
use error::ExportError;
use export::{Delivery, DirectorySink, DownloadSink, ExportSettings, StdoutSink};
use log::{debug, warn};
use std::collections::HashSet;
use std::io;

/// Result of one job in a run
struct JobOutcome {
    request_label: (String, String),
    result: Result<(Delivery, usize), ExportError>,
}

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    // Resolve company profile, records and output target
    let plan = match config::build_export_plan(&args) {
        Ok(p) => p,
        Err(e) => {
            ui::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let settings = ExportSettings {
        company: plan.company.clone(),
        generated_at: plan.generated_at,
        pdf_options: plan.pdf_options,
    };

    let is_batch = plan.is_batch;
    let output = plan.output;
    let outcomes = match output {
        OutputTarget::Directory(ref dir) => {
            let mut sink = DirectorySink::new(dir);
            debug!("Delivering to {}", sink.dir().display());
            run_jobs(plan.jobs, &settings, &mut sink)
        }
        OutputTarget::Stdout => run_jobs(plan.jobs, &settings, &mut StdoutSink::new(io::stdout().lock())),
    };

    std::process::exit(report_outcomes(is_batch, &output, &outcomes));
}

/// Export and deliver every job in order; a failed job does not stop the run.
///
/// Filenames only carry the type and date, so a second artifact with the
/// same name in one run is renamed instead of replacing the first.
fn run_jobs<S: DownloadSink>(jobs: Vec<PlannedJob>, settings: &ExportSettings, sink: &mut S) -> Vec<JobOutcome> {
    let mut delivered = HashSet::new();
    jobs.into_iter()
        .map(|job| {
            let result = job.request.and_then(|request| export::export(&request, settings)).and_then(|mut artifact| {
                let filename = export::unique_filename(&artifact.filename, &delivered);
                if filename != artifact.filename {
                    debug!("{} already written in this run, saving as {}", artifact.filename, filename);
                    artifact.filename = filename;
                }
                let size = artifact.bytes.len();
                let delivery = sink.deliver(&artifact)?;
                delivered.insert(artifact.filename);
                Ok((delivery, size))
            });
            if let Err(ref e) = result {
                warn!("{} {} export failed: {}", job.report, job.format, e);
            }
            JobOutcome { request_label: (job.report, job.format), result }
        })
        .collect()
}

/// Print the outcome and pick the exit code
fn report_outcomes(is_batch: bool, output: &OutputTarget, outcomes: &[JobOutcome]) -> i32 {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    if !is_batch {
        return match outcomes.first().map(|o| &o.result) {
            Some(Ok((Delivery::Saved(path), size))) => {
                ui::status(&format!("saved {} ({})", path.display(), format_size(*size)));
                0
            }
            Some(Ok((Delivery::Streamed { bytes }, _))) => {
                debug!("streamed {} bytes", bytes);
                0
            }
            Some(Err(e)) => {
                ui::print_error(&e.to_string());
                1
            }
            None => 1,
        };
    }

    let destination = match output {
        OutputTarget::Directory(dir) => dir.display().to_string(),
        OutputTarget::Stdout => "<stdout>".to_string(),
    };
    print_summary(outcomes, &destination);

    if failed > 0 {
        ui::print_warning(&format!("{} of {} job(s) failed", failed, outcomes.len()));
        2
    } else {
        0
    }
}

fn print_summary(outcomes: &[JobOutcome], destination: &str) {
    let mut writer = TableWriter::new(io::stderr(), true);
    let _ = writer.write_table_header(outcomes.len(), destination);

    for outcome in outcomes {
        let (report, format) = &outcome.request_label;
        let _ = match outcome.result {
            Ok((ref delivery, size)) => {
                let file = match delivery {
                    Delivery::Saved(path) => path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| delivery.describe()),
                    Delivery::Streamed { .. } => delivery.describe(),
                };
                writer.write_row([report, format, &file, &format_size(size), "saved"], term::color::GREEN)
            }
            Err(ref e) => {
                let label = match e {
                    ExportError::Unsupported { .. } => "unsupported",
                    _ => "failed",
                };
                writer.write_row([report, format, &e.to_string(), "-", label], term::color::BRIGHT_RED)
            }
        };
    }

    let _ = writer.write_table_footer();
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let _ = writer.write_totals(outcomes.len() - failed, failed);
}
