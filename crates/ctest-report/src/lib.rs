//! ctest-report library
//!
//! This module exports the configuration and report rendering of ctest-report
//! for use in integration tests and as a library.

pub mod config;
pub mod report;

use std::io::Read;

use anyhow::{Context, Result};
use ctest_log::{Blacklist, BlacklistFile, NoBlacklist, TestLogParser};
use tracing::info;

use config::{Config, OutputFormat};
use report::Report;

/// Parse the configured log, reconcile it and render the report
///
/// Returns the rendered report and whether the run is a success.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, or if the log or the
/// blacklist cannot be read.
pub fn run<R: Read>(config: &Config, stdin: R) -> Result<(String, bool)> {
    config.validate()?;

    let (source, parser) = match config.log_path() {
        Some(path) => {
            let parser = TestLogParser::from_path(path)
                .with_context(|| format!("Failed to read test log {}", path.display()))?;
            (path.display().to_string(), parser)
        }
        None => {
            let parser = TestLogParser::from_reader(stdin).context("Failed to read stdin")?;
            ("<stdin>".to_string(), parser)
        }
    };

    let blacklist: Box<dyn Blacklist> = match config.blacklist {
        Some(ref path) => {
            let classifiers = config.active_classifiers();
            info!(classifiers = ?classifiers, "Using blacklist classifiers");
            Box::new(
                BlacklistFile::from_path(path, classifiers)
                    .with_context(|| format!("Failed to load blacklist {}", path.display()))?,
            )
        }
        None => Box::new(NoBlacklist),
    };

    let report = Report::new(source, &parser, blacklist.as_ref());
    info!(
        total = report.summary.total,
        failed = report.summary.fail,
        fatal = report.summary.fatal,
        "Reconciled test run"
    );

    let rendered = match config.format {
        OutputFormat::Text => report.to_text(),
        OutputFormat::Json => {
            let mut json = report.to_json().context("Failed to serialize report")?;
            json.push('\n');
            json
        }
    };

    Ok((rendered, report.is_success()))
}
