//! ctest-report: reconcile CTest logs against a blacklist of known failures
//!
//! This binary crate reads a CTest console log, classifies every test against
//! an optional blacklist, and prints a text or JSON report. The exit status is
//! 0 for a green run, 1 for real failures and 2 for errors.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use ctest_report::config::Config;
use tracing::error;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr, the report to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match ctest_report::run(&config, std::io::stdin().lock()) {
        Ok((rendered, success)) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(rendered.as_bytes()) {
                error!(error = %e, "Failed to write report");
                return ExitCode::from(2);
            }
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("ctest-report failed: {e:#}");
            ExitCode::from(2)
        }
    }
}
