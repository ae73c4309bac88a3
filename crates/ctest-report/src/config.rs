// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for ctest-report
//!
//! This module provides the command line and environment configuration,
//! including input paths, blacklist classifiers, output format and logging
//! options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// CTest Report - reconcile CTest logs against a blacklist of known failures
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ctest-report")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// CTest log file to read
    ///
    /// Reads stdin when absent or `-`. A log file that does not exist is
    /// treated as an empty run.
    #[arg(env = "CTEST_REPORT_LOG")]
    pub log: Option<PathBuf>,

    /// Blacklist file of expected failures
    #[arg(short, long, env = "CTEST_REPORT_BLACKLIST")]
    pub blacklist: Option<PathBuf>,

    /// Active blacklist classifier (repeatable or comma separated)
    ///
    /// The host operating system name is always active.
    #[arg(
        short,
        long = "classifier",
        env = "CTEST_REPORT_CLASSIFIERS",
        value_delimiter = ','
    )]
    pub classifiers: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the report.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Report output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One aligned row per test followed by a summary line
    #[default]
    Text,
    /// A single JSON document
    Json,
}

impl Config {
    /// The log file to read, or `None` for stdin
    #[must_use]
    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log.as_ref().filter(|path| path.as_os_str() != "-")
    }

    /// Active classifiers: the configured ones plus the host OS, deduplicated
    #[must_use]
    pub fn active_classifiers(&self) -> Vec<String> {
        let mut classifiers: Vec<String> = self
            .classifiers
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        classifiers.push(std::env::consts::OS.to_string());
        classifiers.sort();
        classifiers.dedup();
        classifiers
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The blacklist path is specified but doesn't exist
    /// - The blacklist path is not a file
    /// - Both `--verbose` and `--quiet` are given
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref blacklist) = self.blacklist {
            if !blacklist.exists() {
                return Err(ConfigError::BlacklistNotFound(blacklist.clone()));
            }
            if !blacklist.is_file() {
                return Err(ConfigError::BlacklistNotFile(blacklist.clone()));
            }
        }

        if self.verbose && self.quiet {
            return Err(ConfigError::ConflictingVerbosity);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Blacklist path not found
    #[error("Blacklist file not found: {0}")]
    BlacklistNotFound(PathBuf),

    /// Blacklist path is not a regular file
    #[error("Blacklist path is not a file: {0}")]
    BlacklistNotFile(PathBuf),

    /// Both verbose and quiet were requested
    #[error("--verbose and --quiet cannot be used together")]
    ConflictingVerbosity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.log.is_none());
        assert!(config.blacklist.is_none());
        assert!(config.classifiers.is_empty());
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.verbose);
        assert!(!config.quiet);
    }

    #[test]
    fn test_log_path_dash_is_stdin() {
        let config = Config {
            log: Some(PathBuf::from("-")),
            ..Default::default()
        };
        assert!(config.log_path().is_none());

        let config = Config {
            log: Some(PathBuf::from("ctest.log")),
            ..Default::default()
        };
        assert_eq!(config.log_path(), Some(&PathBuf::from("ctest.log")));
    }

    #[test]
    fn test_active_classifiers_include_host_os() {
        let config = Config {
            classifiers: vec!["ci".to_string(), " ".to_string(), "ci".to_string()],
            ..Default::default()
        };
        let classifiers = config.active_classifiers();
        assert!(classifiers.contains(&"ci".to_string()));
        assert!(classifiers.contains(&std::env::consts::OS.to_string()));
        assert_eq!(classifiers.iter().filter(|c| *c == "ci").count(), 1);
        assert!(!classifiers.iter().any(|c| c.is_empty()));
    }

    #[test]
    fn test_log_level_default() {
        let config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_nonexistent_blacklist() {
        let config = Config {
            blacklist: Some(PathBuf::from("/nonexistent/path/12345/BLACKLIST")),
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::BlacklistNotFound(_))));
    }

    #[test]
    fn test_validate_directory_blacklist() {
        let config = Config {
            blacklist: Some(std::env::temp_dir()),
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::BlacklistNotFile(_))));
    }

    #[test]
    fn test_validate_conflicting_verbosity() {
        let config = Config {
            verbose: true,
            quiet: true,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConflictingVerbosity)
        ));
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
