// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for ctest-log

use thiserror::Error;

/// Errors that can occur while loading a test log or a blacklist
#[derive(Debug, Error)]
pub enum CtestError {
    /// Error reading a log or blacklist file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid blacklist format
    #[error("Invalid blacklist format at line {line}: {message}")]
    InvalidFormat {
        /// 1-based line number of the offending line
        line: usize,
        /// Description of the format error
        message: String,
    },
}
