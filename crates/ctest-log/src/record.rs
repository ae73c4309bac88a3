// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test record types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suffix appended to the outcome code of the record where numbering breaks
pub const DISRUPTED_SUFFIX: &str = ", but lines are disrupted!";

/// One test completion line of a CTest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// 1-based position of the test in the run, as reported by the runner
    pub index: usize,
    /// Total number of tests in the run
    pub total: usize,
    /// The runner's test number (the value after `#`)
    pub number: u32,
    /// Module and test name, unique within a run
    pub module_name: String,
    /// True only if the outcome was "passed"
    pub passed: bool,
    /// Lower-cased outcome text, e.g. "passed", "failed", "timeout"
    pub code: String,
    /// Duration in seconds
    pub seconds: f64,
    /// Set on the single record where the run numbering was disrupted
    pub fatal: bool,
    /// Outcome after blacklist reconciliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_outcome: Option<RichOutcome>,
}

impl TestRecord {
    /// Copy of this record carrying a reconciled outcome
    #[must_use]
    pub fn with_rich_outcome(self, outcome: RichOutcome) -> Self {
        Self {
            rich_outcome: Some(outcome),
            ..self
        }
    }

    /// Copy of this record marking the point where the run numbering broke
    #[must_use]
    pub(crate) fn into_disrupted(self) -> Self {
        let code = format!("{}{}", self.code, DISRUPTED_SUFFIX);
        Self {
            passed: false,
            code,
            fatal: true,
            ..self
        }
    }
}

/// Outcome of a test after reconciliation against a blacklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RichOutcome {
    /// Passed and not blacklisted
    #[serde(rename = "PASS")]
    Pass,
    /// Failed and not blacklisted
    #[serde(rename = "FAIL!")]
    Fail,
    /// Passed although blacklisted
    #[serde(rename = "BPASS")]
    BlacklistedPass,
    /// Failed and blacklisted
    #[serde(rename = "BFAIL")]
    BlacklistedFail,
    /// The run log is unreliable from this record on
    #[serde(rename = "FATAL")]
    Fatal,
}

impl RichOutcome {
    /// All outcomes, in display order
    pub const ALL: [RichOutcome; 5] = [
        RichOutcome::Pass,
        RichOutcome::Fail,
        RichOutcome::BlacklistedPass,
        RichOutcome::BlacklistedFail,
        RichOutcome::Fatal,
    ];

    /// The label used in reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RichOutcome::Pass => "PASS",
            RichOutcome::Fail => "FAIL!",
            RichOutcome::BlacklistedPass => "BPASS",
            RichOutcome::BlacklistedFail => "BFAIL",
            RichOutcome::Fatal => "FATAL",
        }
    }

    /// Whether this outcome should fail the run
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, RichOutcome::Fail | RichOutcome::Fatal)
    }
}

impl fmt::Display for RichOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown outcome label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outcome label: {0}")]
pub struct UnknownOutcome(pub String);

impl FromStr for RichOutcome {
    type Err = UnknownOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RichOutcome::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| UnknownOutcome(s.to_string()))
    }
}
