// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report rendering
//!
//! A [`Report`] is a reconciled CTest run, rendered either as an aligned text
//! table or as JSON.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use ctest_log::{Blacklist, RunSummary, TestLogParser, TestRecord};
use serde::Serialize;

/// A reconciled CTest run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Log file the records came from, or `"<stdin>"`
    pub source: String,
    /// Outcome counts
    pub summary: RunSummary,
    /// Reconciled records, in log order
    pub records: Vec<TestRecord>,
}

impl Report {
    /// Reconcile a parsed run against a blacklist
    #[must_use]
    pub fn new<B: Blacklist + ?Sized>(
        source: impl Into<String>,
        parser: &TestLogParser,
        blacklist: &B,
    ) -> Self {
        let records: Vec<TestRecord> = parser.reconcile(blacklist).collect();
        let summary = records.iter().collect();
        Self {
            generated_at: Utc::now(),
            source: source.into(),
            summary,
            records,
        }
    }

    /// Whether the run should be considered green
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.summary.is_success()
    }

    /// Render as an aligned text table with a trailing summary line
    #[must_use]
    pub fn to_text(&self) -> String {
        let name_width = self
            .records
            .iter()
            .map(|r| r.module_name.chars().count())
            .max()
            .unwrap_or(0);
        let count_width = self
            .records
            .iter()
            .map(|r| format!("{}/{}", r.index, r.total).len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for record in &self.records {
            let outcome = record.rich_outcome.map(|o| o.as_str()).unwrap_or("-");
            let position = format!("{}/{}", record.index, record.total);
            let _ = writeln!(
                out,
                "{outcome:<5}  {position:>count_width$}  #{:<4} {:<name_width$}  {:>8.2} sec",
                record.number, record.module_name, record.seconds
            );
        }

        let s = &self.summary;
        let _ = writeln!(
            out,
            "{} tests: {} PASS, {} FAIL!, {} BPASS, {} BFAIL, {} FATAL",
            s.total, s.pass, s.fail, s.bpass, s.bfail, s.fatal
        );
        out
    }

    /// Render as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
