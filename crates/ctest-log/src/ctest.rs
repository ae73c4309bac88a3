// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CTest console output parsing
//!
//! Only the completion lines of a CTest run are read:
//!
//! ```text
//! 114/391 Test #114: QtCore_qfileinfo_test-42 ........................   Passed    0.10 sec
//!         Start 115: QtCore_qfile_test
//! 115/391 Test #115: QtCore_qfile_test ...............................***Failed    0.11 sec
//! ```
//!
//! Headers, `Start` announcements and the final summary are skipped. The
//! module name (`QtCore_qfile_test`) is the key of a test, since CTest display
//! names are not unique.
//!
//! # Example
//!
//! ```
//! use ctest_log::ctest::TestLogParser;
//! use ctest_log::blacklist::NoBlacklist;
//! use ctest_log::record::RichOutcome;
//!
//! let log = "1/1 Test #1: QtCore_qobject_test ....   Passed    0.02 sec\n";
//! let parser = TestLogParser::from_text(log);
//! assert_eq!(parser.len(), 1);
//!
//! let outcomes: Vec<_> = parser
//!     .reconcile(&NoBlacklist)
//!     .map(|r| r.rich_outcome)
//!     .collect();
//! assert_eq!(outcomes, vec![Some(RichOutcome::Pass)]);
//! ```

use crate::blacklist::Blacklist;
use crate::error::CtestError;
use crate::record::{RichOutcome, TestRecord};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

// ============================================================================
// Line patterns
// ============================================================================

/// Start of a completion line, up to the colon after the test number
const PREFIX_PATTERN: &str = r"(?x)
    ^
    \s*
    (?P<index>[0-9]+) / (?P<total>[0-9]+)
    \s+ Test \s+
    \# (?P<number>[0-9]+)
    :
";

/// Remainder of a complete completion line
const SUFFIX_PATTERN: &str = r"(?x)
    \s+
    (?P<name>[\w-]+)
    .*?                                 # dotted fill
    (?:
        (?P<passed>Passed)
      | \*\*\* (?P<code>\w+.*?)         # ***Failed, ***Timeout, ***Exception: ...
    )
    \s+
    (?P<seconds>[0-9]+\.[0-9]+)
    \s+ sec \s*
    $
";

static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(PREFIX_PATTERN).unwrap()
});

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(&format!("{PREFIX_PATTERN}{SUFFIX_PATTERN}")).unwrap()
});

// ============================================================================
// Parsing
// ============================================================================

/// Rejoin completion lines that were split by an interleaved message
///
/// A crashing test can leave CTest output like
///
/// ```text
/// 12/30 Test #12: QtGui_bug_test ......Exit code 0xc0000409
/// ***Exception:   0.52 sec
/// ```
///
/// A line that starts like a completion line but does not end in `sec` is
/// joined with its successor, and the successor is emptied so that the number
/// of lines stays the same. Each line is tested in its original form.
#[must_use]
pub fn repair_lines(lines: &[String]) -> Vec<String> {
    let mut repaired = lines.to_vec();
    for (idx, pair) in lines.windows(2).enumerate() {
        let (line, next) = (&pair[0], &pair[1]);
        if PREFIX_RE.is_match(line) && line.split_whitespace().last() != Some("sec") {
            debug!(line = idx + 1, "Joining disrupted completion line");
            repaired[idx] = format!("{}{}", line.trim_end(), next);
            repaired[idx + 1] = String::new();
        }
    }
    repaired
}

/// Parse a single completion line
///
/// Returns `None` for any line that is not a complete completion line.
#[must_use]
pub fn parse_line(line: &str) -> Option<TestRecord> {
    let caps = LINE_RE.captures(line)?;
    match record_from_captures(&caps) {
        Some(record) => Some(record),
        None => {
            debug!(line, "Skipping completion line with out-of-range numbers");
            None
        }
    }
}

fn record_from_captures(caps: &Captures<'_>) -> Option<TestRecord> {
    let index = caps["index"].parse().ok()?;
    let total = caps["total"].parse().ok()?;
    let number = caps["number"].parse().ok()?;
    let seconds = caps["seconds"].parse().ok()?;
    let code = caps
        .name("passed")
        .or_else(|| caps.name("code"))?
        .as_str()
        .to_lowercase();

    Some(TestRecord {
        index,
        total,
        number,
        module_name: caps["name"].to_string(),
        passed: code == "passed",
        code,
        seconds,
        fatal: false,
        rich_outcome: None,
    })
}

/// Flag the first record whose index is not its position in the run
///
/// Once CTest numbering breaks the rest of the log cannot be trusted, so
/// only the first break is marked.
fn check_numbering(records: &mut [TestRecord]) {
    let Some(pos) = records
        .iter()
        .enumerate()
        .position(|(pos, record)| record.index != pos + 1)
    else {
        return;
    };

    warn!(
        position = pos + 1,
        index = records[pos].index,
        module = %records[pos].module_name,
        "Test numbering is disrupted"
    );
    records[pos] = records[pos].clone().into_disrupted();
}

/// Repair and match every line, without checking the numbering
#[must_use]
pub fn parse_completion_lines(text: &str) -> Vec<TestRecord> {
    let lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
    repair_lines(&lines)
        .iter()
        .filter_map(|line| parse_line(line))
        .collect()
}

/// Turn `\r\n` and bare `\r` line breaks into `\n`
#[must_use]
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Parse CTest output into records
///
/// Runs the line repair, the completion line match, and the numbering check.
#[must_use]
pub fn parse_log(text: &str) -> Vec<TestRecord> {
    let mut records = parse_completion_lines(text);
    check_numbering(&mut records);
    records
}

// ============================================================================
// Parser
// ============================================================================

/// Parsed CTest run
#[derive(Debug, Clone, Default)]
pub struct TestLogParser {
    results: Vec<TestRecord>,
}

impl TestLogParser {
    /// Parse in-memory CTest output
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let results = parse_log(text);
        debug!(records = results.len(), "Parsed CTest output");
        Self { results }
    }

    /// Parse CTest output from a reader
    ///
    /// Line breaks are normalized as for [`TestLogParser::from_path`].
    ///
    /// # Errors
    ///
    /// Returns `CtestError::Io` if reading fails or the input is not UTF-8.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CtestError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::from_text(&normalize_newlines(&text)))
    }

    /// Parse a CTest log file
    ///
    /// A path that does not exist yields an empty parser. `\r\n` and bare
    /// `\r` line breaks are read as `\n`.
    ///
    /// # Errors
    ///
    /// Returns `CtestError::Io` for any other read failure.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CtestError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "Test log not found, treating as empty");
            return Ok(Self::default());
        }
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "Test log vanished, treating as empty");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let parser = Self::from_text(&normalize_newlines(&text));
        info!(path = %path.display(), records = parser.len(), "Parsed test log");
        Ok(parser)
    }

    /// All records, in log order
    #[must_use]
    pub fn results(&self) -> &[TestRecord] {
        &self.results
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no completion line was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether the run numbering was disrupted
    #[must_use]
    pub fn is_disrupted(&self) -> bool {
        self.results.iter().any(|r| r.fatal)
    }

    /// Annotate each record with its outcome against `blacklist`
    ///
    /// The blacklist is queried once per record. A fatal record is always
    /// `FATAL`, whatever the blacklist says. Call again to restart.
    pub fn reconcile<'a, B: Blacklist + ?Sized>(
        &'a self,
        blacklist: &'a B,
    ) -> impl Iterator<Item = TestRecord> + 'a {
        self.results.iter().map(move |record| {
            let listed = blacklist.find_matching_line(record).is_some();
            let outcome = match (record.fatal, record.passed, listed) {
                (true, _, _) => RichOutcome::Fatal,
                (false, false, true) => RichOutcome::BlacklistedFail,
                (false, false, false) => RichOutcome::Fail,
                (false, true, true) => RichOutcome::BlacklistedPass,
                (false, true, false) => RichOutcome::Pass,
            };
            record.clone().with_rich_outcome(outcome)
        })
    }

    /// Tally a reconciliation pass
    #[must_use]
    pub fn summary<B: Blacklist + ?Sized>(&self, blacklist: &B) -> RunSummary {
        self.reconcile(blacklist).collect()
    }
}

impl<'a> IntoIterator for &'a TestLogParser {
    type Item = &'a TestRecord;
    type IntoIter = std::slice::Iter<'a, TestRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Outcome counts of a reconciled run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Records counted, reconciled or not
    pub total: usize,
    /// `PASS` count
    pub pass: usize,
    /// `FAIL!` count
    pub fail: usize,
    /// `BPASS` count
    pub bpass: usize,
    /// `BFAIL` count
    pub bfail: usize,
    /// `FATAL` count
    pub fatal: usize,
}

impl RunSummary {
    /// Count one outcome
    pub fn add(&mut self, outcome: RichOutcome) {
        self.total += 1;
        match outcome {
            RichOutcome::Pass => self.pass += 1,
            RichOutcome::Fail => self.fail += 1,
            RichOutcome::BlacklistedPass => self.bpass += 1,
            RichOutcome::BlacklistedFail => self.bfail += 1,
            RichOutcome::Fatal => self.fatal += 1,
        }
    }

    /// Count one record, tallying its outcome if it has been reconciled
    pub fn add_record(&mut self, record: &TestRecord) {
        match record.rich_outcome {
            Some(outcome) => self.add(outcome),
            None => self.total += 1,
        }
    }

    /// True when nothing failed outside the blacklist and the log is intact
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fail == 0 && self.fatal == 0
    }
}

/// Records without a reconciled outcome count towards `total` only
impl<'a> FromIterator<&'a TestRecord> for RunSummary {
    fn from_iter<T: IntoIterator<Item = &'a TestRecord>>(iter: T) -> Self {
        let mut summary = RunSummary::default();
        for record in iter {
            summary.add_record(record);
        }
        summary
    }
}

impl FromIterator<TestRecord> for RunSummary {
    fn from_iter<T: IntoIterator<Item = TestRecord>>(iter: T) -> Self {
        let mut summary = RunSummary::default();
        for record in iter {
            summary.add_record(&record);
        }
        summary
    }
}
