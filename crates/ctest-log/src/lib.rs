// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! ctest-log: CTest console log parsing
//!
//! This library crate turns CTest console output into ordered test records and
//! reconciles them against a blacklist of expected failures.
//!
//! # Example
//!
//! ```no_run
//! use ctest_log::{BlacklistFile, TestLogParser};
//!
//! let parser = TestLogParser::from_path("ctest.log").unwrap();
//! let blacklist = BlacklistFile::from_path("BLACKLIST", ["linux", "ci"]).unwrap();
//!
//! for record in parser.reconcile(&blacklist) {
//!     println!("{:?} {}", record.rich_outcome, record.module_name);
//! }
//! ```

pub mod blacklist;
pub mod ctest;
pub mod error;
pub mod record;

pub use blacklist::{Blacklist, BlacklistFile, BlacklistMatch, NoBlacklist};
pub use ctest::{RunSummary, TestLogParser, parse_log};
pub use error::CtestError;
pub use record::{RichOutcome, TestRecord};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::blacklist::{Blacklist, BlacklistFile, NoBlacklist};
    pub use crate::ctest::{RunSummary, TestLogParser};
    pub use crate::error::CtestError;
    pub use crate::record::{RichOutcome, TestRecord};
}
