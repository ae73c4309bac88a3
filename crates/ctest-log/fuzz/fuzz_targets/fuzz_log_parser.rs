// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for CTest log parsing
//!
//! Parsing arbitrary text must never panic, and at most one record may be
//! flagged as the point where numbering breaks.

#![no_main]

use libfuzzer_sys::fuzz_target;

use ctest_log::{NoBlacklist, TestLogParser};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let parser = TestLogParser::from_text(input);
        assert!(parser.results().iter().filter(|r| r.fatal).count() <= 1);

        let summary = parser.summary(&NoBlacklist);
        assert_eq!(summary.total, parser.len());
    }
});
