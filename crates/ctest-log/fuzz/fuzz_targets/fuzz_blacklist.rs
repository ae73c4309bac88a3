// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for blacklist parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

use ctest_log::{Blacklist, BlacklistFile, TestLogParser};

const LOG: &str = "1/2 Test #1: QtCore_qfile_test ....***Failed    0.31 sec\n\
                   2/2 Test #2: QtGui_qpainter_test ....   Passed    0.12 sec\n";

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed headers are errors, never panics
        if let Ok(blacklist) = BlacklistFile::parse(input, ["linux", "ci", "win32"]) {
            let parser = TestLogParser::from_text(LOG);
            for record in parser.results() {
                let _ = blacklist.find_matching_line(record);
            }
        }
    }
});
