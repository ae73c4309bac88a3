// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for ctest-log
//!
//! These tests use proptest to check parser invariants over generated runs
//! and arbitrary text.

use ctest_log::ctest::repair_lines;
use ctest_log::{Blacklist, BlacklistMatch, RichOutcome, TestLogParser, TestRecord};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Strategies
// ============================================================================

/// One generated test: name, passed, seconds in hundredths
fn arbitrary_test() -> impl Strategy<Value = (String, bool, u32)> {
    ("[A-Za-z][A-Za-z0-9_-]{0,20}", any::<bool>(), 0u32..100_000)
}

fn arbitrary_run() -> impl Strategy<Value = Vec<(String, bool, u32)>> {
    prop::collection::vec(arbitrary_test(), 0..40)
}

/// Pieces of CTest output, glued together in arbitrary order
fn log_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1/3 Test #1: QtCore_a_test ....".to_string()),
        Just("2/3 Test #2: QtCore_b_test ....".to_string()),
        Just("   Passed    0.10 sec".to_string()),
        Just("***Failed    1.25 sec".to_string()),
        Just("Exit code 0xc0000409".to_string()),
        Just("      Start 3: QtCore_c_test".to_string()),
        Just("\n".to_string()),
        Just("\r\n".to_string()),
        "[ -~]{0,12}",
    ]
}

/// Render a run as CTest output, with `Start` lines in between
fn render(run: &[(String, bool, u32)], order: &[usize]) -> String {
    let total = run.len();
    let mut log = String::from("Test project /build\n");
    for (&index, (name, passed, hundredths)) in order.iter().zip(run) {
        let outcome = if *passed { "   Passed" } else { "***Failed" };
        log.push_str(&format!("      Start {index}: {name}\n"));
        log.push_str(&format!(
            "{index}/{total} Test #{index}: {name} ..........{outcome}  {}.{:02} sec\n",
            hundredths / 100,
            hundredths % 100
        ));
    }
    log.push_str("\n100% tests passed\n");
    log
}

/// Blacklist of names chosen by the strategy
struct NameSet(HashSet<String>);

impl Blacklist for NameSet {
    fn find_matching_line(&self, record: &TestRecord) -> Option<BlacklistMatch> {
        self.0.contains(&record.module_name).then(|| BlacklistMatch {
            section: record.module_name.clone(),
            line: 1,
        })
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_consecutive_runs_are_never_fatal(run in arbitrary_run()) {
        let order: Vec<usize> = (1..=run.len()).collect();
        let parser = TestLogParser::from_text(&render(&run, &order));

        prop_assert_eq!(parser.len(), run.len());
        prop_assert!(parser.results().iter().all(|r| !r.fatal));
        for (record, (name, passed, _)) in parser.results().iter().zip(&run) {
            prop_assert_eq!(&record.module_name, name);
            prop_assert_eq!(record.passed, *passed);
        }
    }

    #[test]
    fn prop_at_most_one_fatal_record(
        run in arbitrary_run(),
        shuffle in prop::collection::vec(1usize..50, 40),
    ) {
        let order: Vec<usize> = shuffle.into_iter().take(run.len()).collect();
        let parser = TestLogParser::from_text(&render(&run, &order));

        let fatal: Vec<usize> = parser
            .results()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.fatal)
            .map(|(pos, _)| pos)
            .collect();
        let first_break = order
            .iter()
            .enumerate()
            .position(|(pos, &index)| index != pos + 1);

        prop_assert_eq!(fatal.first().copied(), first_break);
        prop_assert!(fatal.len() <= 1);
    }

    #[test]
    fn prop_reconcile_is_idempotent(
        run in arbitrary_run(),
        listed in prop::collection::vec(any::<bool>(), 40),
    ) {
        let order: Vec<usize> = (1..=run.len()).collect();
        let parser = TestLogParser::from_text(&render(&run, &order));
        let names = run
            .iter()
            .zip(&listed)
            .filter(|(_, listed)| **listed)
            .map(|((name, _, _), _)| name.clone())
            .collect();
        let blacklist = NameSet(names);

        let first: Vec<Option<RichOutcome>> =
            parser.reconcile(&blacklist).map(|r| r.rich_outcome).collect();
        let second: Vec<Option<RichOutcome>> =
            parser.reconcile(&blacklist).map(|r| r.rich_outcome).collect();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.iter().all(Option::is_some));
        prop_assert_eq!(parser.summary(&blacklist).total, parser.len());
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in any::<String>()) {
        let parser = TestLogParser::from_text(&text);
        prop_assert_eq!(parser.len(), parser.results().len());
    }

    #[test]
    fn prop_log_fragments_never_panic(fragments in prop::collection::vec(log_fragment(), 0..60)) {
        let parser = TestLogParser::from_text(&fragments.concat());
        prop_assert_eq!(parser.len(), parser.results().len());
        prop_assert!(parser.results().iter().filter(|r| r.fatal).count() <= 1);
    }

    #[test]
    fn prop_repair_keeps_line_count(lines in prop::collection::vec(".{0,60}", 0..30)) {
        prop_assert_eq!(repair_lines(&lines).len(), lines.len());
    }
}
