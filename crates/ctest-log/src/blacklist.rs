// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Blacklists of expected test failures
//!
//! A [`Blacklist`] is consulted once per record during reconciliation. The
//! [`BlacklistFile`] implementation reads the bracketed-section format:
//!
//! ```text
//! # comment
//! [QtCore::qfile_test]
//!     linux ci
//!     darwin
//! ```
//!
//! A classifier line matches when every word on it is an active classifier.

use crate::error::CtestError;
use crate::record::TestRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};

/// The blacklist entry that matched a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistMatch {
    /// Section (test name) that matched
    pub section: String,
    /// 1-based line number of the matching classifier line
    pub line: usize,
}

/// Lookup of expected failures
pub trait Blacklist {
    /// Find the blacklist line matching `record`, if any
    fn find_matching_line(&self, record: &TestRecord) -> Option<BlacklistMatch>;
}

impl<B: Blacklist + ?Sized> Blacklist for &B {
    fn find_matching_line(&self, record: &TestRecord) -> Option<BlacklistMatch> {
        (**self).find_matching_line(record)
    }
}

/// A blacklist that never matches
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlacklist;

impl Blacklist for NoBlacklist {
    fn find_matching_line(&self, _record: &TestRecord) -> Option<BlacklistMatch> {
        None
    }
}

/// A classifier line under a section
#[derive(Debug, Clone)]
struct ClassifierLine {
    line: usize,
    words: Vec<String>,
}

/// A blacklist loaded from text
#[derive(Debug, Clone, Default)]
pub struct BlacklistFile {
    /// Sections keyed by normalized test name, in file order of their lines
    sections: HashMap<String, (String, Vec<ClassifierLine>)>,
    classifiers: BTreeSet<String>,
}

impl BlacklistFile {
    /// Parse blacklist text, matching against the given active classifiers
    ///
    /// # Errors
    ///
    /// Returns `CtestError::InvalidFormat` for an unterminated or empty section header.
    pub fn parse<I, S>(text: &str, classifiers: I) -> Result<Self, CtestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sections: HashMap<String, (String, Vec<ClassifierLine>)> = HashMap::new();
        let mut current: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }

            if content.starts_with('[') {
                let name = content
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .ok_or_else(|| CtestError::InvalidFormat {
                        line,
                        message: format!("unterminated section header: {content}"),
                    })?;
                if name.is_empty() {
                    return Err(CtestError::InvalidFormat {
                        line,
                        message: "empty section name".to_string(),
                    });
                }
                let key = normalize_name(name);
                sections
                    .entry(key.clone())
                    .or_insert_with(|| (name.to_string(), Vec::new()));
                current = Some(key);
                continue;
            }

            match current.as_ref().and_then(|key| sections.get_mut(key)) {
                Some((_, lines)) => lines.push(ClassifierLine {
                    line,
                    words: content.split_whitespace().map(str::to_string).collect(),
                }),
                None => debug!(line, "Ignoring blacklist preamble line"),
            }
        }

        Ok(Self {
            sections,
            classifiers: classifiers.into_iter().map(Into::into).collect(),
        })
    }

    /// Load a blacklist file
    ///
    /// # Errors
    ///
    /// Returns `CtestError::Io` if the file cannot be read, or
    /// `CtestError::InvalidFormat` if it is malformed.
    pub fn from_path<P, I, S>(path: P, classifiers: I) -> Result<Self, CtestError>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let blacklist = Self::parse(&text, classifiers)?;
        info!(
            path = %path.display(),
            sections = blacklist.sections.len(),
            "Loaded blacklist"
        );
        Ok(blacklist)
    }

    /// Number of test sections
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the blacklist has no sections
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Active classifiers
    pub fn classifiers(&self) -> impl Iterator<Item = &str> {
        self.classifiers.iter().map(String::as_str)
    }
}

impl Blacklist for BlacklistFile {
    fn find_matching_line(&self, record: &TestRecord) -> Option<BlacklistMatch> {
        let (section, lines) = self.sections.get(&normalize_name(&record.module_name))?;
        lines
            .iter()
            .find(|cl| cl.words.iter().all(|word| self.classifiers.contains(word)))
            .map(|cl| BlacklistMatch {
                section: section.clone(),
                line: cl.line,
            })
    }
}

/// `QtCore::qfile_test` and `QtCore_qfile_test` name the same test
fn normalize_name(name: &str) -> String {
    name.replace("::", "_")
}
