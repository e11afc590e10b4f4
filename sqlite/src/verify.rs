//! Integrity checks for a built phonetic database.
//!
//! [`Verifier::verify`] runs five independent checks and collects every
//! problem instead of stopping at the first one:
//!
//! 1. the record count lies within the configured bounds;
//! 2. every required column exists;
//! 3. each configured sample code point is present and its raw `phonetic`
//!    text satisfies the sample's expectations;
//! 4. the leading keys are non-empty, ASCII alphanumeric and uppercase;
//! 5. no row has an empty `phonetic` column.
//!
//! A database error inside one check becomes a problem for that check; the
//! others still run. A database that cannot be opened at all is reported as
//! a single problem.

use cns_phonetics_core::READING_SEPARATOR;
use cns_phonetics_sources::{SampleCheck, VerifyConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::schema::REQUIRED_COLUMNS;
use crate::store::PhoneticStore;

/// Outcome of a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// `true` when `problems` is empty.
    pub passed: bool,
    /// Human-readable description of every failed check.
    pub problems: Vec<String>,
    /// Stored row count, when it could be read.
    pub record_count: Option<usize>,
}

impl VerifyReport {
    fn from_problems(problems: Vec<String>, record_count: Option<usize>) -> Self {
        Self {
            passed: problems.is_empty(),
            problems,
            record_count,
        }
    }
}

/// Runs the integrity checks configured by a [`VerifyConfig`].
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifyConfig,
}

impl Verifier {
    pub fn new(config: VerifyConfig) -> Self {
        Self { config }
    }

    /// Verifies the database behind `store`.
    pub fn verify(&self, store: &mut PhoneticStore) -> VerifyReport {
        if !store.path().is_file() {
            return VerifyReport::from_problems(
                vec![format!("database file not found: {}", store.path().display())],
                None,
            );
        }
        if let Err(err) = store.connect() {
            return VerifyReport::from_problems(vec![err.to_string()], None);
        }

        let mut problems = Vec::new();
        let record_count = self.check_count(store, &mut problems);
        self.check_columns(store, &mut problems);
        for sample in &self.config.samples {
            self.check_sample(store, sample, &mut problems);
        }
        self.check_keys(store, &mut problems);
        self.check_phonetic(store, &mut problems);

        for problem in &problems {
            warn!(%problem, "verification problem");
        }
        let report = VerifyReport::from_problems(problems, record_count);
        info!(
            path = %store.path().display(),
            passed = report.passed,
            problems = report.problems.len(),
            "verification finished"
        );
        report
    }

    fn check_count(&self, store: &mut PhoneticStore, problems: &mut Vec<String>) -> Option<usize> {
        match store.count() {
            Ok(count) => {
                if count < self.config.min_records {
                    problems.push(format!(
                        "record count too low: {count} (expected >= {})",
                        self.config.min_records
                    ));
                } else if count > self.config.max_records {
                    problems.push(format!(
                        "record count too high: {count} (expected <= {})",
                        self.config.max_records
                    ));
                } else {
                    debug!(count, "record count ok");
                }
                Some(count)
            }
            Err(err) => {
                problems.push(format!("record count check failed: {err}"));
                None
            }
        }
    }

    fn check_columns(&self, store: &mut PhoneticStore, problems: &mut Vec<String>) {
        match store.columns() {
            Ok(columns) => {
                let missing: Vec<&str> = REQUIRED_COLUMNS
                    .iter()
                    .map(|c| c.as_str())
                    .filter(|name| !columns.iter().any(|c| c == name))
                    .collect();
                if !missing.is_empty() {
                    problems.push(format!("missing columns: {}", missing.join(", ")));
                }
            }
            Err(err) => problems.push(format!("column check failed: {err}")),
        }
    }

    fn check_sample(
        &self,
        store: &mut PhoneticStore,
        sample: &SampleCheck,
        problems: &mut Vec<String>,
    ) {
        let phonetic = match store.phonetic_text(&sample.unicode) {
            Ok(Some(phonetic)) => phonetic,
            Ok(None) => {
                problems.push(format!("sample character U+{} not found", sample.unicode));
                return;
            }
            Err(err) => {
                problems.push(format!("sample U+{} check failed: {err}", sample.unicode));
                return;
            }
        };

        if let Some(expected) = &sample.phonetic_contains {
            if !phonetic.contains(expected.as_str()) {
                problems.push(format!(
                    "U+{}: phonetic '{phonetic}' does not contain '{expected}'",
                    sample.unicode
                ));
            }
        }
        if let Some(min) = sample.min_readings {
            let readings = phonetic
                .split(READING_SEPARATOR)
                .filter(|r| !r.is_empty())
                .count();
            if readings < min {
                problems.push(format!(
                    "U+{}: expected at least {min} readings, got {readings}",
                    sample.unicode
                ));
            }
        }
    }

    fn check_keys(&self, store: &mut PhoneticStore, problems: &mut Vec<String>) {
        let keys = match store.sample_keys(self.config.key_sample_size) {
            Ok(keys) => keys,
            Err(err) => {
                problems.push(format!("key format check failed: {err}"));
                return;
            }
        };
        for key in keys {
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
                problems.push(format!("invalid unicode format: '{key}'"));
                return;
            }
            if key.chars().any(|c| c.is_ascii_lowercase()) {
                problems.push(format!("unicode not uppercase: '{key}'"));
                return;
            }
        }
    }

    fn check_phonetic(&self, store: &mut PhoneticStore, problems: &mut Vec<String>) {
        match store.count_without_phonetic() {
            Ok(0) => {}
            Ok(empty) => problems.push(format!("found {empty} records with empty phonetic")),
            Err(err) => problems.push(format!("empty phonetic check failed: {err}")),
        }
    }
}
