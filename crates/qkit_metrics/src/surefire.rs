use crate::{
    numeric_attribute, parse_xml, percentage, read_to_string, round2, MetricsError, Rate,
    Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Counters of a single `TEST-*.xml` suite report.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SuiteCounts {
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    pub time: f64,
}

impl std::ops::AddAssign for SuiteCounts {
    fn add_assign(&mut self, other: Self) {
        self.tests += other.tests;
        self.failures += other.failures;
        self.errors += other.errors;
        self.skipped += other.skipped;
        self.time += other.time;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    /// Not clamped, inconsistent reports may drive it below zero.
    pub passed: i64,
    pub time_seconds: f64,
    pub success_rate: Rate,
}

impl From<SuiteCounts> for TestSummary {
    fn from(counts: SuiteCounts) -> Self {
        let SuiteCounts {
            tests,
            failures,
            errors,
            skipped,
            time,
        } = counts;
        let passed = tests as i64 - failures as i64 - errors as i64 - skipped as i64;
        Self {
            tests,
            failures,
            errors,
            skipped,
            passed,
            time_seconds: round2(time),
            success_rate: percentage(passed as f64, tests as f64),
        }
    }
}

/// Reads the counters off the root element of a Surefire suite report.
pub fn parse_suite(xml: &str) -> Result<SuiteCounts> {
    let doc = parse_xml(xml)?;
    let root = doc.root_element();

    Ok(SuiteCounts {
        tests: numeric_attribute(root, "tests")?,
        failures: numeric_attribute(root, "failures")?,
        errors: numeric_attribute(root, "errors")?,
        skipped: numeric_attribute(root, "skipped")?,
        time: numeric_attribute(root, "time")?,
    })
}

fn suite_reports(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.xml", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut reports: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!("skipping unreadable report: {err}");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    reports.sort();
    Ok(reports)
}

/// Sums every `*.xml` suite report found directly in `dir`.
///
/// A report that cannot be read or parsed is skipped with a warning.
pub fn load_test_results(dir: &Path) -> Result<TestSummary> {
    let reports = suite_reports(dir)?;
    if reports.is_empty() {
        return Err(MetricsError::NoTestReports(dir.to_path_buf()));
    }

    let mut total = SuiteCounts::default();
    for report in &reports {
        match read_to_string(report).and_then(|xml| parse_suite(&xml)) {
            Ok(counts) => total += counts,
            Err(err) => tracing::warn!("error parsing {}: {err}", report.display()),
        }
    }

    Ok(total.into())
}
