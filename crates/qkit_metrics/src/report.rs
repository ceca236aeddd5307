use crate::coverage::{load_coverage, Coverage};
use crate::mutation::{load_mutations, MutationSummary};
use crate::surefire::{load_test_results, TestSummary};
use crate::{MetricsError, Rate, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the reports are read from and written to, relative to the working directory
/// unless absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub coverage_report: PathBuf,
    pub mutation_report: PathBuf,
    pub test_reports_dir: PathBuf,
    pub output_file: PathBuf,
    pub history_dir: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self {
            coverage_report: PathBuf::from("target/site/jacoco/jacoco.xml"),
            mutation_report: PathBuf::from("target/pit-reports/mutations.xml"),
            test_reports_dir: PathBuf::from("target/surefire-reports"),
            output_file: PathBuf::from("target/quality-report.json"),
            history_dir: PathBuf::from("metrics-history"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    pub generator: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: String::from("1.0"),
            generator: String::from("qkit metrics"),
        }
    }
}

/// Merged metrics of a single run.
///
/// Sections whose source is missing or broken are empty and serialize as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub timestamp: String,
    pub coverage: Coverage,
    #[serde(with = "empty_object")]
    pub mutation: Option<MutationSummary>,
    #[serde(with = "empty_object")]
    pub tests: Option<TestSummary>,
    pub metadata: Metadata,
}

impl QualityReport {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            coverage: Coverage::new(),
            mutation: None,
            tests: None,
            metadata: Metadata::default(),
        }
    }

    /// Line coverage percentage, unmeasured without coverage data.
    pub fn line_coverage(&self) -> Rate {
        self.coverage
            .get("line")
            .map(|counter| Rate::Measured(counter.percentage))
            .unwrap_or_default()
    }

    pub fn mutation_score(&self) -> Rate {
        self.mutation.map(|m| m.score).unwrap_or_default()
    }

    pub fn success_rate(&self) -> Rate {
        self.tests.map(|t| t.success_rate).unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the pretty-printed report to `path`, replacing any previous content.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| MetricsError::io(parent, err))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|err| MetricsError::io(path, err))
    }
}

/// Local time in ISO 8601 without offset, e.g. `2024-05-01T09:30:12.123456`.
pub fn timestamp_now() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

fn load_section<T>(
    name: &str,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T>,
) -> Option<T> {
    if !path.exists() {
        tracing::warn!("{name} report not found: {}", path.display());
        return None;
    }

    match load(path) {
        Ok(section) => Some(section),
        Err(err) => {
            tracing::warn!("error parsing {name} report {}: {err}", path.display());
            None
        }
    }
}

/// Reads every available source into a fresh report stamped with the current time.
pub fn collect(paths: &ReportPaths) -> QualityReport {
    collect_at(paths, timestamp_now())
}

pub fn collect_at(paths: &ReportPaths, timestamp: impl Into<String>) -> QualityReport {
    let mut report = QualityReport::new(timestamp);

    report.coverage =
        load_section("coverage", &paths.coverage_report, load_coverage).unwrap_or_default();
    report.mutation = load_section("mutation", &paths.mutation_report, load_mutations);
    report.tests = load_section("test", &paths.test_reports_dir, load_test_results);

    report
}

/// (De)serializes an absent section as an empty JSON object.
mod empty_object {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(map) if map.is_empty() => Ok(None),
            value => T::deserialize(value).map(Some).map_err(D::Error::custom),
        }
    }
}
