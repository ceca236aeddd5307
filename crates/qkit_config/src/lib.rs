use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no config file is specified.
pub const DEFAULT_CONFIG_FILE: &str = "qkit.toml";

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Specify the log file path, logs go to stderr when unset.
    pub log_file: Option<PathBuf>,

    /// Specify the max log level.
    pub max_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            max_level: "warn".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct HeadingsConfig {
    /// Directory names skipped while scanning.
    pub ignore_dirs: Vec<String>,

    /// File extensions treated as Markdown.
    pub extensions: Vec<String>,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: vec![".git".into(), "out".into(), "node_modules".into()],
            extensions: vec!["md".into()],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// JaCoCo XML report.
    pub coverage_report: PathBuf,

    /// PIT `mutations.xml` report.
    pub mutation_report: PathBuf,

    /// Directory of the Surefire `*.xml` suite reports.
    pub test_reports_dir: PathBuf,

    /// Where the merged JSON report is written.
    pub output_file: PathBuf,

    /// Directory of the per-day report history.
    pub history_dir: PathBuf,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            coverage_report: "target/site/jacoco/jacoco.xml".into(),
            mutation_report: "target/pit-reports/mutations.xml".into(),
            test_reports_dir: "target/surefire-reports".into(),
            output_file: "target/quality-report.json".into(),
            history_dir: "metrics-history".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TocConfig {
    /// Markdown file used when none is given on the command line.
    pub input_file: PathBuf,

    /// Line printed above the generated list.
    pub header: Option<String>,

    /// Number of spaces per nesting level.
    pub indent: usize,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            input_file: "README.md".into(),
            header: Some("## Table of Contents".into()),
            indent: 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Log configuration.
    pub log: LogConfig,

    /// Duplicate heading scanner.
    pub headings: HeadingsConfig,

    /// Quality metrics aggregator.
    pub metrics: MetricsConfig,

    /// Table of contents generator.
    pub toc: TocConfig,
}

/// Loads the config from `specified_config_file`, or from [`DEFAULT_CONFIG_FILE`] if it
/// exists in the working directory.
///
/// A missing file yields the default config. A malformed file also falls back to the
/// default config, the parse error is returned alongside so that the caller can report it.
pub fn load_config(specified_config_file: Option<&Path>) -> (Config, Option<toml::de::Error>) {
    let config_file = match specified_config_file {
        Some(path) => path.to_path_buf(),
        None => {
            let default_file = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default_file.exists() {
                return (Config::default(), None);
            }
            default_file
        }
    };

    let contents = match std::fs::read_to_string(&config_file) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::debug!("cannot read {}: {err}, using defaults", config_file.display());
            return (Config::default(), None);
        }
    };

    match toml::from_str(&contents) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    }
}
