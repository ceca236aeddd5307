//! Aggregates test-quality metrics out of JaCoCo, PIT and Surefire reports.
//!
//! Each source is parsed independently, a broken or missing source only leaves its
//! section of the [`QualityReport`] empty.

pub mod coverage;
pub mod history;
pub mod mutation;
pub mod report;
pub mod summary;
pub mod surefire;
pub mod thresholds;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use self::coverage::{load_coverage, parse_coverage, Coverage, CoverageCounter};
pub use self::history::{history_file, save_to_history};
pub use self::mutation::{load_mutations, parse_mutations, MutationSummary};
pub use self::report::{collect, collect_at, timestamp_now, Metadata, QualityReport, ReportPaths};
pub use self::summary::{render_summary, Indicator};
pub use self::surefire::{load_test_results, parse_suite, SuiteCounts, TestSummary};
pub use self::thresholds::check_thresholds;

pub type Result<T, E = MetricsError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid value {value:?} for attribute `{attribute}` on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
    #[error("no test reports found in {}", .0.display())]
    NoTestReports(PathBuf),
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MetricsError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| MetricsError::io(path, err))
}

/// Parses an XML report. Report files commonly carry a DOCTYPE declaration.
pub(crate) fn parse_xml(text: &str) -> Result<roxmltree::Document<'_>> {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;
    Ok(roxmltree::Document::parse_with_options(text, options)?)
}

/// Reads a numeric attribute of `node`, a missing attribute counts as the default value.
pub(crate) fn numeric_attribute<T>(node: roxmltree::Node<'_, '_>, attribute: &str) -> Result<T>
where
    T: FromStr + Default,
{
    match node.attribute(attribute) {
        None => Ok(T::default()),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| MetricsError::InvalidAttribute {
                element: node.tag_name().name().to_owned(),
                attribute: attribute.to_owned(),
                value: value.to_owned(),
            }),
    }
}

/// Rounds to 2 decimal places on the exact binary value, ties go to the even digit
/// (`3.125` -> `3.12`).
pub(crate) fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// A percentage rounded to 2 decimal places.
///
/// `Unmeasured` is the rate of an empty population (no tests, no mutations). It is
/// written as a bare `0` in JSON and in messages, a measured zero as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Rate {
    #[default]
    Unmeasured,
    Measured(f64),
}

impl Rate {
    pub fn value(self) -> f64 {
        match self {
            Self::Unmeasured => 0.0,
            Self::Measured(value) => value,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmeasured => f.write_str("0"),
            Self::Measured(value) => f.write_str(&format_number(*value)),
        }
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unmeasured => serializer.serialize_u64(0),
            Self::Measured(value) => serializer.serialize_f64(*value),
        }
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RateVisitor;

        impl serde::de::Visitor<'_> for RateVisitor {
            type Value = Rate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a percentage")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Rate, E> {
                Ok(match v {
                    0 => Rate::Unmeasured,
                    v => Rate::Measured(v as f64),
                })
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Rate, E> {
                Ok(match v {
                    0 => Rate::Unmeasured,
                    v => Rate::Measured(v as f64),
                })
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Rate, E> {
                Ok(Rate::Measured(v))
            }
        }

        deserializer.deserialize_any(RateVisitor)
    }
}

/// `part / whole * 100` rounded, [`Rate::Unmeasured`] when `whole` is 0.
pub(crate) fn percentage(part: f64, whole: f64) -> Rate {
    if whole > 0.0 {
        Rate::Measured(round2(part / whole * 100.0))
    } else {
        Rate::Unmeasured
    }
}

/// Formats a rounded value the way it is printed in reports: `80.0`, `66.67`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
