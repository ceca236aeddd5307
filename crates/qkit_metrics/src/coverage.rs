use crate::{numeric_attribute, parse_xml, percentage, read_to_string, Result};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageCounter {
    pub covered: u64,
    pub missed: u64,
    pub total: u64,
    pub percentage: f64,
}

impl CoverageCounter {
    pub fn new(covered: u64, missed: u64) -> Self {
        let total = covered + missed;
        Self {
            covered,
            missed,
            total,
            percentage: percentage(covered as f64, total as f64).value(),
        }
    }
}

/// Lower-cased counter type (`line`, `branch`, `instruction`, ...) to its tally, in the
/// order the types first appear in the report.
pub type Coverage = IndexMap<String, CoverageCounter>;

/// Extracts the coverage counters of a JaCoCo XML report.
///
/// Every `<counter>` element is visited in document order and a later counter of the
/// same type replaces an earlier one in place, so the report-level totals JaCoCo writes
/// last are the ones kept. Counters with nothing to cover are skipped, and so is the
/// root element itself.
pub fn parse_coverage(xml: &str) -> Result<Coverage> {
    let doc = parse_xml(xml)?;

    let mut coverage = Coverage::new();
    for counter in doc
        .root_element()
        .descendants()
        .skip(1)
        .filter(|n| n.has_tag_name("counter"))
    {
        let Some(ty) = counter.attribute("type") else {
            continue;
        };
        let missed: u64 = numeric_attribute(counter, "missed")?;
        let covered: u64 = numeric_attribute(counter, "covered")?;
        if missed + covered > 0 {
            coverage.insert(ty.to_lowercase(), CoverageCounter::new(covered, missed));
        }
    }

    Ok(coverage)
}

pub fn load_coverage(path: &Path) -> Result<Coverage> {
    parse_coverage(&read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JACOCO: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<!DOCTYPE report PUBLIC "-//JACOCO//DTD Report 1.1//EN" "report.dtd">
<report name="demo">
  <package name="com/example">
    <class name="com/example/App">
      <counter type="LINE" missed="5" covered="5"/>
    </class>
    <counter type="LINE" missed="5" covered="5"/>
  </package>
  <counter type="INSTRUCTION" missed="10" covered="290"/>
  <counter type="BRANCH" missed="0" covered="0"/>
  <counter type="LINE" missed="20" covered="80"/>
</report>"#;

    #[test]
    fn test_report_level_counters_win() {
        let coverage = parse_coverage(JACOCO).unwrap();
        assert_eq!(
            coverage.get("line"),
            Some(&CoverageCounter {
                covered: 80,
                missed: 20,
                total: 100,
                percentage: 80.0,
            })
        );
        assert_eq!(coverage["instruction"].percentage, 96.67);
        assert!(!coverage.contains_key("branch"));
        assert_eq!(coverage.len(), 2);
    }

    #[test]
    fn test_types_keep_first_seen_order() {
        let coverage = parse_coverage(JACOCO).unwrap();
        assert_eq!(
            coverage.keys().collect::<Vec<_>>(),
            vec!["line", "instruction"]
        );

        let xml = r#"<report>
  <counter type="INSTRUCTION" missed="1" covered="3"/>
  <counter type="BRANCH" missed="1" covered="1"/>
  <counter type="LINE" missed="0" covered="2"/>
  <counter type="INSTRUCTION" missed="0" covered="4"/>
</report>"#;
        let coverage = parse_coverage(xml).unwrap();
        assert_eq!(
            coverage.keys().collect::<Vec<_>>(),
            vec!["instruction", "branch", "line"]
        );
        assert_eq!(coverage["instruction"].percentage, 100.0);
    }

    #[test]
    fn test_root_counter_is_not_a_child() {
        let coverage = parse_coverage(r#"<counter type="LINE" missed="1" covered="1"/>"#).unwrap();
        assert!(coverage.is_empty());
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(CoverageCounter::new(1, 31).percentage, 3.12);
        assert_eq!(CoverageCounter::new(5, 27).percentage, 15.62);
    }

    #[test]
    fn test_malformed_report() {
        assert!(parse_coverage("<report><counter type=").is_err());
        assert!(parse_coverage(r#"<report><counter type="LINE" missed="-1"/></report>"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_coverage(Path::new("/nonexistent/jacoco.xml")).is_err());
    }
}
