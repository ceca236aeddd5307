use crate::{MetricsError, QualityReport, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// `<dir>/<YYYY-MM-DD>.json`
pub fn history_file(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.json", date.format("%Y-%m-%d")))
}

/// Stores the report as the entry of `date`, a later run on the same day replaces it.
pub fn save_to_history(report: &QualityReport, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|err| MetricsError::io(dir, err))?;
    let path = history_file(dir, date);
    report.write_json(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{collect_at, ReportPaths};
    use std::fs;

    #[test]
    fn test_same_day_runs_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ReportPaths {
            coverage_report: dir.path().join("jacoco.xml"),
            mutation_report: dir.path().join("mutations.xml"),
            test_reports_dir: dir.path().join("surefire-reports"),
            output_file: dir.path().join("quality-report.json"),
            history_dir: dir.path().join("metrics-history"),
        };
        fs::write(
            &paths.coverage_report,
            r#"<report><counter type="LINE" missed="20" covered="80"/></report>"#,
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let first = collect_at(&paths, "2024-05-01T09:00:00.000000");
        let saved = save_to_history(&first, &paths.history_dir, date).unwrap();
        assert_eq!(saved, paths.history_dir.join("2024-05-01.json"));

        let second = collect_at(&paths, "2024-05-01T17:00:00.000000");
        save_to_history(&second, &paths.history_dir, date).unwrap();

        let entries = fs::read_dir(&paths.history_dir).unwrap().count();
        assert_eq!(entries, 1);

        let stored: QualityReport =
            serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
        assert_eq!(stored.timestamp, second.timestamp);
        assert_eq!(
            QualityReport {
                timestamp: first.timestamp.clone(),
                ..stored
            },
            first
        );
    }
}
