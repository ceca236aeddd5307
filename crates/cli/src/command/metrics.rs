use crate::app::Outcome;
use anyhow::Result;
use clap::Parser;
use qkit_config::{Config, MetricsConfig};
use qkit_metrics::{check_thresholds, collect, render_summary, save_to_history, ReportPaths};
use std::io::Write;
use std::path::PathBuf;

/// Collect the quality metrics into a JSON report and check the thresholds.
#[derive(Parser, Debug, Clone, Default)]
pub struct Metrics {
    /// JaCoCo XML report.
    #[clap(long)]
    coverage_report: Option<PathBuf>,

    /// PIT mutations.xml report.
    #[clap(long)]
    mutation_report: Option<PathBuf>,

    /// Directory containing the Surefire XML reports.
    #[clap(long)]
    test_reports_dir: Option<PathBuf>,

    /// Where to write the merged JSON report.
    #[clap(long)]
    output_file: Option<PathBuf>,

    /// Directory of the daily report history.
    #[clap(long)]
    history_dir: Option<PathBuf>,
}

impl Metrics {
    fn report_paths(self, config: &MetricsConfig) -> ReportPaths {
        ReportPaths {
            coverage_report: self
                .coverage_report
                .unwrap_or_else(|| config.coverage_report.clone()),
            mutation_report: self
                .mutation_report
                .unwrap_or_else(|| config.mutation_report.clone()),
            test_reports_dir: self
                .test_reports_dir
                .unwrap_or_else(|| config.test_reports_dir.clone()),
            output_file: self
                .output_file
                .unwrap_or_else(|| config.output_file.clone()),
            history_dir: self
                .history_dir
                .unwrap_or_else(|| config.history_dir.clone()),
        }
    }

    pub fn run(self, config: &Config) -> Result<Outcome> {
        let paths = self.report_paths(&config.metrics);

        let stdout = std::io::stdout();
        let mut lock = stdout.lock();

        writeln!(lock, "🔍 Collecting quality metrics...")?;
        writeln!(lock)?;

        let report = collect(&paths);
        report.write_json(&paths.output_file)?;

        writeln!(lock, "💾 Report saved to: {}", paths.output_file.display())?;
        writeln!(lock)?;

        write!(lock, "{}", render_summary(&report))?;

        let failures = check_thresholds(&report);

        writeln!(lock)?;
        if failures.is_empty() {
            writeln!(lock, "✅ All quality thresholds met!")?;
        } else {
            writeln!(lock, "❌ Quality thresholds not met:")?;
            for failure in &failures {
                writeln!(lock, "   - {failure}")?;
            }
        }
        writeln!(lock)?;

        let today = chrono::Local::now().date_naive();
        let history_file = save_to_history(&report, &paths.history_dir, today)?;
        writeln!(lock, "📁 Saved to history: {}", history_file.display())?;

        Ok(Outcome::problems_if(!failures.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_flags_override_config() {
        let metrics = Metrics {
            output_file: Some("out/report.json".into()),
            ..Default::default()
        };
        let paths = metrics.report_paths(&MetricsConfig::default());
        assert_eq!(paths.output_file, PathBuf::from("out/report.json"));
        assert_eq!(
            paths.coverage_report,
            PathBuf::from("target/site/jacoco/jacoco.xml")
        );
    }

    #[test]
    fn test_run_writes_report_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let coverage_report = dir.path().join("jacoco.xml");
        let test_reports_dir = dir.path().join("surefire-reports");
        fs::write(
            &coverage_report,
            r#"<report><counter type="LINE" missed="10" covered="90"/></report>"#,
        )
        .unwrap();
        fs::create_dir(&test_reports_dir).unwrap();
        fs::write(
            test_reports_dir.join("TEST-Demo.xml"),
            r#"<testsuite tests="3" failures="0" errors="0" skipped="0" time="0.3"/>"#,
        )
        .unwrap();

        let metrics = Metrics {
            coverage_report: Some(coverage_report),
            mutation_report: Some(dir.path().join("missing.xml")),
            test_reports_dir: Some(test_reports_dir),
            output_file: Some(dir.path().join("target/quality-report.json")),
            history_dir: Some(dir.path().join("metrics-history")),
        };
        assert_eq!(metrics.run(&Config::default()).unwrap(), Outcome::Clean);

        assert!(dir.path().join("target/quality-report.json").is_file());
        assert_eq!(
            fs::read_dir(dir.path().join("metrics-history"))
                .unwrap()
                .count(),
            1
        );
    }

    #[test]
    fn test_no_inputs_fail_the_gate() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = Metrics {
            coverage_report: Some(dir.path().join("a.xml")),
            mutation_report: Some(dir.path().join("b.xml")),
            test_reports_dir: Some(dir.path().join("c")),
            output_file: Some(dir.path().join("report.json")),
            history_dir: Some(dir.path().join("history")),
        };
        assert_eq!(metrics.run(&Config::default()).unwrap(), Outcome::Problems);
    }
}
