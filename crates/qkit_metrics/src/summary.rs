//! Console rendering of a [`QualityReport`].
//!
//! The bands used here only pick the indicator next to each metric, they are looser
//! than the gate in [`crate::thresholds`]: a 90% test success rate shows a warning but
//! still fails the gate.

use crate::{format_number, QualityReport};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Good,
    Warn,
    Poor,
}

impl Indicator {
    fn banded(value: f64, good: f64, warn: f64) -> Self {
        if value >= good {
            Self::Good
        } else if value >= warn {
            Self::Warn
        } else {
            Self::Poor
        }
    }

    pub fn coverage(percentage: f64) -> Self {
        Self::banded(percentage, 80.0, 60.0)
    }

    pub fn mutation(score: f64) -> Self {
        Self::banded(score, 70.0, 50.0)
    }

    /// Anything short of every test passing is at best a warning.
    pub fn tests(success_rate: f64) -> Self {
        Self::banded(success_rate, 100.0, 90.0)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Good => "✅",
            Self::Warn => "⚠️",
            Self::Poor => "❌",
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn render_summary(report: &QualityReport) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "📊 QUALITY METRICS REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Generated: {}", report.timestamp);
    let _ = writeln!(out);

    if let Some(t) = &report.tests {
        let _ = writeln!(out, "🧪 Tests:");
        let _ = writeln!(out, "   Total: {}", t.tests);
        let _ = writeln!(
            out,
            "   Passed: {} ({}%) {}",
            t.passed,
            t.success_rate,
            Indicator::tests(t.success_rate.value()).symbol()
        );
        let _ = writeln!(out, "   Failed: {}", t.failures + t.errors);
        let _ = writeln!(out, "   Skipped: {}", t.skipped);
        let _ = writeln!(out, "   Duration: {}s", format_number(t.time_seconds));
        let _ = writeln!(out);
    }

    if !report.coverage.is_empty() {
        let _ = writeln!(out, "📈 Coverage:");
        for (ty, counter) in &report.coverage {
            let _ = writeln!(
                out,
                "   {}: {}% ({}/{}) {}",
                capitalize(ty),
                format_number(counter.percentage),
                counter.covered,
                counter.total,
                Indicator::coverage(counter.percentage).symbol()
            );
        }
        let _ = writeln!(out);
    }

    if let Some(m) = &report.mutation {
        let _ = writeln!(out, "🧬 Mutation Testing:");
        let _ = writeln!(
            out,
            "   Score: {}% {}",
            m.score,
            Indicator::mutation(m.score.value()).symbol()
        );
        let _ = writeln!(out, "   Killed: {}", m.killed);
        let _ = writeln!(out, "   Survived: {}", m.survived);
        let _ = writeln!(out, "   No Coverage: {}", m.no_coverage);
        let _ = writeln!(out, "   Total: {}", m.total);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{rule}");
    out
}
