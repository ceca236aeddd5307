use crate::QualityReport;

pub const MIN_LINE_COVERAGE: f64 = 80.0;
pub const MIN_MUTATION_SCORE: f64 = 70.0;
pub const MIN_SUCCESS_RATE: f64 = 100.0;

/// Returns the reasons the report fails the quality gate, empty when it passes.
///
/// Missing coverage or test data count as 0 and fail. A mutation score of 0 is taken
/// as "mutation testing did not run" and is not gated.
pub fn check_thresholds(report: &QualityReport) -> Vec<String> {
    let mut failures = Vec::new();

    let line_coverage = report.line_coverage();
    if line_coverage.value() < MIN_LINE_COVERAGE {
        failures.push(format!("Line coverage ({line_coverage}%) < {MIN_LINE_COVERAGE}%"));
    }

    let mutation_score = report.mutation_score();
    if mutation_score.value() > 0.0 && mutation_score.value() < MIN_MUTATION_SCORE {
        failures.push(format!("Mutation score ({mutation_score}%) < {MIN_MUTATION_SCORE}%"));
    }

    let success_rate = report.success_rate();
    if success_rate.value() < MIN_SUCCESS_RATE {
        failures.push(format!("Test success rate ({success_rate}%) < {MIN_SUCCESS_RATE}%"));
    }

    failures
}
