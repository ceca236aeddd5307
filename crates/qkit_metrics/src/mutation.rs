use crate::{parse_xml, percentage, read_to_string, Rate, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MutationSummary {
    pub killed: u64,
    pub survived: u64,
    pub no_coverage: u64,
    /// Every mutation in the report, whatever its status.
    pub total: u64,
    /// `killed / total * 100`, unmeasured when there are no mutations.
    pub score: Rate,
}

/// Tallies the mutation statuses of a PIT `mutations.xml` report.
pub fn parse_mutations(xml: &str) -> Result<MutationSummary> {
    let doc = parse_xml(xml)?;

    let mut summary = MutationSummary::default();
    for mutation in doc
        .root_element()
        .descendants()
        .skip(1)
        .filter(|n| n.has_tag_name("mutation"))
    {
        summary.total += 1;
        match mutation.attribute("status") {
            Some("KILLED") => summary.killed += 1,
            Some("SURVIVED") => summary.survived += 1,
            Some("NO_COVERAGE") => summary.no_coverage += 1,
            _ => {}
        }
    }
    summary.score = percentage(summary.killed as f64, summary.total as f64);

    Ok(summary)
}

pub fn load_mutations(path: &Path) -> Result<MutationSummary> {
    parse_mutations(&read_to_string(path)?)
}
