//! Region listing for the `regions` command
//!
//! Reports every math region of a document in document order, with its shape and the source
//! it carries. Two output formats:
//!
//! - text: one tab-separated line per region, `<index>\t<state>\t<source>`
//! - json: an array of `{ "index", "state", "source" }` objects

use mathtex::markup::Document;
use mathtex::{MarkerProtocol, MathtexError, RegionState};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub index: usize,
    pub state: RegionState,
    /// Absent for empty regions
    pub source: Option<String>,
}

pub fn collect(html: &str, protocol: &MarkerProtocol) -> Result<Vec<RegionReport>, MathtexError> {
    let document = Document::parse(html)?;
    let reports = protocol
        .regions_in(document.root())
        .iter()
        .enumerate()
        .map(|(index, region)| RegionReport {
            index,
            state: region.state(protocol),
            source: region.raw_source(),
        })
        .collect();
    Ok(reports)
}

pub fn to_text(reports: &[RegionReport]) -> String {
    reports
        .iter()
        .map(|report| {
            let state = match report.state {
                RegionState::Raw => "raw",
                RegionState::Rendered => "rendered",
            };
            format!(
                "{}\t{}\t{}\n",
                report.index,
                state,
                report.source.as_deref().unwrap_or_default()
            )
        })
        .collect()
}

pub fn to_json(reports: &[RegionReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}
