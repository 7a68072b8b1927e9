//! Replay command implementation.

use crate::report::{self, EventPrinter, PhaseReport, RunReport};
use logseg_core::{SegmentStore, StoreConfig, WriteRequest};
use logseg_workload::{drive, parse_request, WorkloadResult, DEFAULT_SCRIPT};
use std::path::Path;
use tracing::info;

/// Runs the replay command.
///
/// With no `requests`, the built-in script is replayed.
pub fn run(
    config: StoreConfig,
    requests: &[String],
    details: bool,
    format: &str,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let script = script(requests)?;
    info!(requests = script.len(), "replaying requests");

    let mut store = SegmentStore::new(config)?;
    let mut printer = EventPrinter::new(std::io::stdout());
    let summary = drive(&mut store, script, true, &mut printer);

    let report = RunReport::new(&store, vec![PhaseReport::new("replay", &summary)], details);
    report::emit(&report, format, |r, out| r.render_text(out))?;
    if let Some(path) = report_path {
        report::write_json(path, &report)?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}

/// Parses `requests`, falling back to [`DEFAULT_SCRIPT`] when empty.
pub fn script(requests: &[String]) -> WorkloadResult<Vec<WriteRequest>> {
    if requests.is_empty() {
        return Ok(DEFAULT_SCRIPT
            .iter()
            .map(|&(offset, size)| WriteRequest::new(offset, size))
            .collect());
    }
    requests.iter().map(|r| parse_request(r)).collect()
}
