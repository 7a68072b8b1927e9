//! Compare command implementation.

use crate::report::{self, CompareEntry, CompareReport, ConfigReport, PhaseReport, StoreReport};
use logseg_core::{SegmentStore, StoreConfig};
use logseg_workload::{Distribution, NoopObserver, Workload, WorkloadConfig};
use std::path::Path;
use tracing::info;

/// Runs the compare command.
pub fn run(
    config: StoreConfig,
    requests: u64,
    seed: Option<u64>,
    auto_collect: bool,
    format: &str,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = compare(config, requests, seed, auto_collect)?;

    report::emit(&report, format, |r, out| r.render_text(out))?;
    if let Some(path) = report_path {
        report::write_json(path, &report)?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}

/// Runs every distribution against its own fresh store.
pub fn compare(
    config: StoreConfig,
    requests: u64,
    seed: Option<u64>,
    auto_collect: bool,
) -> Result<CompareReport, Box<dyn std::error::Error>> {
    let mut entries = Vec::with_capacity(Distribution::ALL.len());

    for distribution in Distribution::ALL {
        let mut store = SegmentStore::new(config.clone())?;
        let mut workload = WorkloadConfig::new(distribution)
            .requests(requests)
            .auto_collect(auto_collect);
        if let Some(seed) = seed {
            workload = workload.seed(seed);
        }

        let summary = Workload::new(workload).run(&mut store, &mut NoopObserver);
        entries.push(CompareEntry {
            phase: PhaseReport::new(distribution.name(), &summary),
            store: StoreReport::from(&store.stats()),
        });
    }

    Ok(CompareReport {
        config: ConfigReport::from(&config),
        entries,
    })
}
