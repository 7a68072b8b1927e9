//! Run command implementation.

use crate::report::{self, EventPrinter, PhaseReport, RunReport};
use logseg_core::{SegmentStore, StoreConfig};
use logseg_workload::{
    Distribution, NoopObserver, Workload, WorkloadConfig, WorkloadObserver, WorkloadSummary,
};
use std::path::Path;
use tracing::info;

/// Options for a generated run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Distribution of the first phase.
    pub distribution: Distribution,
    /// Requests in the first phase.
    pub requests: u64,
    /// Uniform requests in the follow-up phase; zero skips it.
    pub extra_requests: u64,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Collect when the threshold is reached.
    pub auto_collect: bool,
    /// Include non-empty segments in the report.
    pub details: bool,
    /// Print collections and dropped requests as they happen.
    pub events: bool,
}

/// Runs the run command.
pub fn run(
    config: StoreConfig,
    options: &RunOptions,
    format: &str,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SegmentStore::new(config)?;
    let report = simulate(&mut store, options);

    report::emit(&report, format, |r, out| r.render_text(out))?;
    if let Some(path) = report_path {
        report::write_json(path, &report)?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}

/// Drives both phases into `store` and builds the report.
pub fn simulate(store: &mut SegmentStore, options: &RunOptions) -> RunReport {
    let mut printer = EventPrinter::new(std::io::stdout());
    let mut noop = NoopObserver;
    let observer: &mut dyn WorkloadObserver = if options.events {
        &mut printer
    } else {
        &mut noop
    };

    let mut phases = Vec::new();

    let first = WorkloadConfig::new(options.distribution)
        .requests(options.requests)
        .auto_collect(options.auto_collect);
    let summary = run_phase(store, with_seed(first, options.seed), observer);
    phases.push(PhaseReport::new(options.distribution.name(), &summary));

    if options.extra_requests > 0 {
        let extra = WorkloadConfig::new(Distribution::Uniform)
            .requests(options.extra_requests)
            .auto_collect(options.auto_collect);
        // Offset the seed so the extra phase does not repeat the first one.
        let seed = options.seed.map(|seed| seed.wrapping_add(1));
        let summary = run_phase(store, with_seed(extra, seed), observer);
        phases.push(PhaseReport::new("additional uniform", &summary));
    }

    RunReport::new(store, phases, options.details)
}

fn with_seed(config: WorkloadConfig, seed: Option<u64>) -> WorkloadConfig {
    match seed {
        Some(seed) => config.seed(seed),
        None => config,
    }
}

fn run_phase(
    store: &mut SegmentStore,
    config: WorkloadConfig,
    observer: &mut dyn WorkloadObserver,
) -> WorkloadSummary {
    Workload::new(config).run(store, observer)
}
