//! Report rendering.
//!
//! The core and workload crates return structured outcomes; everything
//! printed by the CLI is built here.

use logseg_core::{
    CollectionOutcome, SegmentStats, SegmentStore, StoreConfig, StoreStats, WriteOutcome,
    WriteRequest,
};
use logseg_workload::{CollectionTrigger, WorkloadObserver, WorkloadSummary};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Store geometry and policy used for a run.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    /// Number of segments.
    pub segments: usize,
    /// Capacity of each segment.
    pub capacity: usize,
    /// Collection threshold.
    pub threshold: f64,
    /// Whether a full pool forces a collection.
    pub forced_gc: bool,
}

impl From<&StoreConfig> for ConfigReport {
    fn from(config: &StoreConfig) -> Self {
        Self {
            segments: config.segment_count,
            capacity: config.segment_capacity,
            threshold: config.gc_threshold,
            forced_gc: config.forced_collection,
        }
    }
}

/// Store-wide statistics.
#[derive(Debug, Serialize)]
pub struct StoreReport {
    /// Accepted write requests.
    pub total_writes: u64,
    /// Bytes invalidated.
    pub total_invalidated: u64,
    /// Completed collections.
    pub gc_count: u64,
    /// Accumulated finite collection cost.
    pub total_gc_cost: f64,
    /// Segments holding valid bytes.
    pub segments_in_use: usize,
    /// Segments in the pool.
    pub segment_count: usize,
    /// Valid bytes across the pool.
    pub total_utilization: u64,
    /// Cost model fill ratio.
    pub fill_ratio: f64,
}

impl From<&StoreStats> for StoreReport {
    fn from(stats: &StoreStats) -> Self {
        Self {
            total_writes: stats.total_writes,
            total_invalidated: stats.total_invalidated,
            gc_count: stats.gc_count,
            total_gc_cost: stats.total_gc_cost,
            segments_in_use: stats.segments_in_use,
            segment_count: stats.segment_count,
            total_utilization: stats.total_utilization,
            fill_ratio: stats.fill_ratio,
        }
    }
}

/// A single segment.
#[derive(Debug, Serialize)]
pub struct SegmentReport {
    /// Segment ID.
    pub id: u32,
    /// Valid bytes.
    pub utilization: usize,
    /// Capacity.
    pub capacity: usize,
    /// Bytes invalidated since the last reclaim.
    pub invalidated_bytes: u64,
}

impl From<&SegmentStats> for SegmentReport {
    fn from(stats: &SegmentStats) -> Self {
        Self {
            id: stats.id.as_u32(),
            utilization: stats.utilization,
            capacity: stats.capacity,
            invalidated_bytes: stats.invalidated_bytes,
        }
    }
}

/// Counts from one workload phase.
#[derive(Debug, Serialize)]
pub struct PhaseReport {
    /// Phase label.
    pub label: String,
    /// Requests processed.
    pub requests: u64,
    /// Requests written.
    pub accepted: u64,
    /// Requests dropped.
    pub allocation_failures: u64,
    /// Collections forced by failed allocations.
    pub forced_collections: u64,
    /// Collections triggered by the occupancy threshold.
    pub automatic_collections: u64,
    /// Collections that reclaimed a segment.
    pub reclaimed_segments: u64,
    /// Bytes invalidated by this phase.
    pub invalidated_bytes: u64,
}

impl PhaseReport {
    /// Builds a phase report from a workload summary.
    pub fn new(label: impl Into<String>, summary: &WorkloadSummary) -> Self {
        Self {
            label: label.into(),
            requests: summary.requests,
            accepted: summary.accepted,
            allocation_failures: summary.allocation_failures,
            forced_collections: summary.forced_collections,
            automatic_collections: summary.automatic_collections,
            reclaimed_segments: summary.reclaimed_segments,
            invalidated_bytes: summary.invalidated_bytes,
        }
    }
}

/// Full report for a run against one store.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Store configuration.
    pub config: ConfigReport,
    /// Workload phases, in order.
    pub phases: Vec<PhaseReport>,
    /// Final store statistics.
    pub store: StoreReport,
    /// Non-empty segments (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentReport>>,
}

impl RunReport {
    /// Builds a report from the final state of `store`.
    pub fn new(store: &SegmentStore, phases: Vec<PhaseReport>, details: bool) -> Self {
        Self {
            config: ConfigReport::from(store.config()),
            phases,
            store: StoreReport::from(&store.stats()),
            segments: details.then(|| {
                store
                    .active_segment_stats()
                    .iter()
                    .map(SegmentReport::from)
                    .collect()
            }),
        }
    }

    /// Renders the report as text.
    pub fn render_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for phase in &self.phases {
            render_phase(out, phase)?;
        }
        render_store(out, &self.store)?;
        if let Some(segments) = &self.segments {
            render_segments(out, segments)?;
        }
        Ok(())
    }
}

fn render_phase(out: &mut dyn Write, phase: &PhaseReport) -> std::io::Result<()> {
    writeln!(out, "Workload ({}):", phase.label)?;
    writeln!(out, "  Requests:              {}", phase.requests)?;
    writeln!(out, "  Accepted:              {}", phase.accepted)?;
    writeln!(out, "  Allocation failures:   {}", phase.allocation_failures)?;
    writeln!(out, "  Forced collections:    {}", phase.forced_collections)?;
    writeln!(out, "  Automatic collections: {}", phase.automatic_collections)?;
    writeln!(out, "  Segments reclaimed:    {}", phase.reclaimed_segments)?;
    writeln!(out)
}

fn render_store(out: &mut dyn Write, store: &StoreReport) -> std::io::Result<()> {
    writeln!(out, "Store Summary:")?;
    writeln!(out, "  Total Writes:            {}", store.total_writes)?;
    writeln!(out, "  Total Invalidated Bytes: {}", store.total_invalidated)?;
    writeln!(out, "  Total Utilization:       {} bytes", store.total_utilization)?;
    writeln!(
        out,
        "  Total Segments Used:     {}/{}",
        store.segments_in_use, store.segment_count
    )?;
    writeln!(out, "  Garbage Collections:     {}", store.gc_count)?;
    writeln!(out, "  Total GC Cost:           {:.2}", store.total_gc_cost)?;
    writeln!(out, "  Fill Ratio:              {:.4}", store.fill_ratio)
}

fn render_segments(out: &mut dyn Write, segments: &[SegmentReport]) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Segment Details:")?;
    for segment in segments {
        writeln!(
            out,
            "  Segment ID: {}, Utilization: {}/{}, Invalidated Bytes: {}",
            segment.id, segment.utilization, segment.capacity, segment.invalidated_bytes
        )?;
    }
    Ok(())
}

/// One row of a distribution comparison.
#[derive(Debug, Serialize)]
pub struct CompareEntry {
    /// Workload counts.
    pub phase: PhaseReport,
    /// Store statistics after the workload.
    pub store: StoreReport,
}

/// Report for `compare`.
#[derive(Debug, Serialize)]
pub struct CompareReport {
    /// Store configuration shared by every entry.
    pub config: ConfigReport,
    /// One entry per distribution.
    pub entries: Vec<CompareEntry>,
}

impl CompareReport {
    /// Renders the report as text.
    pub fn render_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "Workload Summary ({}):", entry.phase.label)?;
            writeln!(out, "  Total Writes: {}", entry.store.total_writes)?;
            writeln!(
                out,
                "  Total Invalidated Bytes: {}",
                entry.store.total_invalidated
            )?;
            writeln!(
                out,
                "  Total Utilization: {} bytes",
                entry.store.total_utilization
            )?;
            writeln!(
                out,
                "  Total Segments Used: {}/{}",
                entry.store.segments_in_use, entry.store.segment_count
            )?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Prints request and collection events as they happen.
pub struct EventPrinter<W: Write> {
    out: W,
}

impl<W: Write> EventPrinter<W> {
    /// Creates a printer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{line}");
    }
}

impl<W: Write> WorkloadObserver for EventPrinter<W> {
    fn on_write(&mut self, _index: u64, request: &WriteRequest, outcome: &WriteOutcome) {
        if let WriteOutcome::AllocationFailure { .. } = outcome {
            self.line(format_args!("Error: No space available ({request})"));
        }
    }

    fn on_collection(&mut self, trigger: CollectionTrigger, outcome: &CollectionOutcome) {
        if trigger == CollectionTrigger::Forced {
            self.line(format_args!(
                "Warning: Space full, triggering garbage collection..."
            ));
        }
        match outcome {
            CollectionOutcome::Reclaimed { victim, cost, .. } => {
                self.line(format_args!(
                    "Garbage Collection: Freed Segment {}",
                    victim.as_u32()
                ));
                self.line(format_args!("Garbage Collection Cost: {cost}"));
            }
            CollectionOutcome::NoVictim => {
                self.line(format_args!("Garbage Collection: No suitable victim found."));
            }
            CollectionOutcome::NoDestination { .. } => {
                self.line(format_args!(
                    "Garbage Collection: No space available for compaction."
                ));
            }
        }
    }
}

/// Writes `value` to `path` as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Prints `value` to stdout in the requested format.
pub fn emit<T, F>(value: &T, format: &str, render_text: F) -> Result<(), Box<dyn std::error::Error>>
where
    T: Serialize,
    F: FnOnce(&T, &mut dyn Write) -> std::io::Result<()>,
{
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        "text" => render_text(value, &mut out as &mut dyn Write)?,
        other => return Err(format!("Unknown output format: {other}").into()),
    }
    Ok(())
}
