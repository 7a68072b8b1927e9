//! Feeding requests to a store.

use crate::distribution::Distribution;
use crate::generator::{seeded_rng, RequestGenerator};
use logseg_core::{CollectionOutcome, SegmentStore, WriteOutcome, WriteRequest};
use tracing::{debug, info};

/// Why a collection ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionTrigger {
    /// Allocation failed and the write path collected before retrying.
    Forced,
    /// The occupancy threshold was reached after a request.
    Automatic,
}

/// Receives every outcome produced while driving a workload.
///
/// Both methods default to doing nothing.
pub trait WorkloadObserver {
    /// Called after each request is processed.
    fn on_write(&mut self, _index: u64, _request: &WriteRequest, _outcome: &WriteOutcome) {}

    /// Called after each collection, forced or automatic.
    fn on_collection(&mut self, _trigger: CollectionTrigger, _outcome: &CollectionOutcome) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl WorkloadObserver for NoopObserver {}

/// Counts gathered while driving a workload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadSummary {
    /// Requests processed.
    pub requests: u64,
    /// Requests written.
    pub accepted: u64,
    /// Requests dropped for lack of space.
    pub allocation_failures: u64,
    /// Collections run by the write path after a failed allocation.
    pub forced_collections: u64,
    /// Collections run because the occupancy threshold was reached.
    pub automatic_collections: u64,
    /// Collections, of either kind, that reclaimed a segment.
    pub reclaimed_segments: u64,
    /// Bytes invalidated by accepted writes.
    pub invalidated_bytes: u64,
}

impl WorkloadSummary {
    fn record_collection(&mut self, trigger: CollectionTrigger, outcome: &CollectionOutcome) {
        match trigger {
            CollectionTrigger::Forced => self.forced_collections += 1,
            CollectionTrigger::Automatic => self.automatic_collections += 1,
        }
        if outcome.is_reclaimed() {
            self.reclaimed_segments += 1;
        }
    }

    /// Adds the counts of `other` to this summary.
    pub fn merge(&mut self, other: &Self) {
        self.requests += other.requests;
        self.accepted += other.accepted;
        self.allocation_failures += other.allocation_failures;
        self.forced_collections += other.forced_collections;
        self.automatic_collections += other.automatic_collections;
        self.reclaimed_segments += other.reclaimed_segments;
        self.invalidated_bytes += other.invalidated_bytes;
    }
}

/// Feeds `requests` to `store` in order.
///
/// With `auto_collect`, the store is checked after every request and
/// collected when [`SegmentStore::needs_collection`] fires. Allocation
/// failures are counted and processing continues.
pub fn drive<I>(
    store: &mut SegmentStore,
    requests: I,
    auto_collect: bool,
    observer: &mut dyn WorkloadObserver,
) -> WorkloadSummary
where
    I: IntoIterator<Item = WriteRequest>,
{
    let mut summary = WorkloadSummary::default();

    for request in requests {
        let index = summary.requests;
        summary.requests += 1;

        let outcome = store.process_write_request(request);
        if let Some(forced) = outcome.forced_collection() {
            summary.record_collection(CollectionTrigger::Forced, forced);
            observer.on_collection(CollectionTrigger::Forced, forced);
        }
        match outcome {
            WriteOutcome::Accepted { invalidated, .. } => {
                summary.accepted += 1;
                summary.invalidated_bytes += invalidated;
            }
            WriteOutcome::AllocationFailure { .. } => summary.allocation_failures += 1,
        }
        observer.on_write(index, &request, &outcome);

        if auto_collect && store.needs_collection() {
            debug!(index, "occupancy threshold reached");
            let collected = store.collect();
            summary.record_collection(CollectionTrigger::Automatic, &collected);
            observer.on_collection(CollectionTrigger::Automatic, &collected);
        }
    }

    summary
}

/// Configuration for a generated workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    /// Offset distribution.
    pub distribution: Distribution,
    /// Number of requests to generate.
    pub requests: u64,
    /// Whether to collect after any request that crosses the threshold.
    pub auto_collect: bool,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            distribution: Distribution::Uniform,
            requests: 2000,
            auto_collect: true,
            seed: None,
        }
    }
}

impl WorkloadConfig {
    /// Creates a configuration for `distribution` with default settings.
    #[must_use]
    pub fn new(distribution: Distribution) -> Self {
        Self {
            distribution,
            ..Self::default()
        }
    }

    /// Sets the number of requests.
    #[must_use]
    pub const fn requests(mut self, requests: u64) -> Self {
        self.requests = requests;
        self
    }

    /// Sets whether to collect automatically.
    #[must_use]
    pub const fn auto_collect(mut self, value: bool) -> Self {
        self.auto_collect = value;
        self
    }

    /// Sets the RNG seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A generated workload.
#[derive(Debug, Clone)]
pub struct Workload {
    config: WorkloadConfig,
}

impl Workload {
    /// Creates a workload from its configuration.
    #[must_use]
    pub fn new(config: WorkloadConfig) -> Self {
        Self { config }
    }

    /// Generates the requests and drives them into `store`.
    pub fn run(
        &self,
        store: &mut SegmentStore,
        observer: &mut dyn WorkloadObserver,
    ) -> WorkloadSummary {
        let capacity = store.config().segment_capacity as u64;
        let generator = RequestGenerator::new(
            seeded_rng(self.config.seed),
            self.config.distribution,
            capacity,
            self.config.requests,
        );

        info!(
            distribution = %self.config.distribution,
            requests = self.config.requests,
            auto_collect = self.config.auto_collect,
            "generating workload"
        );

        let summary = drive(store, generator, self.config.auto_collect, observer);

        info!(
            accepted = summary.accepted,
            failed = summary.allocation_failures,
            reclaimed = summary.reclaimed_segments,
            "workload finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logseg_core::StoreConfig;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u64, bool)>,
        collections: Vec<CollectionTrigger>,
    }

    impl WorkloadObserver for Recorder {
        fn on_write(&mut self, index: u64, _request: &WriteRequest, outcome: &WriteOutcome) {
            self.writes.push((index, outcome.is_accepted()));
        }

        fn on_collection(&mut self, trigger: CollectionTrigger, _outcome: &CollectionOutcome) {
            self.collections.push(trigger);
        }
    }

    #[test]
    fn drive_counts_accepted_writes() {
        let mut store = SegmentStore::with_geometry(4, 8).unwrap();
        let requests = [WriteRequest::new(0, 5), WriteRequest::new(2, 3)];

        let summary = drive(&mut store, requests, false, &mut NoopObserver);

        assert_eq!(summary.requests, 2);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.invalidated_bytes, 3);
        assert_eq!(store.stats().total_writes, 2);
    }

    #[test]
    fn drive_reports_failures_and_continues() {
        let mut store = SegmentStore::with_geometry(1, 8).unwrap();
        let requests = [
            WriteRequest::new(0, 8),
            WriteRequest::new(0, 1),
            WriteRequest::new(0, 0),
        ];
        let mut recorder = Recorder::default();

        let summary = drive(&mut store, requests, false, &mut recorder);

        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.allocation_failures, 1);
        assert_eq!(summary.forced_collections, 1);
        assert_eq!(summary.reclaimed_segments, 0);
        assert_eq!(recorder.writes, vec![(0, true), (1, false), (2, true)]);
        assert_eq!(recorder.collections, vec![CollectionTrigger::Forced]);
    }

    #[test]
    fn auto_collect_after_threshold() {
        let config = StoreConfig::new()
            .segment_count(2)
            .segment_capacity(8)
            .gc_threshold(0.5);
        let mut store = SegmentStore::new(config).unwrap();
        let mut recorder = Recorder::default();

        // Second write overlaps the first, so the collector has a victim.
        let requests = [WriteRequest::new(0, 4), WriteRequest::new(0, 4)];
        let summary = drive(&mut store, requests, true, &mut recorder);

        assert_eq!(summary.automatic_collections, 2);
        assert_eq!(summary.reclaimed_segments, 1);
        assert_eq!(
            recorder.collections,
            vec![CollectionTrigger::Automatic, CollectionTrigger::Automatic]
        );
        assert_eq!(store.stats().gc_count, 1);
    }

    #[test]
    fn seeded_workloads_are_reproducible() {
        let config = WorkloadConfig::new(Distribution::Uniform)
            .requests(300)
            .seed(1234);

        let mut first = SegmentStore::with_geometry(8, 128).unwrap();
        let mut second = SegmentStore::with_geometry(8, 128).unwrap();
        let a = Workload::new(config.clone()).run(&mut first, &mut NoopObserver);
        let b = Workload::new(config).run(&mut second, &mut NoopObserver);

        assert_eq!(a, b);
        assert_eq!(first.stats(), second.stats());
        assert_eq!(first.segment_stats(), second.segment_stats());
    }

    #[test]
    fn summary_merge() {
        let mut total = WorkloadSummary {
            requests: 2,
            accepted: 1,
            ..WorkloadSummary::default()
        };
        total.merge(&WorkloadSummary {
            requests: 3,
            accepted: 3,
            reclaimed_segments: 1,
            ..WorkloadSummary::default()
        });
        assert_eq!(total.requests, 5);
        assert_eq!(total.accepted, 4);
        assert_eq!(total.reclaimed_segments, 1);
    }
}
