//! Segment store and write-request orchestration.

use crate::config::StoreConfig;
use crate::error::CoreResult;
use crate::gc::{fill_ratio, CollectionOutcome, GarbageCollector};
use crate::segment::allocator::first_fit;
use crate::segment::container::Segment;
use crate::segment::{invalidate_range, write_range};
use crate::stats::{SegmentStats, StoreCounters, StoreStats};
use crate::types::{SegmentId, WriteRequest};
use tracing::{debug, warn};

/// Result of processing one write request.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteOutcome {
    /// The request was written.
    Accepted {
        /// Segment that received the write.
        segment: SegmentId,
        /// Previously valid bytes invalidated by this write.
        invalidated: u64,
        /// Collection forced by a failed first allocation, if any.
        forced_collection: Option<CollectionOutcome>,
    },
    /// No segment could absorb the request, even after a forced collection.
    ///
    /// The request was dropped and no write counter changed.
    AllocationFailure {
        /// The dropped request.
        request: WriteRequest,
        /// Collection forced by the failed allocation, if enabled.
        forced_collection: Option<CollectionOutcome>,
    },
}

impl WriteOutcome {
    /// Returns true if the request was written.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Returns the segment that received the write.
    #[must_use]
    pub fn segment(&self) -> Option<SegmentId> {
        match self {
            Self::Accepted { segment, .. } => Some(*segment),
            Self::AllocationFailure { .. } => None,
        }
    }

    /// Returns the collection forced while processing the request.
    #[must_use]
    pub fn forced_collection(&self) -> Option<&CollectionOutcome> {
        match self {
            Self::Accepted {
                forced_collection, ..
            }
            | Self::AllocationFailure {
                forced_collection, ..
            } => forced_collection.as_ref(),
        }
    }
}

/// A fixed pool of segments with global counters.
///
/// The store is the only owner of its segments. Every operation runs to
/// completion before returning.
///
/// ## Example
///
/// ```rust
/// use logseg_core::{SegmentStore, WriteRequest};
///
/// let mut store = SegmentStore::with_geometry(2, 8).unwrap();
/// let _ = store.process_write_request(WriteRequest::new(0, 5));
/// let _ = store.process_write_request(WriteRequest::new(2, 3));
///
/// let segment = store.segments()[0].clone();
/// assert_eq!(segment.utilization(), 5);
/// assert_eq!(segment.invalidated_bytes(), 3);
///
/// assert!(store.collect().is_reclaimed());
/// ```
pub struct SegmentStore {
    config: StoreConfig,
    segments: Vec<Segment>,
    counters: StoreCounters,
    collector: GarbageCollector,
}

impl SegmentStore {
    /// Builds a store with every segment empty.
    pub fn new(config: StoreConfig) -> CoreResult<Self> {
        config.validate()?;

        let segments = (0..config.segment_count)
            .map(|index| Segment::new(SegmentId::new(index as u32), config.segment_capacity))
            .collect();

        debug!(
            segments = config.segment_count,
            capacity = config.segment_capacity,
            "initialized segment store"
        );

        Ok(Self {
            collector: GarbageCollector::new(config.gc_threshold),
            config,
            segments,
            counters: StoreCounters::default(),
        })
    }

    /// Builds a store of `segment_count` segments of `segment_capacity`
    /// bytes, with the remaining settings at their defaults.
    pub fn with_geometry(segment_count: usize, segment_capacity: usize) -> CoreResult<Self> {
        Self::new(
            StoreConfig::new()
                .segment_count(segment_count)
                .segment_capacity(segment_capacity),
        )
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns every segment in ID order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns a segment by ID.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    /// Finds a write target with the first-fit policy.
    pub fn allocate(&self, size: u64) -> Option<SegmentId> {
        first_fit(&self.segments, size)
    }

    /// Processes one write request.
    ///
    /// Allocates a target segment (collecting once and retrying once if the
    /// pool is full and forced collection is enabled), invalidates any valid
    /// bytes in the target range, writes the range and counts the write.
    pub fn process_write_request(&mut self, request: WriteRequest) -> WriteOutcome {
        let mut forced_collection = None;

        let target = match self.allocate(request.size) {
            Some(target) => target,
            None if !self.config.forced_collection => {
                warn!(%request, "no space available for write request");
                return WriteOutcome::AllocationFailure {
                    request,
                    forced_collection,
                };
            }
            None => {
                warn!(%request, "space full, triggering garbage collection");
                forced_collection = Some(self.collect());

                match self.allocate(request.size) {
                    Some(target) => target,
                    None => {
                        warn!(%request, "no space available after garbage collection");
                        return WriteOutcome::AllocationFailure {
                            request,
                            forced_collection,
                        };
                    }
                }
            }
        };

        let segment = &mut self.segments[target.index()];
        let invalidated = invalidate_range(segment, &request);
        write_range(segment, &request);
        self.counters.record_write(invalidated);

        debug!(
            %request,
            segment = %target,
            invalidated,
            utilization = segment.utilization(),
            "write accepted"
        );

        WriteOutcome::Accepted {
            segment: target,
            invalidated,
            forced_collection,
        }
    }

    /// Returns true if enough segments are in use to warrant a collection.
    pub fn needs_collection(&self) -> bool {
        self.collector.needs_collection(&self.segments)
    }

    /// Runs one garbage collection cycle.
    pub fn collect(&mut self) -> CollectionOutcome {
        self.collector.collect(
            &mut self.segments,
            &mut self.counters,
            self.config.total_capacity(),
        )
    }

    /// Returns the current fill ratio used by the cost model.
    pub fn fill_ratio(&self) -> f64 {
        fill_ratio(self.counters.total_writes, self.config.total_capacity())
    }

    /// Returns a snapshot of store-wide statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats::collect(&self.counters, &self.segments, self.fill_ratio())
    }

    /// Returns a snapshot of every segment.
    pub fn segment_stats(&self) -> Vec<SegmentStats> {
        self.segments.iter().map(SegmentStats::from).collect()
    }

    /// Returns a snapshot of the segments holding valid bytes.
    pub fn active_segment_stats(&self) -> Vec<SegmentStats> {
        self.segments
            .iter()
            .filter(|segment| !segment.is_empty())
            .map(SegmentStats::from)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn segment_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.index()]
    }
}

impl std::fmt::Debug for SegmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentStore")
            .field("segment_count", &self.config.segment_count)
            .field("segment_capacity", &self.config.segment_capacity)
            .field("total_writes", &self.counters.total_writes)
            .field("gc_count", &self.counters.gc_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::GcCost;

    fn create_store(count: usize, capacity: usize) -> SegmentStore {
        SegmentStore::with_geometry(count, capacity).unwrap()
    }

    #[test]
    fn initial_state() {
        let store = create_store(4, 8);
        let stats = store.stats();

        assert_eq!(store.segments().len(), 4);
        assert_eq!(stats.total_writes, 0);
        assert_eq!(stats.total_invalidated, 0);
        assert_eq!(stats.gc_count, 0);
        assert_eq!(stats.total_gc_cost, 0.0);
        for (index, segment) in store.segments().iter().enumerate() {
            assert_eq!(segment.id(), SegmentId::new(index as u32));
            assert!(segment.is_empty());
        }
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(SegmentStore::with_geometry(0, 8).is_err());
        assert!(SegmentStore::with_geometry(4, 0).is_err());
    }

    #[test]
    fn fresh_write() {
        let mut store = create_store(4, 8);
        let outcome = store.process_write_request(WriteRequest::new(0, 5));

        assert_eq!(outcome.segment(), Some(SegmentId::new(0)));
        let segment = &store.segments()[0];
        assert_eq!(segment.utilization(), 5);
        assert_eq!(segment.invalidated_bytes(), 0);
        assert_eq!(store.stats().total_writes, 1);
    }

    #[test]
    fn overlapping_rewrite_churns() {
        let mut store = create_store(4, 8);
        let _ = store.process_write_request(WriteRequest::new(0, 5));
        let outcome = store.process_write_request(WriteRequest::new(2, 3));

        assert!(matches!(
            outcome,
            WriteOutcome::Accepted {
                invalidated: 3,
                ..
            }
        ));
        let segment = &store.segments()[0];
        assert_eq!(segment.utilization(), 5);
        assert_eq!(segment.invalidated_bytes(), 3);

        let stats = store.stats();
        assert_eq!(stats.total_writes, 2);
        assert_eq!(stats.total_invalidated, 3);
    }

    #[test]
    fn request_too_large_for_first_segment_moves_on() {
        let mut store = create_store(2, 8);
        let _ = store.process_write_request(WriteRequest::new(0, 6));
        let outcome = store.process_write_request(WriteRequest::new(0, 4));

        assert_eq!(outcome.segment(), Some(SegmentId::new(1)));
        assert_eq!(store.segments()[0].utilization(), 6);
        assert_eq!(store.segments()[1].utilization(), 4);
    }

    #[test]
    fn out_of_range_write_is_clipped() {
        let mut store = create_store(1, 8);
        let outcome = store.process_write_request(WriteRequest::new(6, 2));
        assert!(outcome.is_accepted());

        // Accepted and counted even though nothing lands in the segment.
        let outcome = store.process_write_request(WriteRequest::new(50, 1));
        assert!(outcome.is_accepted());
        assert_eq!(store.segments()[0].utilization(), 2);
        assert_eq!(store.stats().total_writes, 2);
    }

    #[test]
    fn full_pool_without_victim_fails() {
        let mut store = create_store(2, 8);
        let _ = store.process_write_request(WriteRequest::new(0, 8));
        let _ = store.process_write_request(WriteRequest::new(0, 8));

        let outcome = store.process_write_request(WriteRequest::new(0, 1));

        assert_eq!(
            outcome,
            WriteOutcome::AllocationFailure {
                request: WriteRequest::new(0, 1),
                forced_collection: Some(CollectionOutcome::NoVictim),
            }
        );
        let stats = store.stats();
        assert_eq!(stats.total_writes, 2);
        assert_eq!(stats.gc_count, 0);
    }

    #[test]
    fn failure_without_forced_collection() {
        let config = StoreConfig::new()
            .segment_count(1)
            .segment_capacity(8)
            .forced_collection(false);
        let mut store = SegmentStore::new(config).unwrap();
        store.segment_mut(SegmentId::new(0)).force_state(0..8, 4);

        let outcome = store.process_write_request(WriteRequest::new(0, 1));

        assert_eq!(outcome.forced_collection(), None);
        assert!(!outcome.is_accepted());
        assert_eq!(store.stats().gc_count, 0);
    }

    #[test]
    fn forced_collection_makes_room() {
        let mut store = create_store(2, 8);
        store.segment_mut(SegmentId::new(0)).force_state(0..8, 0);
        store.segment_mut(SegmentId::new(1)).force_state(0..8, 3);

        let outcome = store.process_write_request(WriteRequest::new(0, 4));

        // Segment 1 is reclaimed; its live bytes fold into segment 0 at the
        // same offsets, so the retry lands in the now empty segment 1.
        let forced = outcome.forced_collection().copied().unwrap();
        assert_eq!(forced.reclaimed(), Some(SegmentId::new(1)));
        assert_eq!(outcome.segment(), Some(SegmentId::new(1)));
        assert_eq!(store.stats().gc_count, 1);
        assert_eq!(store.stats().total_writes, 1);
    }

    #[test]
    fn collect_selects_segment_with_most_invalidated_bytes() {
        let mut store = create_store(3, 8);
        store.segment_mut(SegmentId::new(0)).force_state(0..5, 10);
        store.segment_mut(SegmentId::new(1)).force_state(0..3, 20);

        let outcome = store.collect();

        assert_eq!(outcome.reclaimed(), Some(SegmentId::new(1)));
        assert!(store.segments()[1].is_empty());
    }

    #[test]
    fn collect_without_invalidation_is_noop() {
        let mut store = create_store(3, 8);
        let _ = store.process_write_request(WriteRequest::new(0, 5));
        let before = store.stats();

        assert_eq!(store.collect(), CollectionOutcome::NoVictim);
        assert_eq!(store.stats(), before);
    }

    #[test]
    fn collect_cost_at_half_fill() {
        let mut store = create_store(4, 4);
        let _ = store.process_write_request(WriteRequest::new(0, 2));
        let _ = store.process_write_request(WriteRequest::new(0, 2));
        for _ in 0..6 {
            let _ = store.process_write_request(WriteRequest::new(0, 0));
        }
        assert!((store.fill_ratio() - 0.5).abs() < f64::EPSILON);

        let outcome = store.collect();

        assert_eq!(outcome.cost(), Some(GcCost::Finite(4.0)));
        let stats = store.stats();
        assert_eq!(stats.gc_count, 1);
        assert!((stats.total_gc_cost - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn needs_collection_tracks_occupancy() {
        let config = StoreConfig::new()
            .segment_count(4)
            .segment_capacity(8)
            .gc_threshold(0.5);
        let mut store = SegmentStore::new(config).unwrap();

        let _ = store.process_write_request(WriteRequest::new(0, 8));
        assert!(!store.needs_collection());
        let _ = store.process_write_request(WriteRequest::new(0, 8));
        assert!(store.needs_collection());
    }

    #[test]
    fn total_invalidated_survives_reclaim() {
        let mut store = create_store(2, 8);
        let _ = store.process_write_request(WriteRequest::new(0, 4));
        let _ = store.process_write_request(WriteRequest::new(0, 4));
        assert_eq!(store.stats().total_invalidated, 4);

        assert!(store.collect().is_reclaimed());
        assert_eq!(store.stats().total_invalidated, 4);
    }

    #[test]
    fn active_segment_stats_skips_empty() {
        let mut store = create_store(3, 8);
        let _ = store.process_write_request(WriteRequest::new(0, 8));
        let _ = store.process_write_request(WriteRequest::new(0, 2));

        let active = store.active_segment_stats();
        assert_eq!(active.len(), 2);
        assert_eq!(active[1].id, SegmentId::new(1));
        assert_eq!(store.segment_stats().len(), 3);
    }
}
