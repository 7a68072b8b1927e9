//! Store statistics.
//!
//! [`StoreStats`] and [`SegmentStats`] are plain snapshots taken from a
//! [`crate::SegmentStore`]; they do not change as the store keeps working.
//!
//! # Usage
//!
//! ```rust
//! use logseg_core::{SegmentStore, StoreConfig, WriteRequest};
//!
//! let mut store = SegmentStore::new(StoreConfig::new().segment_count(2).segment_capacity(8)).unwrap();
//! let _ = store.process_write_request(WriteRequest::new(0, 4));
//!
//! let stats = store.stats();
//! assert_eq!(stats.total_writes, 1);
//! assert_eq!(stats.segments_in_use, 1);
//! ```

use crate::gc::GcCost;
use crate::segment::Segment;
use crate::types::SegmentId;

/// Global counters owned by the store.
///
/// All fields are monotonically non-decreasing.
#[derive(Debug, Default, Clone)]
pub(crate) struct StoreCounters {
    pub(crate) total_writes: u64,
    pub(crate) total_invalidated: u64,
    pub(crate) gc_count: u64,
    pub(crate) total_gc_cost: f64,
}

impl StoreCounters {
    /// Records an accepted write that invalidated `invalidated` bytes.
    pub(crate) fn record_write(&mut self, invalidated: u64) {
        self.total_writes += 1;
        self.total_invalidated += invalidated;
    }

    /// Records a completed collection.
    ///
    /// The unbounded cost sentinel counts the collection but adds nothing to
    /// the accumulated cost.
    pub(crate) fn record_collection(&mut self, cost: GcCost) {
        if let Some(value) = cost.value() {
            self.total_gc_cost += value;
        }
        self.gc_count += 1;
    }
}

/// Snapshot of a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStats {
    /// Segment ID.
    pub id: SegmentId,
    /// Valid bytes.
    pub utilization: usize,
    /// Segment capacity.
    pub capacity: usize,
    /// Bytes invalidated since the last reclaim.
    pub invalidated_bytes: u64,
}

impl From<&Segment> for SegmentStats {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id(),
            utilization: segment.utilization(),
            capacity: segment.capacity(),
            invalidated_bytes: segment.invalidated_bytes(),
        }
    }
}

/// Snapshot of store-wide statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    /// Accepted write requests.
    pub total_writes: u64,
    /// Bytes invalidated across all segments, including reclaimed ones.
    pub total_invalidated: u64,
    /// Completed garbage collections.
    pub gc_count: u64,
    /// Sum of finite collection costs.
    pub total_gc_cost: f64,
    /// Segments with at least one valid byte.
    pub segments_in_use: usize,
    /// Number of segments in the pool.
    pub segment_count: usize,
    /// Valid bytes across the pool.
    pub total_utilization: u64,
    /// `total_writes / (segment_count * capacity)`, the cost model input.
    pub fill_ratio: f64,
}

impl StoreStats {
    pub(crate) fn collect(counters: &StoreCounters, segments: &[Segment], fill_ratio: f64) -> Self {
        Self {
            total_writes: counters.total_writes,
            total_invalidated: counters.total_invalidated,
            gc_count: counters.gc_count,
            total_gc_cost: counters.total_gc_cost,
            segments_in_use: segments.iter().filter(|s| !s.is_empty()).count(),
            segment_count: segments.len(),
            total_utilization: segments.iter().map(|s| s.utilization() as u64).sum(),
            fill_ratio,
        }
    }

    /// Fraction of segments in use.
    #[must_use]
    pub fn occupancy(&self) -> f64 {
        if self.segment_count == 0 {
            return 0.0;
        }
        self.segments_in_use as f64 / self.segment_count as f64
    }
}
