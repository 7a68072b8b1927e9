//! Benchmark utilities.

use logseg_core::{SegmentStore, StoreConfig, WriteRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed shared by every benchmark so runs are comparable.
pub const BENCH_SEED: u64 = 0xbe7c4;

/// Generate `count` random requests for segments of `capacity` bytes.
///
/// Sizes are at most a tenth of the capacity.
pub fn random_requests(count: usize, capacity: u64) -> Vec<WriteRequest> {
    let mut rng = StdRng::seed_from_u64(BENCH_SEED);
    let max_size = (capacity / 10).max(1);
    (0..count)
        .map(|_| WriteRequest::new(rng.gen_range(0..capacity), rng.gen_range(1..=max_size)))
        .collect()
}

/// Create a store of `segments` segments of `capacity` bytes.
///
/// # Panics
///
/// Panics if the geometry is invalid.
pub fn store(segments: usize, capacity: usize) -> SegmentStore {
    SegmentStore::new(
        StoreConfig::new()
            .segment_count(segments)
            .segment_capacity(capacity),
    )
    .expect("invalid benchmark geometry")
}

/// Create a store whose first segment is full with half of it rewritten,
/// and whose remaining segments are full of live data.
///
/// A collection on the result always reclaims segment 0.
pub fn store_ready_for_collection(segments: usize, capacity: usize) -> SegmentStore {
    let mut store = store(segments, capacity);
    let half = (capacity / 2) as u64;
    let _ = store.process_write_request(WriteRequest::new(0, half));
    let _ = store.process_write_request(WriteRequest::new(0, half));
    let _ = store.process_write_request(WriteRequest::new(half, capacity as u64 - half));
    for _ in 1..segments {
        let _ = store.process_write_request(WriteRequest::new(0, capacity as u64));
    }
    store
}
