//! Store fixtures.
//!
//! Convenience builders for stores in common starting states. These panic
//! on invalid input, which is what a test wants.

use logseg_core::{SegmentId, SegmentStore, StoreConfig, WriteOutcome, WriteRequest};

/// Segments in [`small_store`].
pub const SMALL_SEGMENTS: usize = 8;

/// Capacity of each segment in [`small_store`].
pub const SMALL_CAPACITY: usize = 64;

/// Creates a store of 8 segments of 64 bytes with default policy.
pub fn small_store() -> SegmentStore {
    store_with(
        StoreConfig::new()
            .segment_count(SMALL_SEGMENTS)
            .segment_capacity(SMALL_CAPACITY),
    )
}

/// Creates a store from `config`.
///
/// # Panics
///
/// Panics if the configuration is invalid.
pub fn store_with(config: StoreConfig) -> SegmentStore {
    SegmentStore::new(config).expect("Invalid store configuration")
}

/// Runs `f` with a fresh store built from `config`.
///
/// # Example
///
/// ```rust
/// use logseg_core::StoreConfig;
/// use logseg_testkit::with_store;
///
/// let writes = with_store(StoreConfig::new().segment_count(2), |store| {
///     store.stats().total_writes
/// });
/// assert_eq!(writes, 0);
/// ```
pub fn with_store<F, R>(config: StoreConfig, f: F) -> R
where
    F: FnOnce(&mut SegmentStore) -> R,
{
    let mut store = store_with(config);
    f(&mut store)
}

/// Fills the first `count` empty segments with full-capacity writes.
///
/// # Panics
///
/// Panics if a write is not accepted.
pub fn fill_segments(store: &mut SegmentStore, count: usize) -> Vec<SegmentId> {
    let capacity = store.config().segment_capacity as u64;
    (0..count)
        .map(|_| {
            let outcome = store.process_write_request(WriteRequest::new(0, capacity));
            outcome.segment().expect("Fill write was not accepted")
        })
        .collect()
}

/// Writes `size` bytes at offset 0, then rewrites them `rewrites` times.
///
/// Every rewrite lands in the same first-fit segment and invalidates the
/// previous copy. Returns the bytes invalidated.
pub fn churn(store: &mut SegmentStore, size: u64, rewrites: usize) -> u64 {
    let mut invalidated = 0;
    for _ in 0..=rewrites {
        if let WriteOutcome::Accepted {
            invalidated: bytes, ..
        } = store.process_write_request(WriteRequest::new(0, size))
        {
            invalidated += bytes;
        }
    }
    invalidated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_store_geometry() {
        let store = small_store();
        assert_eq!(store.segments().len(), SMALL_SEGMENTS);
        assert_eq!(store.config().segment_capacity, SMALL_CAPACITY);
    }

    #[test]
    fn fill_segments_in_order() {
        let mut store = small_store();
        let filled = fill_segments(&mut store, 3);

        assert_eq!(
            filled,
            vec![SegmentId::new(0), SegmentId::new(1), SegmentId::new(2)]
        );
        assert_eq!(store.stats().segments_in_use, 3);
    }

    #[test]
    fn churn_invalidates_previous_copies() {
        let mut store = small_store();
        let invalidated = churn(&mut store, 10, 3);

        assert_eq!(invalidated, 30);
        assert_eq!(store.segments()[0].utilization(), 10);
        assert_eq!(store.segments()[0].invalidated_bytes(), 30);
    }

    #[test]
    #[should_panic(expected = "Invalid store configuration")]
    fn store_with_rejects_empty_pool() {
        let _ = store_with(StoreConfig::new().segment_count(0));
    }
}
