//! Property-based test generators using proptest.
//!
//! Strategies produce requests that stay mostly in range but also reach
//! past the segment end and exceed its capacity, so clipping and
//! allocation failure are exercised.

use logseg_core::{StoreConfig, WriteRequest};
use logseg_workload::Distribution;
use proptest::prelude::*;

/// Strategy for write requests against segments of `capacity` bytes.
pub fn write_request_strategy(capacity: u64) -> impl Strategy<Value = WriteRequest> {
    let capacity = capacity.max(1);
    prop_oneof![
        8 => (0..capacity, 0..=capacity)
            .prop_map(|(offset, size)| WriteRequest::new(offset, size)),
        1 => (0..capacity * 2, 0..=capacity)
            .prop_map(|(offset, size)| WriteRequest::new(offset, size)),
        1 => (0..capacity, capacity + 1..=capacity * 2)
            .prop_map(|(offset, size)| WriteRequest::new(offset, size)),
    ]
}

/// Strategy for small pool geometries: `(segment_count, segment_capacity)`.
pub fn geometry_strategy() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=8, 1usize..=64)
}

/// Strategy for valid store configurations with small geometries.
pub fn store_config_strategy() -> impl Strategy<Value = StoreConfig> {
    (geometry_strategy(), 0.05f64..=1.0, any::<bool>()).prop_map(
        |((count, capacity), threshold, forced)| {
            StoreConfig::new()
                .segment_count(count)
                .segment_capacity(capacity)
                .gc_threshold(threshold)
                .forced_collection(forced)
        },
    )
}

/// Strategy for request distributions.
pub fn distribution_strategy() -> impl Strategy<Value = Distribution> {
    prop_oneof![
        Just(Distribution::Uniform),
        Just(Distribution::Hotspot),
        Just(Distribution::Sequential),
    ]
}

/// A single operation applied to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// Process a write request
    Write(WriteRequest),
    /// Run one collection cycle
    Collect,
}

/// Strategy for store operations, mostly writes.
pub fn store_op_strategy(capacity: u64) -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        6 => write_request_strategy(capacity).prop_map(StoreOp::Write),
        1 => Just(StoreOp::Collect),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn op_sequence_strategy(
    capacity: u64,
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(store_op_strategy(capacity), min_ops..max_ops)
}

/// Strategy for a configuration together with operations sized for it.
pub fn scenario_strategy(max_ops: usize) -> impl Strategy<Value = (StoreConfig, Vec<StoreOp>)> {
    store_config_strategy().prop_flat_map(move |config| {
        let capacity = config.segment_capacity as u64;
        (Just(config), op_sequence_strategy(capacity, 1, max_ops))
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
