//! Stress tests for the segment store.
//!
//! These drive long workloads through small pools so that forced and
//! automatic collections happen continuously.

use crate::fixtures::store_with;
use crate::invariants::check_store;
use logseg_core::{StoreConfig, WriteRequest};
use logseg_workload::{drive, Distribution, NoopObserver, Workload, WorkloadConfig};
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: u64,
    /// Successful operations.
    pub successful_ops: u64,
    /// Failed operations.
    pub failed_ops: u64,
    /// Collections that reclaimed a segment.
    pub reclaimed: u64,
    /// Invariant violations found at the end of the run.
    pub violations: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: u64, failed: u64, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            reclaimed: 0,
            violations: 0,
            duration,
            ops_per_second,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of requests to process.
    pub operations: u64,
    /// Segments in the pool.
    pub segments: usize,
    /// Capacity of each segment.
    pub capacity: usize,
    /// Request distribution.
    pub distribution: Distribution,
    /// RNG seed.
    pub seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            segments: 16,
            capacity: 256,
            distribution: Distribution::Uniform,
            seed: 0x5eed,
        }
    }
}

impl StressConfig {
    fn store_config(&self) -> StoreConfig {
        StoreConfig::new()
            .segment_count(self.segments)
            .segment_capacity(self.capacity)
    }
}

/// Runs a generated workload with automatic collection.
pub fn stress_workload(config: &StressConfig) -> StressTestResult {
    let mut store = store_with(config.store_config());
    let workload = Workload::new(
        WorkloadConfig::new(config.distribution)
            .requests(config.operations)
            .seed(config.seed),
    );

    let start = Instant::now();
    let summary = workload.run(&mut store, &mut NoopObserver);
    let mut result =
        StressTestResult::new(summary.accepted, summary.allocation_failures, start.elapsed());
    result.reclaimed = summary.reclaimed_segments;
    result.violations = check_store(&store).len();
    result
}

/// Repeatedly rewrites the head of every segment so that each write
/// invalidates bytes and collections always find a victim.
pub fn stress_rewrites(config: &StressConfig) -> StressTestResult {
    let mut store = store_with(config.store_config());
    let size = (config.capacity as u64 / 2).max(1);
    let requests = (0..config.operations).map(|i| WriteRequest::new(i % 2, size));

    let start = Instant::now();
    let summary = drive(&mut store, requests, true, &mut NoopObserver);
    let mut result =
        StressTestResult::new(summary.accepted, summary.allocation_failures, start.elapsed());
    result.reclaimed = summary.reclaimed_segments;
    result.violations = check_store(&store).len();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> StressConfig {
        StressConfig {
            operations: 2_000,
            ..StressConfig::default()
        }
    }

    #[test]
    fn throughput_from_duration() {
        let result = StressTestResult::new(300, 100, Duration::from_secs(2));
        assert_eq!(result.total_ops, 400);
        assert!((result.ops_per_second - 200.0).abs() < f64::EPSILON);
        assert_eq!(StressTestResult::new(1, 0, Duration::ZERO).ops_per_second, 0.0);
    }

    #[test]
    fn every_distribution_survives() {
        for distribution in Distribution::ALL {
            let result = stress_workload(&StressConfig {
                distribution,
                ..quick()
            });
            assert_eq!(result.total_ops, 2_000);
            assert_eq!(result.violations, 0);
        }
    }

    #[test]
    fn rewrites_never_fail() {
        let result = stress_rewrites(&quick());
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.violations, 0);
    }
}
