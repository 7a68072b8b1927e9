//! # logseg Workload
//!
//! Synthetic write workloads for a [`logseg_core::SegmentStore`].
//!
//! This crate provides:
//! - Request distributions (`uniform`, `hotspot`, `sequential`)
//! - A seedable request generator
//! - A driver that feeds requests to a store, optionally collecting
//!   garbage after every request, and reports each outcome to an observer
//!
//! ## Example
//!
//! ```rust
//! use logseg_core::SegmentStore;
//! use logseg_workload::{Distribution, NoopObserver, Workload, WorkloadConfig};
//!
//! let mut store = SegmentStore::with_geometry(16, 64).unwrap();
//! let config = WorkloadConfig::new(Distribution::Hotspot)
//!     .requests(100)
//!     .seed(42);
//!
//! let summary = Workload::new(config).run(&mut store, &mut NoopObserver);
//! assert_eq!(summary.requests, 100);
//! assert_eq!(summary.accepted, store.stats().total_writes);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod distribution;
mod driver;
mod error;
mod generator;

pub use distribution::Distribution;
pub use driver::{
    drive, CollectionTrigger, NoopObserver, Workload, WorkloadConfig, WorkloadObserver,
    WorkloadSummary,
};
pub use error::{WorkloadError, WorkloadResult};
pub use generator::{parse_request, seeded_rng, RequestGenerator};

/// Request list replayed by default: writes, overlapping rewrites and a
/// write near the end of a 1 KiB segment.
pub const DEFAULT_SCRIPT: [(u64, u64); 6] = [
    (0, 100),
    (50, 50),
    (200, 300),
    (300, 100),
    (400, 100),
    (900, 100),
];
