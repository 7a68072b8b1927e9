//! # logseg Core
//!
//! Write path and space-reclamation engine for a log-structured segment
//! store.
//!
//! This crate provides:
//! - Fixed-capacity segments with a per-byte validity map
//! - A fixed pool of segments with global write/invalidation counters
//! - First-fit allocation of write targets
//! - Invalidation of overwritten byte ranges
//! - Greedy garbage collection with compaction and a cost model
//!
//! The engine is single-threaded and deterministic. It never prints:
//! every operation returns a structured outcome and emits `tracing`
//! events, leaving presentation to the caller.
//!
//! ## Example
//!
//! ```rust
//! use logseg_core::{SegmentStore, StoreConfig, WriteRequest};
//!
//! let config = StoreConfig::new().segment_count(4).segment_capacity(8);
//! let mut store = SegmentStore::new(config).unwrap();
//!
//! let outcome = store.process_write_request(WriteRequest::new(0, 5));
//! assert!(outcome.is_accepted());
//! assert_eq!(store.stats().total_writes, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gc;
mod segment;
mod stats;
mod types;

pub use config::{StoreConfig, DEFAULT_GC_THRESHOLD};
pub use error::{CoreError, CoreResult};
pub use gc::{fill_ratio, CollectionOutcome, GarbageCollector, GcCost};
pub use segment::{first_fit, Segment, SegmentStore, WriteOutcome};
pub use stats::{SegmentStats, StoreStats};
pub use types::{SegmentId, WriteRequest};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
