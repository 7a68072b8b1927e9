//! Benchmarks for logseg.
//!
//! The benchmarks live under `benches/`; this library holds shared setup.

#![warn(missing_docs)]

pub mod utils;
