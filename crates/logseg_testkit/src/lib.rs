//! # logseg Testkit
//!
//! Test utilities for logseg.
//!
//! This crate provides:
//! - Store fixtures for common starting states
//! - Property-based test generators using proptest
//! - Structural invariant checks over a store
//! - Stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use logseg_testkit::prelude::*;
//!
//! let mut store = small_store();
//! fill_segments(&mut store, 4);
//! assert_invariants(&store);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod invariants;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::invariants::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use invariants::*;
pub use stress::*;
