//! CLI command implementations.

pub mod compare;
pub mod replay;
pub mod run;
