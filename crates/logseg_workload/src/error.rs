//! Error types for workload configuration.

use thiserror::Error;

/// Result type for workload operations.
pub type WorkloadResult<T> = Result<T, WorkloadError>;

/// Errors that can occur while configuring a workload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    /// The distribution name is not recognised.
    #[error("unknown distribution type: {0}")]
    UnknownDistribution(String),

    /// A scripted request could not be parsed.
    #[error("invalid request '{input}': expected OFFSET:SIZE")]
    InvalidRequest {
        /// The text that failed to parse.
        input: String,
    },
}

impl WorkloadError {
    /// Creates an invalid request error.
    pub fn invalid_request(input: impl Into<String>) -> Self {
        Self::InvalidRequest {
            input: input.into(),
        }
    }
}
