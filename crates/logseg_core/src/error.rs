//! Error types for logseg core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building a segment store.
///
/// Runtime conditions such as a full pool or a collection without a
/// victim are not errors; they are reported through
/// [`crate::WriteOutcome`] and [`crate::CollectionOutcome`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The store configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message() {
        let err = CoreError::invalid_config("segment_count must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: segment_count must be positive"
        );
    }
}
