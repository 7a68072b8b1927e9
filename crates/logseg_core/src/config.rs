//! Store configuration.

use crate::error::{CoreError, CoreResult};

/// Occupancy fraction at which automatic collection fires.
pub const DEFAULT_GC_THRESHOLD: f64 = 0.9;

/// Configuration for building a [`crate::SegmentStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Number of segments in the pool.
    pub segment_count: usize,

    /// Capacity of every segment, in bytes.
    pub segment_capacity: usize,

    /// Fraction of non-empty segments at which collection is needed.
    pub gc_threshold: f64,

    /// Whether a failed allocation runs one garbage collection and retries.
    ///
    /// When disabled, a request that does not fit fails immediately.
    pub forced_collection: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            segment_count: 1024,
            segment_capacity: 1024,
            gc_threshold: DEFAULT_GC_THRESHOLD,
            forced_collection: true,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of segments.
    #[must_use]
    pub const fn segment_count(mut self, count: usize) -> Self {
        self.segment_count = count;
        self
    }

    /// Sets the capacity of each segment.
    #[must_use]
    pub const fn segment_capacity(mut self, capacity: usize) -> Self {
        self.segment_capacity = capacity;
        self
    }

    /// Sets the collection threshold.
    #[must_use]
    pub const fn gc_threshold(mut self, threshold: f64) -> Self {
        self.gc_threshold = threshold;
        self
    }

    /// Sets whether allocation failure forces a collection.
    #[must_use]
    pub const fn forced_collection(mut self, value: bool) -> Self {
        self.forced_collection = value;
        self
    }

    /// Total bytes across the pool.
    #[must_use]
    pub fn total_capacity(&self) -> u64 {
        self.segment_count as u64 * self.segment_capacity as u64
    }

    /// Checks that the configuration describes a usable pool.
    pub fn validate(&self) -> CoreResult<()> {
        if self.segment_count == 0 {
            return Err(CoreError::invalid_config("segment_count must be positive"));
        }
        if u32::try_from(self.segment_count).is_err() {
            return Err(CoreError::invalid_config(format!(
                "segment_count {} exceeds {}",
                self.segment_count,
                u32::MAX
            )));
        }
        if self.segment_capacity == 0 {
            return Err(CoreError::invalid_config(
                "segment_capacity must be positive",
            ));
        }
        if !(self.gc_threshold > 0.0 && self.gc_threshold <= 1.0) {
            return Err(CoreError::invalid_config(format!(
                "gc_threshold must be in (0, 1], got {}",
                self.gc_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.segment_count, 1024);
        assert_eq!(config.segment_capacity, 1024);
        assert!((config.gc_threshold - 0.9).abs() < f64::EPSILON);
        assert!(config.forced_collection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = StoreConfig::new()
            .segment_count(16)
            .segment_capacity(8)
            .gc_threshold(0.5)
            .forced_collection(false);

        assert_eq!(config.segment_count, 16);
        assert_eq!(config.segment_capacity, 8);
        assert!(!config.forced_collection);
        assert_eq!(config.total_capacity(), 128);
    }

    #[test]
    fn rejects_empty_pool() {
        let err = StoreConfig::new().segment_count(0).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(StoreConfig::new().segment_capacity(0).validate().is_err());
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        assert!(StoreConfig::new().gc_threshold(0.0).validate().is_err());
        assert!(StoreConfig::new().gc_threshold(1.5).validate().is_err());
        assert!(StoreConfig::new().gc_threshold(f64::NAN).validate().is_err());
        assert!(StoreConfig::new().gc_threshold(1.0).validate().is_ok());
    }
}
