//! Core type definitions for logseg.

use std::fmt;
use std::ops::Range;

/// Identifier of a segment within a store.
///
/// Identifiers are assigned once, in pool order, when the store is built.
/// Reclaiming a segment does not change its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub u32);

impl SegmentId {
    /// Creates a new segment ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the position of this segment in the pool.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg:{}", self.0)
    }
}

/// A request to write `size` bytes starting at `offset`.
///
/// `offset` is a byte position inside whichever segment the allocator picks.
/// There is no logical-to-physical mapping: the same offset may land in a
/// different segment on a later request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteRequest {
    /// Intra-segment position of the first byte.
    pub offset: u64,
    /// Number of bytes spanned.
    pub size: u64,
}

impl WriteRequest {
    /// Creates a new write request.
    #[must_use]
    pub const fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// Returns the byte positions covered inside a segment of `capacity`
    /// bytes.
    ///
    /// Positions at or past `capacity` are dropped; a request starting
    /// beyond the segment yields an empty range.
    #[must_use]
    pub fn clipped(&self, capacity: usize) -> Range<usize> {
        let capacity = capacity as u64;
        let start = self.offset.min(capacity);
        let end = self.offset.saturating_add(self.size).min(capacity);
        start as usize..end as usize
    }
}

impl fmt::Display for WriteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset: {}, size: {}", self.offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn segment_id_display() {
        assert_eq!(SegmentId::new(7).to_string(), "seg:7");
        assert_eq!(SegmentId::new(7).index(), 7);
    }

    #[test]
    fn clip_inside_bounds() {
        assert_eq!(WriteRequest::new(2, 3).clipped(8), 2..5);
    }

    #[test]
    fn clip_past_end() {
        assert_eq!(WriteRequest::new(6, 10).clipped(8), 6..8);
    }

    #[test]
    fn clip_start_beyond_capacity() {
        assert!(WriteRequest::new(100, 4).clipped(8).is_empty());
    }

    #[test]
    fn clip_saturates_on_overflow() {
        assert_eq!(WriteRequest::new(3, u64::MAX).clipped(8), 3..8);
    }

    #[test]
    fn zero_size_is_empty() {
        assert!(WriteRequest::new(0, 0).clipped(8).is_empty());
    }

    proptest! {
        #[test]
        fn clipped_range_stays_in_segment(
            offset in any::<u64>(),
            size in any::<u64>(),
            capacity in 1usize..4096,
        ) {
            let range = WriteRequest::new(offset, size).clipped(capacity);
            prop_assert!(range.start <= range.end);
            prop_assert!(range.end <= capacity);
            prop_assert!((range.len() as u64) <= size);
        }

        #[test]
        fn in_bounds_request_is_not_clipped(
            capacity in 1usize..4096,
            offset_seed in any::<u64>(),
            size_seed in any::<u64>(),
        ) {
            let offset = offset_seed % (capacity as u64 + 1);
            let size = size_seed % (capacity as u64 - offset + 1);
            let range = WriteRequest::new(offset, size).clipped(capacity);
            prop_assert_eq!(range, offset as usize..(offset + size) as usize);
        }
    }
}
