//! Invalidation of overwritten bytes.

use crate::segment::container::Segment;
use crate::types::WriteRequest;

/// Clears every valid byte of `segment` covered by `request`.
///
/// The range is clipped to the segment. Bytes that are already invalid are
/// left alone. Returns the number of bytes invalidated, which the caller
/// adds to the store-wide total.
pub(crate) fn invalidate_range(segment: &mut Segment, request: &WriteRequest) -> u64 {
    let mut invalidated = 0;
    for position in request.clipped(segment.capacity()) {
        if segment.mark_invalidated(position) {
            invalidated += 1;
        }
    }
    invalidated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SegmentId;

    fn segment_with_valid(range: std::ops::Range<usize>) -> Segment {
        let mut segment = Segment::new(SegmentId::new(0), 8);
        segment.force_state(range, 0);
        segment
    }

    #[test]
    fn virgin_range_is_noop() {
        let mut segment = Segment::new(SegmentId::new(0), 8);
        assert_eq!(invalidate_range(&mut segment, &WriteRequest::new(0, 8)), 0);
        assert_eq!(segment.invalidated_bytes(), 0);
    }

    #[test]
    fn clears_overlap_only() {
        let mut segment = segment_with_valid(0..5);
        let cleared = invalidate_range(&mut segment, &WriteRequest::new(2, 6));

        assert_eq!(cleared, 3);
        assert_eq!(segment.utilization(), 2);
        assert_eq!(segment.invalidated_bytes(), 3);
        assert!(segment.is_valid(1));
        assert!(!segment.is_valid(2));
    }

    #[test]
    fn idempotent_per_byte() {
        let mut segment = segment_with_valid(0..4);
        invalidate_range(&mut segment, &WriteRequest::new(0, 4));
        let second = invalidate_range(&mut segment, &WriteRequest::new(0, 4));

        assert_eq!(second, 0);
        assert_eq!(segment.invalidated_bytes(), 4);
    }

    #[test]
    fn clipped_to_capacity() {
        let mut segment = segment_with_valid(6..8);
        let cleared = invalidate_range(&mut segment, &WriteRequest::new(7, 100));
        assert_eq!(cleared, 1);
        assert_eq!(segment.utilization(), 1);
    }
}
