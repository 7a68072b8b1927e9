//! First-fit segment allocation.

use crate::segment::container::Segment;
use crate::types::SegmentId;

/// Returns the first segment, in ID order, with room for `size` more bytes.
///
/// Room means `utilization + size <= capacity`. No attempt is made to pick
/// the tightest fit. Returns `None` when no segment qualifies.
#[must_use]
pub fn first_fit(segments: &[Segment], size: u64) -> Option<SegmentId> {
    segments
        .iter()
        .find(|segment| segment.can_fit(size))
        .map(Segment::id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(count: u32, capacity: usize) -> Vec<Segment> {
        (0..count)
            .map(|id| Segment::new(SegmentId::new(id), capacity))
            .collect()
    }

    #[test]
    fn picks_lowest_id_on_empty_pool() {
        let segments = pool(4, 8);
        assert_eq!(first_fit(&segments, 8), Some(SegmentId::new(0)));
    }

    #[test]
    fn skips_segments_without_room() {
        let mut segments = pool(3, 8);
        segments[0].force_state(0..6, 0);
        segments[1].force_state(0..2, 0);

        assert_eq!(first_fit(&segments, 3), Some(SegmentId::new(1)));
        assert_eq!(first_fit(&segments, 7), Some(SegmentId::new(2)));
    }

    #[test]
    fn first_fit_not_best_fit() {
        let mut segments = pool(2, 8);
        segments[0].force_state(0..1, 0);
        segments[1].force_state(0..6, 0);

        // Segment 1 is the tighter fit for two bytes, but segment 0 comes first.
        assert_eq!(first_fit(&segments, 2), Some(SegmentId::new(0)));
    }

    #[test]
    fn none_when_request_exceeds_capacity() {
        let segments = pool(2, 8);
        assert_eq!(first_fit(&segments, 9), None);
    }

    #[test]
    fn zero_size_fits_full_segment() {
        let mut segments = pool(1, 8);
        segments[0].force_state(0..8, 0);
        assert_eq!(first_fit(&segments, 0), Some(SegmentId::new(0)));
        assert_eq!(first_fit(&segments, 1), None);
    }
}
