//! Marking written ranges valid.

use crate::segment::container::Segment;
use crate::types::WriteRequest;

/// Writes the bytes of `request` into `segment` and marks them valid.
///
/// The range is clipped to the segment. Bytes that were already valid are
/// rewritten but not counted twice. Returns the number of bytes that became
/// valid.
pub(crate) fn write_range(segment: &mut Segment, request: &WriteRequest) -> usize {
    let mut newly_valid = 0;
    for position in request.clipped(segment.capacity()) {
        if segment.mark_written(position) {
            newly_valid += 1;
        }
    }
    newly_valid
}
