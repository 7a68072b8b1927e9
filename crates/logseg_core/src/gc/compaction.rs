//! Victim compaction.
//!
//! The destination is found with the same first-fit lookup as ordinary
//! writes, asking for zero bytes. Live bytes keep their intra-segment
//! offset and go through the ordinary write path one byte at a time.
//!
//! ## Known collision
//!
//! A zero-byte first-fit lookup accepts any segment, so the destination is
//! usually the lowest-numbered segment. It can be the victim itself, in
//! which case the live bytes are discarded by the reset, or a segment that
//! already holds valid bytes at the same offsets, in which case the copied
//! bytes merge into them. Both cases are counted in
//! [`CompactionReport::collided`] and logged.

use crate::segment::{first_fit, write_range, Segment};
use crate::types::{SegmentId, WriteRequest};
use tracing::warn;

/// What a compaction pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CompactionReport {
    /// Segment that received the live bytes.
    pub(crate) destination: SegmentId,
    /// Live bytes copied out of the victim.
    pub(crate) relocated: usize,
    /// Copied bytes that landed on an already valid destination byte.
    pub(crate) collided: usize,
}

/// Moves the live bytes of `victim` out and resets it.
///
/// Returns `None`, leaving every segment untouched, if no destination is
/// found.
pub(crate) fn compact(segments: &mut [Segment], victim: SegmentId) -> Option<CompactionReport> {
    let destination = first_fit(segments, 0)?;
    if destination == victim {
        warn!(
            victim = %victim,
            "compaction destination is the victim itself; live bytes will be dropped"
        );
    }

    let live: Vec<usize> = segments[victim.index()].live_positions().collect();
    let mut collided = 0;
    for &position in &live {
        let byte = WriteRequest::new(position as u64, 1);
        if write_range(&mut segments[destination.index()], &byte) == 0 {
            collided += 1;
        }
        segments[victim.index()].release(position);
    }
    segments[victim.index()].reset();

    if collided > 0 && destination != victim {
        warn!(
            victim = %victim,
            destination = %destination,
            collided,
            "compaction merged live bytes into occupied offsets"
        );
    }

    Some(CompactionReport {
        destination,
        relocated: live.len(),
        collided,
    })
}
