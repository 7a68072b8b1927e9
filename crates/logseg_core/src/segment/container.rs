//! A single fixed-capacity segment.

use crate::types::SegmentId;
use std::fmt;

/// Marker stored in the payload buffer for every written byte.
const WRITTEN: u8 = 0x01;

/// A fixed-capacity segment with a per-byte validity map.
///
/// ## Invariants
///
/// - `validity.len() == buffer.len() == capacity`
/// - `utilization == validity.iter().filter(|v| **v).count()`, except
///   transiently while a compaction drains this segment
/// - `invalidated_bytes` only grows until [`Segment::reset`]
#[derive(Clone, PartialEq, Eq)]
pub struct Segment {
    id: SegmentId,
    capacity: usize,
    validity: Vec<bool>,
    buffer: Vec<u8>,
    utilization: usize,
    invalidated_bytes: u64,
}

impl Segment {
    /// Creates an empty segment.
    #[must_use]
    pub fn new(id: SegmentId, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            validity: vec![false; capacity],
            buffer: vec![0; capacity],
            utilization: 0,
            invalidated_bytes: 0,
        }
    }

    /// Returns the segment ID.
    #[must_use]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Returns the capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of valid bytes.
    #[must_use]
    pub fn utilization(&self) -> usize {
        self.utilization
    }

    /// Returns the number of bytes invalidated since the last reclaim.
    #[must_use]
    pub fn invalidated_bytes(&self) -> u64 {
        self.invalidated_bytes
    }

    /// Returns the number of bytes not counted as valid.
    #[must_use]
    pub fn free_capacity(&self) -> usize {
        self.capacity - self.utilization
    }

    /// Returns true if no byte is valid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.utilization == 0
    }

    /// Returns true if a further `size` bytes fit under the capacity.
    #[must_use]
    pub fn can_fit(&self, size: u64) -> bool {
        size <= self.free_capacity() as u64
    }

    /// Returns true if the byte at `position` is valid.
    ///
    /// Positions outside the segment are never valid.
    #[must_use]
    pub fn is_valid(&self, position: usize) -> bool {
        self.validity.get(position).copied().unwrap_or(false)
    }

    /// Returns the validity map.
    #[must_use]
    pub fn validity(&self) -> &[bool] {
        &self.validity
    }

    /// Returns the simulated payload.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Iterates over the positions currently marked valid.
    pub fn live_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.validity
            .iter()
            .enumerate()
            .filter_map(|(position, valid)| valid.then_some(position))
    }

    /// Stores a byte and marks it valid.
    ///
    /// Returns true if the position was previously invalid.
    pub(crate) fn mark_written(&mut self, position: usize) -> bool {
        self.buffer[position] = WRITTEN;
        if self.validity[position] {
            return false;
        }
        self.validity[position] = true;
        self.utilization += 1;
        true
    }

    /// Invalidates a valid byte, charging it to `invalidated_bytes`.
    ///
    /// Returns false if the position was already invalid.
    pub(crate) fn mark_invalidated(&mut self, position: usize) -> bool {
        if !self.validity[position] {
            return false;
        }
        self.validity[position] = false;
        self.utilization -= 1;
        self.invalidated_bytes += 1;
        true
    }

    /// Clears a validity bit without touching any counter.
    ///
    /// Used while draining a compaction victim, which is reset right after.
    pub(crate) fn release(&mut self, position: usize) {
        self.validity[position] = false;
    }

    /// Returns the segment to its freshly created state.
    pub(crate) fn reset(&mut self) {
        self.validity.fill(false);
        self.buffer.fill(0);
        self.utilization = 0;
        self.invalidated_bytes = 0;
    }

    /// Forces a state for tests: `valid` positions set, `invalidated` charged.
    #[cfg(test)]
    pub(crate) fn force_state(&mut self, valid: std::ops::Range<usize>, invalidated: u64) {
        self.reset();
        for position in valid {
            self.mark_written(position);
        }
        self.invalidated_bytes = invalidated;
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .field("utilization", &self.utilization)
            .field("invalidated_bytes", &self.invalidated_bytes)
            .finish_non_exhaustive()
    }
}
