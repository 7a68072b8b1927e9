//! Garbage collection.
//!
//! A collection cycle is:
//!
//! 1. **Trigger**: [`GarbageCollector::needs_collection`] fires when the
//!    fraction of non-empty segments reaches the threshold. Callers check it
//!    after each request; the write path also collects when allocation fails.
//! 2. **Victim selection**: the non-empty segment with the most invalidated
//!    bytes, lowest ID on ties. Segments with nothing invalidated are never
//!    chosen.
//! 3. **Compaction**: live bytes move to a first-fit destination and the
//!    victim is reset (see [`compaction`]).
//! 4. **Cost accounting**: `2 / (1 - fill_ratio)` is charged (see
//!    [`GcCost`]).
//!
//! ## Invariants
//!
//! - "No victim" and "no destination" leave `gc_count` and `total_gc_cost`
//!   unchanged
//! - A reclaimed victim is indistinguishable from a freshly created segment

mod compaction;
mod cost;

pub use cost::{fill_ratio, GcCost};

use crate::segment::Segment;
use crate::stats::StoreCounters;
use crate::types::SegmentId;
use tracing::{debug, info, warn};

/// Result of one collection attempt.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectionOutcome {
    /// A victim was compacted and reset.
    Reclaimed {
        /// The reclaimed segment.
        victim: SegmentId,
        /// Segment that received the victim's live bytes.
        destination: SegmentId,
        /// Live bytes copied out of the victim.
        relocated: usize,
        /// Copied bytes that landed on already valid destination bytes.
        collided: usize,
        /// Cost charged for this collection.
        cost: GcCost,
    },
    /// No non-empty segment has invalidated bytes.
    NoVictim,
    /// A victim was chosen but no destination segment was available.
    NoDestination {
        /// The victim that could not be compacted.
        victim: SegmentId,
    },
}

impl CollectionOutcome {
    /// Returns true if a segment was reclaimed.
    #[must_use]
    pub fn is_reclaimed(&self) -> bool {
        matches!(self, Self::Reclaimed { .. })
    }

    /// Returns the reclaimed segment, if any.
    #[must_use]
    pub fn reclaimed(&self) -> Option<SegmentId> {
        match self {
            Self::Reclaimed { victim, .. } => Some(*victim),
            _ => None,
        }
    }

    /// Returns the charged cost, if a segment was reclaimed.
    #[must_use]
    pub fn cost(&self) -> Option<GcCost> {
        match self {
            Self::Reclaimed { cost, .. } => Some(*cost),
            _ => None,
        }
    }
}

/// Greedy garbage collector.
///
/// Holds only the trigger threshold; the pool and counters are passed in
/// by the owning store.
#[derive(Debug, Clone)]
pub struct GarbageCollector {
    threshold: f64,
}

impl GarbageCollector {
    /// Creates a collector with the given trigger threshold.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Returns true when the fraction of non-empty segments is at or above
    /// the threshold.
    #[must_use]
    pub fn needs_collection(&self, segments: &[Segment]) -> bool {
        if segments.is_empty() {
            return false;
        }
        let used = segments.iter().filter(|s| !s.is_empty()).count();
        used as f64 / segments.len() as f64 >= self.threshold
    }

    /// Picks the non-empty segment with the most invalidated bytes.
    ///
    /// Only a strictly larger count displaces the current pick, so ties go
    /// to the lowest ID. Returns `None` if no non-empty segment has any
    /// invalidated bytes.
    #[must_use]
    pub fn select_victim(segments: &[Segment]) -> Option<SegmentId> {
        let mut victim = None;
        let mut max_invalidated = 0;

        for segment in segments {
            if !segment.is_empty() && segment.invalidated_bytes() > max_invalidated {
                max_invalidated = segment.invalidated_bytes();
                victim = Some(segment.id());
            }
        }

        victim
    }

    /// Runs one collection cycle over `segments`.
    pub(crate) fn collect(
        &self,
        segments: &mut [Segment],
        counters: &mut StoreCounters,
        total_capacity: u64,
    ) -> CollectionOutcome {
        let Some(victim) = Self::select_victim(segments) else {
            debug!("garbage collection: no suitable victim");
            return CollectionOutcome::NoVictim;
        };

        let invalidated = segments[victim.index()].invalidated_bytes();

        let Some(report) = compaction::compact(segments, victim) else {
            warn!(victim = %victim, "garbage collection: no space available for compaction");
            return CollectionOutcome::NoDestination { victim };
        };

        let cost = GcCost::from_fill_ratio(fill_ratio(counters.total_writes, total_capacity));
        counters.record_collection(cost);

        info!(
            victim = %victim,
            destination = %report.destination,
            invalidated,
            relocated = report.relocated,
            cost = %cost,
            "garbage collection: freed segment"
        );

        CollectionOutcome::Reclaimed {
            victim,
            destination: report.destination,
            relocated: report.relocated,
            collided: report.collided,
            cost,
        }
    }
}
