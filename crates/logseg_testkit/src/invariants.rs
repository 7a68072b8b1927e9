//! Structural invariant checks.
//!
//! These look at a store from the outside, through its public accessors,
//! and report every violation found rather than stopping at the first.

use logseg_core::{Segment, SegmentId, SegmentStats, SegmentStore, StoreStats};
use std::cmp::Reverse;
use std::fmt;

/// A broken invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// The validity map does not have one entry per byte.
    ValidityLength {
        /// Segment checked.
        segment: SegmentId,
        /// Entries in the validity map.
        len: usize,
        /// Segment capacity.
        capacity: usize,
    },
    /// More valid bytes than the segment holds.
    OverCapacity {
        /// Segment checked.
        segment: SegmentId,
        /// Reported utilization.
        utilization: usize,
        /// Segment capacity.
        capacity: usize,
    },
    /// Utilization differs from the number of set validity bits.
    UtilizationMismatch {
        /// Segment checked.
        segment: SegmentId,
        /// Reported utilization.
        utilization: usize,
        /// Set validity bits.
        counted: usize,
    },
    /// Segment IDs are not `0..N` in order.
    IdOrder {
        /// Position in the pool.
        index: usize,
        /// ID found there.
        segment: SegmentId,
    },
    /// A store-wide counter went down.
    CounterDecreased {
        /// Counter name.
        counter: &'static str,
        /// Value before.
        before: u64,
        /// Value after.
        after: u64,
    },
    /// The accumulated collection cost went down.
    GcCostDecreased {
        /// Cost before.
        before: f64,
        /// Cost after.
        after: f64,
    },
    /// A segment lost invalidated bytes without being reclaimed.
    InvalidatedDecreased {
        /// Segment checked.
        segment: SegmentId,
        /// Invalidated bytes before.
        before: u64,
        /// Invalidated bytes after.
        after: u64,
    },
    /// A reclaimed segment still has invalidated bytes.
    NotReset {
        /// Segment checked.
        segment: SegmentId,
        /// Invalidated bytes left.
        invalidated_bytes: u64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidityLength {
                segment,
                len,
                capacity,
            } => write!(f, "{segment}: validity map has {len} entries, capacity {capacity}"),
            Self::OverCapacity {
                segment,
                utilization,
                capacity,
            } => write!(f, "{segment}: utilization {utilization} exceeds capacity {capacity}"),
            Self::UtilizationMismatch {
                segment,
                utilization,
                counted,
            } => write!(f, "{segment}: utilization {utilization}, {counted} valid bytes"),
            Self::IdOrder { index, segment } => write!(f, "position {index} holds {segment}"),
            Self::CounterDecreased {
                counter,
                before,
                after,
            } => write!(f, "{counter} decreased from {before} to {after}"),
            Self::GcCostDecreased { before, after } => {
                write!(f, "total_gc_cost decreased from {before} to {after}")
            }
            Self::InvalidatedDecreased {
                segment,
                before,
                after,
            } => write!(f, "{segment}: invalidated bytes went from {before} to {after}"),
            Self::NotReset {
                segment,
                invalidated_bytes,
            } => write!(f, "{segment}: reclaimed with {invalidated_bytes} invalidated"),
        }
    }
}

/// Checks one segment.
pub fn check_segment(segment: &Segment) -> Vec<Violation> {
    let mut violations = Vec::new();
    let id = segment.id();

    if segment.validity().len() != segment.capacity() {
        violations.push(Violation::ValidityLength {
            segment: id,
            len: segment.validity().len(),
            capacity: segment.capacity(),
        });
    }
    if segment.utilization() > segment.capacity() {
        violations.push(Violation::OverCapacity {
            segment: id,
            utilization: segment.utilization(),
            capacity: segment.capacity(),
        });
    }
    let counted = segment.validity().iter().filter(|&&valid| valid).count();
    if counted != segment.utilization() {
        violations.push(Violation::UtilizationMismatch {
            segment: id,
            utilization: segment.utilization(),
            counted,
        });
    }

    violations
}

/// Checks every segment of `store`.
pub fn check_store(store: &SegmentStore) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (index, segment) in store.segments().iter().enumerate() {
        if segment.id().index() != index {
            violations.push(Violation::IdOrder {
                index,
                segment: segment.id(),
            });
        }
        violations.extend(check_segment(segment));
    }
    violations
}

/// Checks that no store-wide counter decreased between two snapshots.
pub fn check_counters(before: &StoreStats, after: &StoreStats) -> Vec<Violation> {
    let mut violations: Vec<Violation> = [
        ("total_writes", before.total_writes, after.total_writes),
        (
            "total_invalidated",
            before.total_invalidated,
            after.total_invalidated,
        ),
        ("gc_count", before.gc_count, after.gc_count),
    ]
    .into_iter()
    .filter(|&(_, before, after)| after < before)
    .map(|(counter, before, after)| Violation::CounterDecreased {
        counter,
        before,
        after,
    })
    .collect();

    if after.total_gc_cost < before.total_gc_cost {
        violations.push(Violation::GcCostDecreased {
            before: before.total_gc_cost,
            after: after.total_gc_cost,
        });
    }
    violations
}

/// Checks per-segment invalidation between two snapshots.
///
/// Invalidated bytes only grow, except on `reclaimed`, which must have
/// none left. A write retried after a forced collection may land in the
/// reclaimed segment, so its utilization is not checked here.
pub fn check_segment_history(
    before: &[SegmentStats],
    after: &[SegmentStats],
    reclaimed: Option<SegmentId>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (old, new) in before.iter().zip(after) {
        if Some(new.id) == reclaimed {
            if new.invalidated_bytes != 0 {
                violations.push(Violation::NotReset {
                    segment: new.id,
                    invalidated_bytes: new.invalidated_bytes,
                });
            }
        } else if new.invalidated_bytes < old.invalidated_bytes {
            violations.push(Violation::InvalidatedDecreased {
                segment: new.id,
                before: old.invalidated_bytes,
                after: new.invalidated_bytes,
            });
        }
    }
    violations
}

/// Reference victim choice: the non-empty segment with the most
/// invalidated bytes, lowest ID on ties, none if nothing is invalidated.
pub fn expected_victim(segments: &[Segment]) -> Option<SegmentId> {
    segments
        .iter()
        .filter(|s| !s.is_empty() && s.invalidated_bytes() > 0)
        .min_by_key(|s| (Reverse(s.invalidated_bytes()), s.id()))
        .map(Segment::id)
}

/// Asserts that `store` has no structural violations.
///
/// # Panics
///
/// Panics with every violation found.
pub fn assert_invariants(store: &SegmentStore) {
    let violations = check_store(store);
    if !violations.is_empty() {
        let lines: Vec<String> = violations.iter().map(ToString::to_string).collect();
        panic!("store invariants violated:\n  {}", lines.join("\n  "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{churn, fill_segments, small_store};
    use logseg_core::WriteRequest;

    #[test]
    fn fresh_store_is_clean() {
        assert!(check_store(&small_store()).is_empty());
    }

    #[test]
    fn written_store_is_clean() {
        let mut store = small_store();
        fill_segments(&mut store, 2);
        churn(&mut store, 16, 4);
        let _ = store.process_write_request(WriteRequest::new(60, 100));
        assert_invariants(&store);
    }

    #[test]
    fn expected_victim_prefers_lowest_id_on_tie() {
        let mut store = small_store();
        // Segment 0 ends full with 32 bytes invalidated.
        churn(&mut store, 32, 1);
        let _ = store.process_write_request(WriteRequest::new(32, 32));
        // Segment 0 is full, so the same churn lands in segment 1.
        churn(&mut store, 32, 1);

        assert_eq!(store.segments()[1].invalidated_bytes(), 32);
        assert_eq!(expected_victim(store.segments()), Some(SegmentId::new(0)));
    }

    #[test]
    fn no_victim_without_invalidation() {
        let mut store = small_store();
        fill_segments(&mut store, 3);
        assert_eq!(expected_victim(store.segments()), None);
    }

    #[test]
    fn decreasing_counter_is_reported() {
        let mut store = small_store();
        let before = store.stats();
        churn(&mut store, 4, 2);
        let after = store.stats();

        assert!(check_counters(&before, &after).is_empty());
        let reversed = check_counters(&after, &before);
        assert_eq!(reversed.len(), 2);
        assert!(matches!(
            reversed[0],
            Violation::CounterDecreased {
                counter: "total_writes",
                ..
            }
        ));
    }

    #[test]
    fn decreasing_gc_cost_is_reported() {
        let mut store = small_store();
        churn(&mut store, 4, 2);
        let before = store.stats();
        assert!(store.collect().is_reclaimed());
        let after = store.stats();

        assert!(after.total_gc_cost > 0.0);
        assert!(check_counters(&before, &after).is_empty());
        let reversed = check_counters(&after, &before);
        assert!(reversed
            .iter()
            .any(|v| matches!(v, Violation::GcCostDecreased { .. })));
    }

    #[test]
    fn reclaim_is_the_only_invalidation_drop() {
        let mut store = small_store();
        churn(&mut store, 8, 2);
        let before = store.segment_stats();
        let victim = store.collect().reclaimed();
        let after = store.segment_stats();

        assert_eq!(victim, Some(SegmentId::new(0)));
        assert!(check_segment_history(&before, &after, victim).is_empty());
        assert_eq!(
            check_segment_history(&before, &after, None),
            vec![Violation::InvalidatedDecreased {
                segment: SegmentId::new(0),
                before: 16,
                after: 0,
            }]
        );
        // Blaming the wrong segment leaves the real drop unexplained.
        assert_eq!(
            check_segment_history(&before, &after, Some(SegmentId::new(1))).len(),
            1
        );
    }

    #[test]
    fn reclaimed_segment_must_be_cleared() {
        let mut store = small_store();
        churn(&mut store, 8, 1);
        let stats = store.segment_stats();

        assert_eq!(
            check_segment_history(&stats, &stats, Some(SegmentId::new(0))),
            vec![Violation::NotReset {
                segment: SegmentId::new(0),
                invalidated_bytes: 8,
            }]
        );
    }
}
