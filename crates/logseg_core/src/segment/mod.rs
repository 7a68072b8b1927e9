//! Segment pool and write path.
//!
//! A segment is a fixed-capacity run of byte slots. Each slot carries a
//! validity bit; `utilization` counts the valid slots and
//! `invalidated_bytes` counts valid-to-invalid transitions since the segment
//! was last reclaimed.
//!
//! ## Write path
//!
//! ```text
//! request -> allocate (first fit) -> [forced GC + retry once] -> invalidate range -> write range -> count
//! ```
//!
//! Invalidation always runs before the write, so rewriting a valid range in
//! the same segment leaves `utilization` unchanged but adds every touched
//! byte to `invalidated_bytes`.

mod allocator;
mod container;
mod invalidation;
mod store;
mod writer;

pub use allocator::first_fit;
pub use container::Segment;
pub use store::{SegmentStore, WriteOutcome};

pub(crate) use invalidation::invalidate_range;
pub(crate) use writer::write_range;
