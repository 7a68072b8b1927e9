//! Collection cost model.

use std::fmt;

/// Cost charged for one garbage collection.
///
/// The cost is `2 / (1 - fill_ratio)`, which diverges as the pool fills.
/// Once the fill ratio reaches 1 the cost is [`GcCost::Unbounded`] rather
/// than a floating-point infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GcCost {
    /// A finite cost.
    Finite(f64),
    /// The fill ratio is at or above 1.
    Unbounded,
}

impl GcCost {
    /// Computes the cost for a given fill ratio.
    #[must_use]
    pub fn from_fill_ratio(fill_ratio: f64) -> Self {
        if fill_ratio < 1.0 {
            Self::Finite(2.0 / (1.0 - fill_ratio))
        } else {
            Self::Unbounded
        }
    }

    /// Returns the numeric cost, or `None` for the unbounded sentinel.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(value),
            Self::Unbounded => None,
        }
    }

    /// Returns true for the unbounded sentinel.
    #[must_use]
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl fmt::Display for GcCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{value:.2}"),
            Self::Unbounded => f.write_str("∞"),
        }
    }
}

/// Ratio of accepted writes to total pool bytes.
///
/// The numerator counts write requests, not bytes.
#[must_use]
pub fn fill_ratio(total_writes: u64, total_capacity: u64) -> f64 {
    if total_capacity == 0 {
        return 1.0;
    }
    total_writes as f64 / total_capacity as f64
}
