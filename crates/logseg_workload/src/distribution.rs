//! Request distributions.

use crate::error::WorkloadError;
use std::fmt;
use std::str::FromStr;

/// How request offsets are spread across a segment.
///
/// Sizes are always drawn uniformly from `1..=capacity / 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// Offsets anywhere in `0..capacity`.
    Uniform,
    /// Offsets concentrated in the first quarter of the segment.
    Hotspot,
    /// Offsets stepping evenly through the segment, one step per request.
    Sequential,
}

impl Distribution {
    /// Every distribution, in reporting order.
    pub const ALL: [Self; 3] = [Self::Uniform, Self::Hotspot, Self::Sequential];

    /// Returns the distribution name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Hotspot => "hotspot",
            Self::Sequential => "sequential",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Distribution {
    type Err = WorkloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|distribution| distribution.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WorkloadError::UnknownDistribution(s.to_string()))
    }
}
