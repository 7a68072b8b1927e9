//! Seedable write-request generator.

use crate::distribution::Distribution;
use crate::error::{WorkloadError, WorkloadResult};
use logseg_core::WriteRequest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Returns a generator RNG, seeded when `seed` is given.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Produces `total` write requests for segments of `capacity` bytes.
///
/// The random source is injected, so a seeded RNG yields the same sequence
/// on every run.
#[derive(Debug, Clone)]
pub struct RequestGenerator<R> {
    rng: R,
    distribution: Distribution,
    capacity: u64,
    total: u64,
    index: u64,
}

impl<R: Rng> RequestGenerator<R> {
    /// Creates a generator.
    pub fn new(rng: R, distribution: Distribution, capacity: u64, total: u64) -> Self {
        Self {
            rng,
            distribution,
            capacity,
            total,
            index: 0,
        }
    }

    fn offset(&mut self, index: u64) -> u64 {
        match self.distribution {
            Distribution::Uniform => self.rng.gen_range(0..self.capacity.max(1)),
            Distribution::Hotspot => self.rng.gen_range(0..(self.capacity / 4).max(1)),
            Distribution::Sequential => {
                // Step is zero once there are more requests than bytes.
                let step = self.capacity / self.total.max(1);
                index.wrapping_mul(step) % self.capacity.max(1)
            }
        }
    }

    fn size(&mut self) -> u64 {
        self.rng.gen_range(1..=(self.capacity / 10).max(1))
    }
}

impl<R: Rng> Iterator for RequestGenerator<R> {
    type Item = WriteRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let offset = self.offset(index);
        let size = self.size();
        Some(WriteRequest::new(offset, size))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.total - self.index).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Parses an `OFFSET:SIZE` pair.
pub fn parse_request(input: &str) -> WorkloadResult<WriteRequest> {
    let (offset, size) = input
        .split_once(':')
        .ok_or_else(|| WorkloadError::invalid_request(input))?;
    let offset = offset
        .trim()
        .parse()
        .map_err(|_| WorkloadError::invalid_request(input))?;
    let size = size
        .trim()
        .parse()
        .map_err(|_| WorkloadError::invalid_request(input))?;
    Ok(WriteRequest::new(offset, size))
}
