/*!
 * Random Input Source
 * Uniform pseudo-random f64 values in a bounded range
 */

use crate::core::errors::SourceError;
use crate::core::limits::{RANDOM_RANGE_MAX, RANDOM_RANGE_MIN};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Uniform generator over `[min, max)`
///
/// Seed it with [`RandomSource::with_seed`] when a trial must be replayed
/// with identical input.
pub struct RandomSource {
    rng: StdRng,
    dist: Uniform<f64>,
    min: f64,
    max: f64,
}

impl RandomSource {
    /// Entropy-seeded source over `[min, max)`
    pub fn new(min: f64, max: f64) -> Result<Self, SourceError> {
        Self::build(min, max, StdRng::from_entropy())
    }

    /// Deterministic source over `[min, max)`
    pub fn with_seed(min: f64, max: f64, seed: u64) -> Result<Self, SourceError> {
        Self::build(min, max, StdRng::seed_from_u64(seed))
    }

    /// Entropy-seeded source over the default `[-9999, 9999)` range
    pub fn default_range() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            dist: Uniform::new(RANDOM_RANGE_MIN, RANDOM_RANGE_MAX),
            min: RANDOM_RANGE_MIN,
            max: RANDOM_RANGE_MAX,
        }
    }

    fn build(min: f64, max: f64, rng: StdRng) -> Result<Self, SourceError> {
        // Uniform::new panics on an empty or non-finite range
        if min.is_nan() || max.is_nan() || min >= max || !(max - min).is_finite() {
            return Err(SourceError::InvalidRange { min, max });
        }

        Ok(Self {
            rng,
            dist: Uniform::new(min, max),
            min,
            max,
        })
    }

    #[inline]
    pub fn next_value(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }

    /// Generate `len` values
    pub fn fill(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.next_value()).collect()
    }

    #[inline]
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl Iterator for RandomSource {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        Some(self.next_value())
    }
}
