//! # RandomNumberGenerator
//!
//! Every random decision of a search (initial sampling, crossover and mutation
//! coin flips, weighted parent draws) goes through a single
//! `RandomNumberGenerator`. Seeding it makes a whole run reproducible.
//!
//! ## Example
//!
//! ```rust
//! use hyperga::rng::RandomNumberGenerator;
//!
//! let mut a = RandomNumberGenerator::from_seed(7);
//! let mut b = RandomNumberGenerator::from_seed(7);
//!
//! assert_eq!(a.gen_range(0..100), b.gen_range(0..100));
//! ```

use rand::{
    distributions::{
        uniform::{SampleRange, SampleUniform},
        Distribution, WeightedIndex,
    },
    rngs::StdRng,
    Rng, SeedableRng,
};

use crate::error::{GeneticError, Result};

/// A wrapper around the `rand` crate's `StdRng` used for every draw of a search.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a random value in the given range.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.gen_range(range)
    }

    /// Returns `true` with the given probability.
    ///
    /// Probabilities at or below zero (and NaN) never fire, probabilities at or
    /// above one always fire.
    pub fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            false
        } else if probability >= 1.0 {
            true
        } else {
            self.rng.gen_bool(probability)
        }
    }

    /// Draws an index with probability proportional to `weights[index]`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::RandomGeneration` if the weights are empty,
    /// negative, non-finite or all zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Result<usize> {
        let distribution = WeightedIndex::new(weights).map_err(|e| {
            GeneticError::RandomGeneration(format!("Invalid sampling weights: {}", e))
        })?;
        Ok(distribution.sample(&mut self.rng))
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
