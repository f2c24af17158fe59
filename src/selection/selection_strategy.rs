use std::cmp::Ordering;
use std::fmt::Debug;

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies.
///
/// Selection strategies choose chromosomes from an evaluated population based
/// on their fitness. The engine uses one for the mating order of every
/// generation and another one for its elites.
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects chromosomes from the population based on their fitness.
    ///
    /// # Arguments
    ///
    /// * `population` - The current, evaluated population.
    /// * `num_to_select` - The number of chromosomes to select.
    /// * `rng` - An optional random number generator for strategies that use randomness.
    ///   If a strategy requires randomness but `rng` is `None`, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The population is empty
    /// - A chromosome has not been evaluated yet
    /// - The selection process requires randomness but `rng` is `None`
    /// - The request cannot be satisfied by the strategy
    fn select(
        &self,
        population: &[Chromosome],
        num_to_select: usize,
        rng: Option<&mut RandomNumberGenerator>,
    ) -> Result<Vec<Chromosome>>;
}

/// Collects the fitness of every chromosome, failing on an empty or unevaluated population.
pub(crate) fn fitness_scores(population: &[Chromosome]) -> Result<Vec<f64>> {
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    population.iter().map(Chromosome::fitness).collect()
}

/// Population indices from fittest to weakest.
///
/// The sort is stable, so ties keep population order. NaN sorts last.
pub(crate) fn descending_order(fitness: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..fitness.len()).collect();
    indices.sort_by(|&a, &b| {
        let (fa, fb) = (fitness[a], fitness[b]);
        match (fa.is_nan(), fb.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => fb.partial_cmp(&fa).unwrap_or(Ordering::Equal),
        }
    });
    indices
}
