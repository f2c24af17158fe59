use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{descending_order, fitness_scores, SelectionStrategy};

/// A selection strategy that draws chromosomes by their rank in the population.
///
/// The population is ranked from fittest (rank 1) to weakest (rank N), and
/// rank `r` is drawn with weight `1 / r`. Draws happen without replacement:
/// the drawn chromosome leaves the pool and the remaining ones are re-ranked
/// before the next draw. Selecting the whole population therefore yields a
/// permutation of it, a mating order in which fitter chromosomes tend to come
/// first.
///
/// Only ranks matter, so fitness scale and sign have no influence.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use hyperga::chromosome::Chromosome;
/// use hyperga::rng::RandomNumberGenerator;
/// use hyperga::selection::{RankBasedSelection, SelectionStrategy};
/// use hyperga::space::{Limit, SearchSpace};
///
/// # fn main() -> hyperga::error::Result<()> {
/// let space = Arc::new(SearchSpace::new().with("x", Limit::continuous(0.0, 1.0)?));
/// let mut rng = RandomNumberGenerator::from_seed(5);
/// let population: Vec<Chromosome> = (0..4)
///     .map(|_| Chromosome::random(Arc::clone(&space), &mut rng))
///     .collect();
///
/// // Selection needs evaluated chromosomes.
/// let selection = RankBasedSelection::new();
/// assert!(selection.select(&population, 4, Some(&mut rng)).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RankBasedSelection;

impl RankBasedSelection {
    pub fn new() -> Self {
        Self
    }

    /// Draw weights of ranks `1..=pool_size`.
    fn rank_weights(pool_size: usize) -> Vec<f64> {
        (1..=pool_size).map(|rank| 1.0 / rank as f64).collect()
    }
}

impl SelectionStrategy for RankBasedSelection {
    fn select(
        &self,
        population: &[Chromosome],
        num_to_select: usize,
        rng: Option<&mut RandomNumberGenerator>,
    ) -> Result<Vec<Chromosome>> {
        let fitness = fitness_scores(population)?;

        if num_to_select > population.len() {
            return Err(GeneticError::Selection(format!(
                "Cannot draw {} chromosomes without replacement from a population of {}",
                num_to_select,
                population.len()
            )));
        }

        let rng = rng.ok_or_else(|| {
            GeneticError::Selection(
                "Rank-based selection requires a random number generator".to_string(),
            )
        })?;

        // Pool of population indices, kept sorted from fittest to weakest.
        let mut pool = descending_order(&fitness);
        let mut selected = Vec::with_capacity(num_to_select);

        while selected.len() < num_to_select {
            let rank = rng.weighted_index(&Self::rank_weights(pool.len()))?;
            let idx = pool.remove(rank);
            selected.push(population[idx].clone());
        }

        Ok(selected)
    }
}
