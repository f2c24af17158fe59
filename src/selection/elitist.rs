use crate::chromosome::Chromosome;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{descending_order, fitness_scores, SelectionStrategy};

/// A selection strategy that selects the fittest chromosomes.
///
/// Chromosomes are returned as copies, ordered by fitness descending; ties keep
/// their population order. Asking for more chromosomes than the population
/// holds returns the whole population, sorted. The population itself is never
/// reordered.
///
/// This is how the engine picks the elites carried unchanged into the next
/// generation.
#[derive(Debug, Clone, Default)]
pub struct ElitistSelection;

impl ElitistSelection {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionStrategy for ElitistSelection {
    fn select(
        &self,
        population: &[Chromosome],
        num_to_select: usize,
        _rng: Option<&mut RandomNumberGenerator>,
    ) -> Result<Vec<Chromosome>> {
        let fitness = fitness_scores(population)?;

        Ok(descending_order(&fitness)
            .into_iter()
            .take(num_to_select)
            .map(|idx| population[idx].clone())
            .collect())
    }
}
