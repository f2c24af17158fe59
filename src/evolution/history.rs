use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};

/// Fitness summary of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub best: f64,
    pub average: f64,
    pub worst: f64,
}

impl GenerationStats {
    /// Summarizes an evaluated population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` for an empty population and
    /// `GeneticError::Unevaluated` if any chromosome lacks a fitness.
    pub fn from_population(generation: usize, population: &[Chromosome]) -> Result<Self> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut best = f64::NEG_INFINITY;
        let mut worst = f64::INFINITY;
        let mut sum = 0.0;
        for chromosome in population {
            let fitness = chromosome.fitness()?;
            best = best.max(fitness);
            worst = worst.min(fitness);
            sum += fitness;
        }

        // Summation error can push the mean just outside [worst, best].
        let average = (sum / population.len() as f64).clamp(worst, best);

        Ok(Self {
            generation,
            best,
            average,
            worst,
        })
    }
}

/// Best, average and worst fitness of every generation so far, generation 0 first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessHistory {
    best: Vec<f64>,
    average: Vec<f64>,
    worst: Vec<f64>,
}

impl FitnessHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, stats: &GenerationStats) {
        self.best.push(stats.best);
        self.average.push(stats.average);
        self.worst.push(stats.worst);
    }

    pub fn best(&self) -> &[f64] {
        &self.best
    }

    pub fn average(&self) -> &[f64] {
        &self.average
    }

    pub fn worst(&self) -> &[f64] {
        &self.worst
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    pub fn generation(&self, generation: usize) -> Option<GenerationStats> {
        Some(GenerationStats {
            generation,
            best: *self.best.get(generation)?,
            average: *self.average.get(generation)?,
            worst: *self.worst.get(generation)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = GenerationStats> + '_ {
        (0..self.len()).filter_map(move |generation| self.generation(generation))
    }
}
