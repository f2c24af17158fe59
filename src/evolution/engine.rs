use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use super::{
    challenge::Challenge,
    csv_log::CsvLog,
    history::{FitnessHistory, GenerationStats},
    options::{ElitismPolicy, EvolutionOptions, Execution, LogLevel},
};
use crate::{
    chromosome::Chromosome,
    error::{GeneticError, OptionExt, Result},
    rng::RandomNumberGenerator,
    selection::{ElitistSelection, RankBasedSelection, SelectionStrategy},
    space::SearchSpace,
};

/// Represents the result of a search: the fittest chromosome of the final
/// generation and its fitness.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub chromosome: Chromosome,
    pub fitness: f64,
}

/// Evolves a population of chromosomes against a challenge.
///
/// Every generation the engine keeps a copy of its elites, ranks the whole
/// population into a mating order, breeds one pair of children per
/// consecutive pair of parents, mutates the children, adds the elites back
/// and re-evaluates everyone.
///
/// # Example
///
/// ```rust
/// use hyperga::chromosome::Chromosome;
/// use hyperga::error::Result;
/// use hyperga::evolution::{EvolutionEngine, EvolutionOptions, Evaluation, LogLevel};
/// use hyperga::rng::RandomNumberGenerator;
/// use hyperga::space::{Limit, SearchSpace};
///
/// # fn main() -> Result<()> {
/// let space = SearchSpace::new().with("x", Limit::continuous(-5.0, 5.0)?);
/// let challenge = |chromosome: &Chromosome| -> Result<Evaluation> {
///     let x = chromosome.value("x").and_then(|v| v.as_f64()).unwrap_or_default();
///     Ok(Evaluation::new(-(x - 1.0).powi(2)))
/// };
/// let options = EvolutionOptions::builder()
///     .population_size(8)
///     .num_generations(5)
///     .log_level(LogLevel::None)
///     .build();
///
/// let mut engine =
///     EvolutionEngine::new(space, challenge, options, RandomNumberGenerator::from_seed(3))?;
/// let result = engine.run()?;
///
/// assert_eq!(engine.history().len(), 6);
/// assert!(result.fitness <= 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EvolutionEngine<Chall>
where
    Chall: Challenge,
{
    space: Arc<SearchSpace>,
    challenge: Chall,
    options: EvolutionOptions,
    rng: RandomNumberGenerator,
    selection: RankBasedSelection,
    elitist: ElitistSelection,
    population: Vec<Chromosome>,
    history: FitnessHistory,
    log: Option<CsvLog>,
}

impl<Chall> EvolutionEngine<Chall>
where
    Chall: Challenge,
{
    /// Creates an engine and samples its initial population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the options or the search
    /// space are invalid. Nothing is sampled in that case.
    pub fn new(
        space: SearchSpace,
        challenge: Chall,
        options: EvolutionOptions,
        mut rng: RandomNumberGenerator,
    ) -> Result<Self> {
        options.validate()?;
        space.validate()?;

        let space = Arc::new(space);
        let log = options
            .get_log_file()
            .map(|config| CsvLog::new(config, options.get_report_metric(), &space));
        let population = (0..options.get_population_size())
            .map(|_| Chromosome::random(Arc::clone(&space), &mut rng))
            .collect();

        Ok(Self {
            space,
            challenge,
            options,
            rng,
            selection: RankBasedSelection::new(),
            elitist: ElitistSelection::new(),
            population,
            history: FitnessHistory::new(),
            log,
        })
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    /// Path of the CSV log, if one is configured.
    pub fn log_path(&self) -> Option<&std::path::Path> {
        self.log.as_ref().map(CsvLog::path)
    }

    /// Runs the search: evaluates the initial population, then evolves it
    /// for the configured number of generations.
    ///
    /// Statistics are recorded for generation 0 and after every generation,
    /// so the history ends up with `num_generations + 1` entries.
    ///
    /// Running again continues from the current population with a fresh
    /// history and, when logging to CSV, a new log file.
    ///
    /// # Errors
    ///
    /// The first failing fitness evaluation (or a non-finite fitness) aborts
    /// the run and is returned as is, as are failures to write the CSV log.
    pub fn run(&mut self) -> Result<EvolutionResult> {
        if *self.options.get_log_level() != LogLevel::None {
            info!(
                population_size = self.options.get_population_size(),
                generations = self.options.get_num_generations(),
                genes = self.space.len(),
                "Starting genetic algorithm"
            );
        }

        self.history = FitnessHistory::new();
        if let Some(log) = self.log.as_mut() {
            log.restart();
        }

        self.evaluate_population()?;
        self.record_generation(0)?;

        for generation in 0..self.options.get_num_generations() {
            self.population = self.breed_next_generation()?;
            self.evaluate_population()?;
            self.record_generation(generation + 1)?;
        }

        let fittest = self.fittest()?.clone();
        let fitness = fittest.fitness()?;
        if *self.options.get_log_level() != LogLevel::None {
            info!(
                fitness,
                values = ?fittest.values(),
                "Fittest chromosome of the final generation"
            );
        }

        Ok(EvolutionResult {
            chromosome: fittest,
            fitness,
        })
    }

    /// Scores every chromosome of the current population.
    pub fn evaluate_population(&mut self) -> Result<()> {
        let challenge = &self.challenge;
        let trace = *self.options.get_log_level() != LogLevel::None;
        match self.options.get_execution() {
            Execution::Sequential => self
                .population
                .iter_mut()
                .try_for_each(|chromosome| evaluate(challenge, chromosome, trace)),
            Execution::Parallel => self
                .population
                .par_iter_mut()
                .try_for_each(|chromosome| evaluate(challenge, chromosome, trace)),
        }
    }

    /// Copies of the `elitism` fittest chromosomes, fittest first.
    ///
    /// Ties keep population order. If `elitism` exceeds the population, the
    /// whole population is returned, sorted.
    pub fn elite(&self) -> Result<Vec<Chromosome>> {
        self.elitist
            .select(&self.population, self.options.get_elitism(), None)
    }

    /// The fittest chromosome; the first one on ties.
    pub fn fittest(&self) -> Result<&Chromosome> {
        fittest_index(&self.population).map(|idx| &self.population[idx])
    }

    /// Best, average and worst fitness of the current population, tagged with
    /// the most recently recorded generation.
    pub fn generation_stats(&self) -> Result<GenerationStats> {
        GenerationStats::from_population(
            self.history.len().saturating_sub(1),
            &self.population,
        )
    }

    /// Human readable ranking: the fitness of every chromosome in population
    /// order, followed by the best, worst and average fitness.
    pub fn fitness_report(&self) -> Result<String> {
        let stats = self.generation_stats()?;
        let best = fittest_index(&self.population)?;
        let worst = weakest_index(&self.population)?;

        let mut lines = self
            .population
            .iter()
            .enumerate()
            .map(|(index, chromosome)| Ok(format!("{}. {}", index + 1, chromosome.fitness()?)))
            .collect::<Result<Vec<String>>>()?;
        lines.push(String::new());
        lines.push(format!(
            "Best fitness is chromosome #{} at {}",
            best + 1,
            stats.best
        ));
        lines.push(format!(
            "Worst fitness is chromosome #{} at {}",
            worst + 1,
            stats.worst
        ));
        lines.push(format!("Average fitness is {}", stats.average));

        let mut report = lines.join("\n");
        report.push('\n');
        Ok(report)
    }

    fn breed_next_generation(&mut self) -> Result<Vec<Chromosome>> {
        let population_size = self.options.get_population_size();
        let elite = self.elite()?;
        let parents = self.selection.select(
            &self.population,
            population_size,
            Some(&mut self.rng),
        )?;

        let mut next = Vec::with_capacity(population_size + elite.len());
        for pair in parents.chunks_exact(2) {
            let (mut first, mut second) =
                pair[0].crossover(&pair[1], self.options.get_crossover_rate(), &mut self.rng);
            first.mutate(self.options.get_mutation_rate(), &mut self.rng);
            second.mutate(self.options.get_mutation_rate(), &mut self.rng);
            next.push(first);
            next.push(second);
        }

        if self.options.get_elitism_policy() == ElitismPolicy::Replace {
            next.truncate(population_size.saturating_sub(elite.len()));
        }
        next.extend(elite);

        Ok(next)
    }

    fn record_generation(&mut self, generation: usize) -> Result<()> {
        let stats = GenerationStats::from_population(generation, &self.population)?;
        self.history.push(&stats);

        match self.options.get_log_level() {
            LogLevel::Verbose => {
                info!(
                    generation,
                    best = stats.best,
                    average = stats.average,
                    worst = stats.worst,
                    "Generation evaluated"
                );
                let report = self.fitness_report()?;
                info!("Generation {} fitnesses:\n{}", generation, report);
            }
            LogLevel::Minimal => info!(
                generation,
                best = stats.best,
                average = stats.average,
                worst = stats.worst,
                "Generation evaluated"
            ),
            LogLevel::None => {}
        }

        if let Some(log) = self.log.as_mut() {
            let best = &self.population[fittest_index(&self.population)?];
            log.append(generation, best)?;
        }

        Ok(())
    }
}

fn evaluate<Chall: Challenge>(
    challenge: &Chall,
    chromosome: &mut Chromosome,
    trace: bool,
) -> Result<()> {
    let evaluation = challenge.score(chromosome)?;

    if !evaluation.fitness.is_finite() {
        return Err(GeneticError::FitnessCalculation(format!(
            "Non-finite fitness score encountered: {}",
            evaluation.fitness
        )));
    }

    if trace {
        debug!(
            fitness = evaluation.fitness,
            values = ?chromosome.values(),
            "Chromosome evaluated"
        );
    }
    chromosome.set_evaluation(evaluation);
    Ok(())
}

/// Index of the fittest chromosome, first occurrence on ties.
fn fittest_index(population: &[Chromosome]) -> Result<usize> {
    extreme_index(population, |candidate, incumbent| candidate > incumbent)
}

/// Index of the weakest chromosome, first occurrence on ties.
fn weakest_index(population: &[Chromosome]) -> Result<usize> {
    extreme_index(population, |candidate, incumbent| candidate < incumbent)
}

fn extreme_index(
    population: &[Chromosome],
    replaces: impl Fn(f64, f64) -> bool,
) -> Result<usize> {
    let mut extreme: Option<(usize, f64)> = None;
    for (index, chromosome) in population.iter().enumerate() {
        let fitness = chromosome.fitness()?;
        match extreme {
            Some((_, incumbent)) if !replaces(fitness, incumbent) => {}
            _ => extreme = Some((index, fitness)),
        }
    }
    extreme
        .map(|(index, _)| index)
        .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
}
