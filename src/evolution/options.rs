//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the configuration of a search: population
//! size, crossover and mutation rates, number of generations, elitism, how
//! fitness evaluation is executed and how progress is reported.
//!
//! ## Example
//!
//! ```rust
//! use hyperga::evolution::options::{ElitismPolicy, EvolutionOptions, Execution, LogLevel};
//!
//! let options = EvolutionOptions::builder()
//!     .population_size(20)
//!     .num_generations(50)
//!     .mutation_rate(0.1)
//!     .crossover_rate(0.8)
//!     .elitism(2)
//!     .elitism_policy(ElitismPolicy::Replace)
//!     .execution(Execution::Parallel)
//!     .log_level(LogLevel::Verbose)
//!     .build();
//!
//! assert!(options.validate().is_ok());
//!
//! // Odd population sizes cannot be paired up for mating.
//! let odd = EvolutionOptions::builder().population_size(5).build();
//! assert!(odd.validate().is_err());
//! ```
//!
//! ## Defaults
//!
//! | option | default |
//! |---|---|
//! | `population_size` | 10 |
//! | `mutation_rate` | 0.2 |
//! | `crossover_rate` | 0.9 |
//! | `num_generations` | 20 |
//! | `elitism` | 2 |
//! | `elitism_policy` | `Augment` |
//! | `execution` | `Sequential` |
//! | `report_metric` | `Accuracy` |
//! | `log_level` | `Minimal` |
//! | `log_file` | none |

use std::path::PathBuf;

use super::challenge::ReportMetric;
use crate::error::{GeneticError, Result};

const DEFAULT_POPULATION_SIZE: usize = 10;
const DEFAULT_MUTATION_RATE: f64 = 0.2;
const DEFAULT_CROSSOVER_RATE: f64 = 0.9;
const DEFAULT_NUM_GENERATIONS: usize = 20;
const DEFAULT_ELITISM: usize = 2;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Per-generation summary plus the full fitness ranking.
    Verbose,
    /// Per-generation summary.
    #[default]
    Minimal,
    None,
}

/// How elites enter the next generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ElitismPolicy {
    /// Elites are appended to a full brood of offspring, so every generation
    /// after the first holds `population_size + elitism` chromosomes.
    #[default]
    Augment,
    /// Elites take the place of the last offspring (those bred from the
    /// lowest-ranked mating pairs); the population size never changes.
    Replace,
}

/// How fitness evaluations within a generation are executed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Sequential,
    /// Evaluate chromosomes on the rayon thread pool.
    Parallel,
}

/// Where the per-generation CSV log goes.
///
/// The file is `<directory>/<stem>-<timestamp>.csv`, where `stem` is
/// `base_name` up to its first `.` and the timestamp is taken when the engine
/// is created.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub directory: PathBuf,
    pub base_name: String,
}

impl LogFile {
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    num_generations: usize,
    log_level: LogLevel,
    population_size: usize,
    mutation_rate: f64,
    crossover_rate: f64,
    elitism: usize,
    elitism_policy: ElitismPolicy,
    execution: Execution,
    report_metric: ReportMetric,
    log_file: Option<LogFile>,
}

impl EvolutionOptions {
    pub fn new(
        num_generations: usize,
        population_size: usize,
        mutation_rate: f64,
        crossover_rate: f64,
        elitism: usize,
    ) -> Self {
        Self {
            num_generations,
            population_size,
            mutation_rate,
            crossover_rate,
            elitism,
            ..Self::default()
        }
    }

    /// Checks every option, so that a bad configuration fails before any
    /// chromosome is created.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if:
    /// - `population_size` is odd or below 2
    /// - a rate is not a finite number in `[0, 1]`
    /// - `elitism` exceeds `population_size`
    /// - the log file has an empty base name
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 || self.population_size % 2 != 0 {
            return Err(GeneticError::Configuration(format!(
                "Population size must be an even number of at least 2, got {}",
                self.population_size
            )));
        }

        for (name, rate) in [
            ("Mutation rate", self.mutation_rate),
            ("Crossover rate", self.crossover_rate),
        ] {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(GeneticError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }

        if self.elitism > self.population_size {
            return Err(GeneticError::Configuration(format!(
                "Elitism ({}) cannot exceed population size ({})",
                self.elitism, self.population_size
            )));
        }

        if let Some(log_file) = &self.log_file {
            if log_file.base_name.trim().is_empty() {
                return Err(GeneticError::Configuration(
                    "Log file base name cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_log_level(&self) -> &LogLevel {
        &self.log_level
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn get_elitism(&self) -> usize {
        self.elitism
    }

    pub fn get_elitism_policy(&self) -> ElitismPolicy {
        self.elitism_policy
    }

    pub fn get_execution(&self) -> Execution {
        self.execution
    }

    pub fn get_report_metric(&self) -> ReportMetric {
        self.report_metric
    }

    pub fn get_log_file(&self) -> Option<&LogFile> {
        self.log_file.as_ref()
    }

    /// Sets the number of generations.
    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    /// Sets the log level.
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Sets the population size.
    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_mutation_rate(&mut self, mutation_rate: f64) {
        self.mutation_rate = mutation_rate;
    }

    pub fn set_crossover_rate(&mut self, crossover_rate: f64) {
        self.crossover_rate = crossover_rate;
    }

    pub fn set_elitism(&mut self, elitism: usize) {
        self.elitism = elitism;
    }

    pub fn set_elitism_policy(&mut self, elitism_policy: ElitismPolicy) {
        self.elitism_policy = elitism_policy;
    }

    pub fn set_execution(&mut self, execution: Execution) {
        self.execution = execution;
    }

    pub fn set_report_metric(&mut self, report_metric: ReportMetric) {
        self.report_metric = report_metric;
    }

    pub fn set_log_file(&mut self, log_file: Option<LogFile>) {
        self.log_file = log_file;
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// This provides a more flexible way to configure evolution options
    /// with a fluent interface. Unset options keep their defaults.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            num_generations: DEFAULT_NUM_GENERATIONS,
            log_level: LogLevel::default(),
            population_size: DEFAULT_POPULATION_SIZE,
            mutation_rate: DEFAULT_MUTATION_RATE,
            crossover_rate: DEFAULT_CROSSOVER_RATE,
            elitism: DEFAULT_ELITISM,
            elitism_policy: ElitismPolicy::default(),
            execution: Execution::default(),
            report_metric: ReportMetric::default(),
            log_file: None,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
/// `build` does not validate; the engine does when it is created.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_generations: Option<usize>,
    log_level: Option<LogLevel>,
    population_size: Option<usize>,
    mutation_rate: Option<f64>,
    crossover_rate: Option<f64>,
    elitism: Option<usize>,
    elitism_policy: Option<ElitismPolicy>,
    execution: Option<Execution>,
    report_metric: Option<ReportMetric>,
    log_file: Option<LogFile>,
}

impl EvolutionOptionsBuilder {
    /// Sets the number of generations.
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn crossover_rate(mut self, value: f64) -> Self {
        self.crossover_rate = Some(value);
        self
    }

    /// Sets the number of elites carried into each next generation.
    pub fn elitism(mut self, value: usize) -> Self {
        self.elitism = Some(value);
        self
    }

    pub fn elitism_policy(mut self, value: ElitismPolicy) -> Self {
        self.elitism_policy = Some(value);
        self
    }

    pub fn execution(mut self, value: Execution) -> Self {
        self.execution = Some(value);
        self
    }

    pub fn report_metric(mut self, value: ReportMetric) -> Self {
        self.report_metric = Some(value);
        self
    }

    /// Enables the per-generation CSV log.
    pub fn log_file(mut self, value: LogFile) -> Self {
        self.log_file = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();
        EvolutionOptions {
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            mutation_rate: self.mutation_rate.unwrap_or(defaults.mutation_rate),
            crossover_rate: self.crossover_rate.unwrap_or(defaults.crossover_rate),
            elitism: self.elitism.unwrap_or(defaults.elitism),
            elitism_policy: self.elitism_policy.unwrap_or(defaults.elitism_policy),
            execution: self.execution.unwrap_or(defaults.execution),
            report_metric: self.report_metric.unwrap_or(defaults.report_metric),
            log_file: self.log_file,
        }
    }
}
