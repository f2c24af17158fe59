//! # Challenge
//!
//! A `Challenge` is the fitness function of a search. It scores one chromosome
//! at a time and may report side metrics (accuracy, mean absolute error) next
//! to the fitness. Higher fitness is better.
//!
//! Any `Fn(&Chromosome) -> Result<Evaluation>` closure is a challenge:
//!
//! ```rust
//! use hyperga::chromosome::Chromosome;
//! use hyperga::error::Result;
//! use hyperga::evolution::{Challenge, Evaluation};
//!
//! let challenge = |chromosome: &Chromosome| -> Result<Evaluation> {
//!     let dropout = chromosome.value("dropout").and_then(|v| v.as_f64()).unwrap_or(0.0);
//!     Ok(Evaluation::new(-dropout).with_accuracy(1.0 - dropout))
//! };
//!
//! fn assert_challenge<C: Challenge>(_: &C) {}
//! assert_challenge(&challenge);
//! ```

use crate::{chromosome::Chromosome, error::Result};

pub trait Challenge: Send + Sync {
    /// Scores a chromosome. Errors abort the whole run.
    fn score(&self, chromosome: &Chromosome) -> Result<Evaluation>;
}

impl<F> Challenge for F
where
    F: Fn(&Chromosome) -> Result<Evaluation> + Send + Sync,
{
    fn score(&self, chromosome: &Chromosome) -> Result<Evaluation> {
        self(chromosome)
    }
}

/// The outcome of scoring one chromosome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub fitness: f64,
    pub metrics: Metrics,
}

impl Evaluation {
    pub fn new(fitness: f64) -> Self {
        Self {
            fitness,
            metrics: Metrics::default(),
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.metrics.accuracy = Some(accuracy);
        self
    }

    pub fn with_mae(mut self, mae: f64) -> Self {
        self.metrics.mae = Some(mae);
        self
    }
}

impl From<f64> for Evaluation {
    fn from(fitness: f64) -> Self {
        Self::new(fitness)
    }
}

/// Side metrics produced next to the fitness. They are reported, never selected on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub accuracy: Option<f64>,
    pub mae: Option<f64>,
}

impl Metrics {
    pub fn get(&self, metric: ReportMetric) -> Option<f64> {
        match metric {
            ReportMetric::Accuracy => self.accuracy,
            ReportMetric::Mae => self.mae,
        }
    }
}

/// Which side metric the generation log reports.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMetric {
    /// Classification runs.
    #[default]
    Accuracy,
    /// Regression runs (mean absolute error).
    Mae,
}

impl ReportMetric {
    /// Column header used in the generation log.
    pub fn label(&self) -> &'static str {
        match self {
            ReportMetric::Accuracy => "Accuracy",
            ReportMetric::Mae => "MAE",
        }
    }
}
