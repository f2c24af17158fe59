//! # Chromosome
//!
//! A `Chromosome` is one point of the search space: a value for every gene,
//! plus the fitness and side metrics of its latest evaluation.
//!
//! Chromosomes compare purely by fitness. Before evaluation they are not
//! comparable at all: `partial_cmp` returns `None` and `==` is `false`, and
//! [`Chromosome::fitness`] reports `GeneticError::Unevaluated`.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hyperga::chromosome::Chromosome;
//! use hyperga::rng::RandomNumberGenerator;
//! use hyperga::space::{Limit, SearchSpace};
//!
//! # fn main() -> hyperga::error::Result<()> {
//! let space = Arc::new(
//!     SearchSpace::new()
//!         .with("learning_rate", Limit::continuous(1e-4, 1e-1)?)
//!         .with("neurons", Limit::discrete(16, 256, 16)?),
//! );
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! let mother = Chromosome::random(Arc::clone(&space), &mut rng);
//! let father = Chromosome::random(Arc::clone(&space), &mut rng);
//!
//! let (mut first, second) = mother.crossover(&father, 0.9, &mut rng);
//! first.mutate(0.2, &mut rng);
//!
//! assert!(!first.is_evaluated());
//! assert!(first.fitness().is_err());
//! assert_eq!(second.values().len(), 2);
//! # Ok(())
//! # }
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::evolution::challenge::{Evaluation, Metrics};
use crate::rng::RandomNumberGenerator;
use crate::space::{GeneValue, SearchSpace};

#[derive(Debug, Clone)]
pub struct Chromosome {
    space: Arc<SearchSpace>,
    values: BTreeMap<String, GeneValue>,
    fitness: Option<f64>,
    metrics: Metrics,
}

impl Chromosome {
    /// Creates a chromosome with every gene drawn independently from its limit.
    pub fn random(space: Arc<SearchSpace>, rng: &mut RandomNumberGenerator) -> Self {
        let values = space.sample(rng);
        Self {
            space,
            values,
            fitness: None,
            metrics: Metrics::default(),
        }
    }

    /// Creates a chromosome from explicit gene values.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the gene names differ from the
    /// search space, or `GeneticError::OutOfBounds` if a value lies outside its limit.
    pub fn with_values(
        space: Arc<SearchSpace>,
        values: BTreeMap<String, GeneValue>,
    ) -> Result<Self> {
        if values.len() != space.len() || !space.names().all(|name| values.contains_key(name)) {
            let expected: Vec<&str> = space.names().collect();
            let found: Vec<&str> = values.keys().map(String::as_str).collect();
            return Err(GeneticError::Configuration(format!(
                "Chromosome genes {:?} do not match search space genes {:?}",
                found, expected
            )));
        }

        for (name, limit) in space.iter() {
            let value = &values[name];
            if !limit.contains(value) {
                return Err(GeneticError::OutOfBounds(format!(
                    "gene '{}' = {} is not within {:?}",
                    name, value, limit
                )));
            }
        }

        Ok(Self {
            space,
            values,
            fitness: None,
            metrics: Metrics::default(),
        })
    }

    pub fn values(&self) -> &BTreeMap<String, GeneValue> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&GeneValue> {
        self.values.get(name)
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    /// Returns the fitness of the latest evaluation.
    pub fn fitness(&self) -> Result<f64> {
        self.fitness.ok_or(GeneticError::Unevaluated)
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub(crate) fn set_evaluation(&mut self, evaluation: Evaluation) {
        self.fitness = Some(evaluation.fitness);
        self.metrics = evaluation.metrics;
    }

    /// A copy of the genes with no evaluation attached.
    fn offspring(&self) -> Self {
        Self {
            space: Arc::clone(&self.space),
            values: self.values.clone(),
            fitness: None,
            metrics: Metrics::default(),
        }
    }

    /// Produces two children from `self` and `other`.
    ///
    /// With probability `rate` the children recombine uniformly: every gene is
    /// swapped between them with probability one half. Otherwise they are plain
    /// copies of the parents. Either way the children start unevaluated and the
    /// parents are left untouched. Genes only move between parents, so every
    /// value stays within its limit.
    pub fn crossover(
        &self,
        other: &Self,
        rate: f64,
        rng: &mut RandomNumberGenerator,
    ) -> (Self, Self) {
        let mut first = self.offspring();
        let mut second = other.offspring();

        if rng.chance(rate) {
            for (name, value) in first.values.iter_mut() {
                if let Some(theirs) = second.values.get_mut(name) {
                    if rng.chance(0.5) {
                        std::mem::swap(value, theirs);
                    }
                }
            }
        }

        (first, second)
    }

    /// Replaces each gene, with probability `rate`, by a fresh draw from its limit.
    ///
    /// The cached fitness is left as is; the caller re-evaluates.
    pub fn mutate(&mut self, rate: f64, rng: &mut RandomNumberGenerator) {
        for (name, limit) in self.space.iter() {
            if rng.chance(rate) {
                self.values.insert(name.to_string(), limit.sample(rng));
            }
        }
    }
}

impl PartialEq for Chromosome {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.fitness, other.fitness), (Some(a), Some(b)) if a == b)
    }
}

impl PartialOrd for Chromosome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.fitness, other.fitness) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        }
    }
}
