//! # Search Space
//!
//! A `SearchSpace` declares every gene a chromosome carries and the `Limit`
//! its value must stay within. Limits come in three shapes: a continuous
//! range, a stepped integer range, and a finite set of named choices.
//!
//! ## Example
//!
//! ```rust
//! use hyperga::space::{Limit, SearchSpace};
//! use hyperga::rng::RandomNumberGenerator;
//!
//! # fn main() -> hyperga::error::Result<()> {
//! let space = SearchSpace::new()
//!     .with("hidden_layers", Limit::discrete(1, 6, 1)?)
//!     .with("batch_size", Limit::discrete(32, 2048, 32)?)
//!     .with("dropout", Limit::continuous(0.0, 0.5)?)
//!     .with("optimizer", Limit::categorical(["adam", "sgd", "rmsprop"])?);
//!
//! let mut rng = RandomNumberGenerator::from_seed(11);
//! let values = space.sample(&mut rng);
//!
//! assert_eq!(values.len(), 4);
//! for (name, value) in &values {
//!     assert!(space.get(name).unwrap().contains(value));
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// The value of a single gene.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum GeneValue {
    Float(f64),
    Int(i64),
    Choice(String),
}

impl GeneValue {
    /// Numeric view of the value; integers are widened, choices have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneValue::Float(value) => Some(*value),
            GeneValue::Int(value) => Some(*value as f64),
            GeneValue::Choice(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneValue::Choice(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for GeneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneValue::Float(value) => write!(f, "{}", value),
            GeneValue::Int(value) => write!(f, "{}", value),
            GeneValue::Choice(value) => f.write_str(value),
        }
    }
}

/// The declared bound of a single gene.
///
/// Prefer the validating constructors; limits built from the variants directly
/// are checked when the search space is handed to an engine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Limit {
    /// Any `f64` in `[low, high]`.
    Continuous { low: f64, high: f64 },
    /// The integers `low, low + step, ...` not exceeding `high`.
    Discrete { low: i64, high: i64, step: i64 },
    /// One of a finite set of named choices.
    Categorical(Vec<String>),
}

impl Limit {
    /// Creates a continuous limit over `[low, high]`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if a bound is not finite or `low > high`.
    pub fn continuous(low: f64, high: f64) -> Result<Self> {
        let limit = Limit::Continuous { low, high };
        limit.validate()?;
        Ok(limit)
    }

    /// Creates a stepped integer limit.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `step` is not positive or `low > high`.
    pub fn discrete(low: i64, high: i64, step: i64) -> Result<Self> {
        let limit = Limit::Discrete { low, high, step };
        limit.validate()?;
        Ok(limit)
    }

    /// Creates a categorical limit from a non-empty set of choices.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if there are no choices.
    pub fn categorical<I, S>(choices: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let limit = Limit::Categorical(choices.into_iter().map(Into::into).collect());
        limit.validate()?;
        Ok(limit)
    }

    /// Checks that the limit describes at least one valid value.
    pub fn validate(&self) -> Result<()> {
        match self {
            Limit::Continuous { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(GeneticError::Configuration(format!(
                        "Continuous limit bounds must be finite, got [{}, {}]",
                        low, high
                    )));
                }
                if low > high {
                    return Err(GeneticError::Configuration(format!(
                        "Continuous limit has low {} above high {}",
                        low, high
                    )));
                }
                if !(high - low).is_finite() {
                    return Err(GeneticError::Configuration(format!(
                        "Continuous limit [{}, {}] is wider than an f64 can represent",
                        low, high
                    )));
                }
            }
            Limit::Discrete { low, high, step } => {
                if *step <= 0 {
                    return Err(GeneticError::Configuration(format!(
                        "Discrete limit step must be positive, got {}",
                        step
                    )));
                }
                if low > high {
                    return Err(GeneticError::Configuration(format!(
                        "Discrete limit has low {} above high {}",
                        low, high
                    )));
                }
            }
            Limit::Categorical(choices) => {
                if choices.is_empty() {
                    return Err(GeneticError::Configuration(
                        "Categorical limit needs at least one choice".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Draws a fresh value uniformly from the limit.
    pub fn sample(&self, rng: &mut RandomNumberGenerator) -> GeneValue {
        match self {
            Limit::Continuous { low, high } => GeneValue::Float(rng.gen_range(*low..=*high)),
            Limit::Discrete { low, high, step } => {
                let steps = high.abs_diff(*low) / step.unsigned_abs();
                let k = rng.gen_range(0..=steps);
                // i128 keeps `low + k * step` exact across the whole i64 range.
                GeneValue::Int((*low as i128 + k as i128 * *step as i128) as i64)
            }
            Limit::Categorical(choices) => {
                GeneValue::Choice(choices[rng.gen_range(0..choices.len())].clone())
            }
        }
    }

    /// Whether `value` is one this limit can produce.
    pub fn contains(&self, value: &GeneValue) -> bool {
        match (self, value) {
            (Limit::Continuous { low, high }, GeneValue::Float(v)) => {
                v.is_finite() && low <= v && v <= high
            }
            (Limit::Discrete { low, high, step }, GeneValue::Int(v)) => {
                low <= v && v <= high && (*v as i128 - *low as i128) % *step as i128 == 0
            }
            (Limit::Categorical(choices), GeneValue::Choice(v)) => choices.contains(v),
            _ => false,
        }
    }
}

/// The named limits of every gene, in a fixed (lexicographic) order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSpace {
    limits: BTreeMap<String, Limit>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the limit of gene `name`.
    pub fn with(mut self, name: impl Into<String>, limit: Limit) -> Self {
        self.insert(name, limit);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, limit: Limit) -> Option<Limit> {
        self.limits.insert(name.into(), limit)
    }

    pub fn get(&self, name: &str) -> Option<&Limit> {
        self.limits.get(name)
    }

    /// Gene names in column order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.limits.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Limit)> {
        self.limits.iter().map(|(name, limit)| (name.as_str(), limit))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Checks that the space declares at least one gene and that every limit is valid.
    pub fn validate(&self) -> Result<()> {
        if self.limits.is_empty() {
            return Err(GeneticError::Configuration(
                "Search space must declare at least one gene".to_string(),
            ));
        }
        for (name, limit) in &self.limits {
            limit.validate().map_err(|e| {
                GeneticError::Configuration(format!("Gene '{}': {}", name, e))
            })?;
        }
        Ok(())
    }

    /// Samples every gene independently.
    pub fn sample(&self, rng: &mut RandomNumberGenerator) -> BTreeMap<String, GeneValue> {
        self.limits
            .iter()
            .map(|(name, limit)| (name.clone(), limit.sample(rng)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Limit)> for SearchSpace {
    fn from_iter<I: IntoIterator<Item = (S, Limit)>>(iter: I) -> Self {
        Self {
            limits: iter
                .into_iter()
                .map(|(name, limit)| (name.into(), limit))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_limit_wider_than_f64_is_rejected() {
        match Limit::continuous(-f64::MAX, f64::MAX) {
            Err(GeneticError::Configuration(msg)) => assert!(msg.contains("wider")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
        assert!(Limit::continuous(-f64::MAX / 2.0, f64::MAX / 2.0).is_ok());

        let unchecked = Limit::Continuous {
            low: f64::MIN,
            high: f64::MAX,
        };
        let space = SearchSpace::new().with("x", unchecked);
        assert!(matches!(
            space.validate(),
            Err(GeneticError::Configuration(_))
        ));
    }

    #[test]
    fn test_continuous_sampling_stays_in_bounds() {
        let limit = Limit::continuous(-2.5, 4.0).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(5);
        for _ in 0..1000 {
            let value = limit.sample(&mut rng);
            assert!(limit.contains(&value), "{} escaped {:?}", value, limit);
        }
    }

    #[test]
    fn test_degenerate_continuous_limit() {
        let limit = Limit::continuous(3.0, 3.0).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(5);
        assert_eq!(limit.sample(&mut rng), GeneValue::Float(3.0));
    }

    #[test]
    fn test_discrete_sampling_respects_step() {
        let limit = Limit::discrete(32, 300, 32).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(9);
        let mut seen_top = false;
        for _ in 0..2000 {
            let value = limit.sample(&mut rng).as_i64().unwrap();
            assert!((32..=300).contains(&value));
            assert_eq!((value - 32) % 32, 0);
            seen_top |= value == 288;
        }
        assert!(seen_top, "largest reachable step was never drawn");
    }

    #[test]
    fn test_discrete_extreme_range() {
        let limit = Limit::discrete(i64::MIN, i64::MAX, 1).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        for _ in 0..100 {
            assert!(limit.contains(&limit.sample(&mut rng)));
        }
    }

    #[test]
    fn test_categorical_sampling() {
        let limit = Limit::categorical(["gru", "lstm"]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(4);
        for _ in 0..100 {
            let value = limit.sample(&mut rng);
            assert!(matches!(value.as_str(), Some("gru") | Some("lstm")));
        }
    }

    #[test]
    fn test_contains_rejects_mismatched_kinds() {
        let continuous = Limit::continuous(0.0, 1.0).unwrap();
        let discrete = Limit::discrete(0, 10, 2).unwrap();
        let categorical = Limit::categorical(["a"]).unwrap();

        assert!(!continuous.contains(&GeneValue::Int(0)));
        assert!(!continuous.contains(&GeneValue::Float(f64::NAN)));
        assert!(!discrete.contains(&GeneValue::Int(3)));
        assert!(!discrete.contains(&GeneValue::Float(2.0)));
        assert!(!categorical.contains(&GeneValue::Choice("b".to_string())));
    }

    #[test]
    fn test_invalid_limits() {
        assert!(Limit::continuous(1.0, 0.0).is_err());
        assert!(Limit::continuous(f64::NEG_INFINITY, 0.0).is_err());
        assert!(Limit::discrete(0, 10, 0).is_err());
        assert!(Limit::discrete(5, 1, 1).is_err());
        assert!(Limit::categorical(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_space_validation() {
        assert!(matches!(
            SearchSpace::new().validate(),
            Err(GeneticError::Configuration(_))
        ));

        let space = SearchSpace::new().with("lr", Limit::Continuous { low: 1.0, high: 0.1 });
        match space.validate() {
            Err(GeneticError::Configuration(msg)) => assert!(msg.contains("Gene 'lr'")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_names_are_ordered() {
        let space: SearchSpace = vec![
            ("neurons", Limit::discrete(8, 128, 8).unwrap()),
            ("dropout", Limit::continuous(0.0, 0.5).unwrap()),
            ("batch_size", Limit::discrete(32, 256, 32).unwrap()),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = space.names().collect();
        assert_eq!(names, vec!["batch_size", "dropout", "neurons"]);
    }
}
