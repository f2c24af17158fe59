//! # Error Types
//!
//! This module defines the error type shared by every part of the search:
//! configuration checks, fitness evaluation, selection and the CSV log.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use hyperga::error::{GeneticError, Result};
//!
//! fn validate_rate(rate: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&rate) {
//!         return Err(GeneticError::Configuration(format!("rate {rate} outside [0, 1]")));
//!     }
//!     Ok(rate)
//! }
//!
//! assert!(validate_rate(0.5).is_ok());
//! assert!(validate_rate(1.5).is_err());
//! ```
//!
//! Using the `ResultExt` trait inside a fitness function that calls into
//! code with its own error type:
//!
//! ```rust
//! use hyperga::error::{Result, ResultExt};
//!
//! fn parse_epochs(raw: &str) -> Result<u32> {
//!     raw.parse::<u32>().context("Failed to parse epoch count")
//! }
//!
//! assert_eq!(parse_epochs("12").unwrap(), 12);
//! assert!(parse_epochs("twelve").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use hyperga::error::{GeneticError, OptionExt};
//!
//! fn best_score(scores: &[f64]) -> hyperga::error::Result<f64> {
//!     scores
//!         .iter()
//!         .copied()
//!         .reduce(f64::max)
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_score(&[0.1, 0.7, 0.3]).unwrap(), 0.7);
//! assert!(best_score(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while configuring or running a search.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness calculation fails.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when a chromosome's fitness is read before it was evaluated.
    #[error("Unevaluated chromosome: fitness has not been calculated yet")]
    Unevaluated,

    /// Error that occurs when a selection request cannot be satisfied.
    #[error("Selection error: {0}")]
    Selection(String),

    /// Error that occurs when a random number generation fails.
    #[error("Random generation error: {0}")]
    RandomGeneration(String),

    /// Error that occurs when a gene value is outside of its declared limit.
    #[error("Bounds error: Gene is outside of valid bounds - {0}")]
    OutOfBounds(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for search operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `GeneticError`.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// Fitness functions usually wrap training code with its own error types;
/// `context` turns those into a `GeneticError` so they abort the run through `?`.
pub trait ResultExt<T, E> {
    /// Adds context to an error.
    ///
    /// This method converts the error to a `GeneticError` with the provided context.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Utility function to convert a standard error to a `GeneticError` with context.
///
/// ## Examples
///
/// ```rust
/// use hyperga::error::to_genetic_error;
/// use std::io;
///
/// fn example() -> hyperga::error::Result<()> {
///     let io_error = io::Error::new(io::ErrorKind::NotFound, "dataset missing");
///     Err(to_genetic_error(io_error, "Failed to train model"))
/// }
///
/// assert!(example().is_err());
/// ```
pub fn to_genetic_error<E: StdError>(error: E, context: &str) -> GeneticError {
    GeneticError::Other(format!("{}: {}", context, error))
}
