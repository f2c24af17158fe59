pub mod chromosome;
pub mod error;
pub mod evolution;
pub mod rng;
pub mod selection;
pub mod space;

// Re-export commonly used types for convenience
pub use chromosome::Chromosome;
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{
    Challenge, Evaluation, EvolutionEngine, EvolutionEngineBuilder, EvolutionOptions,
    EvolutionResult,
};
pub use space::{GeneValue, Limit, SearchSpace};
