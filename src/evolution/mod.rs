pub mod builder;
pub mod challenge;
pub mod csv_log;
pub mod engine;
pub mod history;
pub mod options;

pub use builder::EvolutionEngineBuilder;
pub use challenge::{Challenge, Evaluation, Metrics, ReportMetric};
pub use engine::{EvolutionEngine, EvolutionResult};
pub use history::{FitnessHistory, GenerationStats};
pub use options::{ElitismPolicy, EvolutionOptions, Execution, LogFile, LogLevel};
