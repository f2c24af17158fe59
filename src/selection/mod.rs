pub mod elitist;
pub mod rank;
pub mod selection_strategy;

pub use elitist::ElitistSelection;
pub use rank::RankBasedSelection;
pub use selection_strategy::SelectionStrategy;
