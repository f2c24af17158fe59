use crate::{
    error::{GeneticError, Result},
    rng::RandomNumberGenerator,
    space::SearchSpace,
};

use super::{Challenge, EvolutionEngine, EvolutionOptions};

/// Fluent construction of an [`EvolutionEngine`].
///
/// The search space and the challenge are required. Options default to
/// [`EvolutionOptions::default`] and the random number generator to one
/// seeded from system entropy.
pub struct EvolutionEngineBuilder<Chall>
where
    Chall: Challenge,
{
    search_space: Option<SearchSpace>,
    challenge: Option<Chall>,
    options: Option<EvolutionOptions>,
    rng: Option<RandomNumberGenerator>,
}

impl<Chall> EvolutionEngineBuilder<Chall>
where
    Chall: Challenge,
{
    pub fn new() -> Self {
        Self {
            search_space: None,
            challenge: None,
            options: None,
            rng: None,
        }
    }

    pub fn with_search_space(mut self, search_space: SearchSpace) -> Self {
        self.search_space = Some(search_space);
        self
    }

    pub fn with_challenge(mut self, challenge: Chall) -> Self {
        self.challenge = Some(challenge);
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Seeds the random number generator for a reproducible run.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(RandomNumberGenerator::from_seed(seed))
    }

    pub fn build(self) -> Result<EvolutionEngine<Chall>> {
        let search_space = self.search_space.ok_or_else(|| {
            GeneticError::Configuration("Search space not specified".to_string())
        })?;

        let challenge = self
            .challenge
            .ok_or_else(|| GeneticError::Configuration("Challenge not specified".to_string()))?;

        EvolutionEngine::new(
            search_space,
            challenge,
            self.options.unwrap_or_default(),
            self.rng.unwrap_or_default(),
        )
    }
}

impl<Chall> Default for EvolutionEngineBuilder<Chall>
where
    Chall: Challenge,
{
    fn default() -> Self {
        Self::new()
    }
}
