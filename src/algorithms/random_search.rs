//! Random search
//!
//! A hill climber whose every step draws a completely new solution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hill_climber::{HillClimber, HillClimberConfig};
use super::{Objective, SearchResult};
use crate::bindings::Rnd;
use crate::error::TraceResult;
use crate::operators::{MutationKind, Operators};
use crate::termination::TerminationCriterion;

/// Configuration for random search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSearchConfig {
    /// Number of solutions drawn after the first
    pub generations: usize,
    /// Direction of the search
    pub objective: Objective,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            objective: Objective::Maximize,
        }
    }
}

/// Random search over the generator's output space
pub struct RandomSearch {
    inner: HillClimber,
}

impl RandomSearch {
    /// Create a random search with the given configuration
    pub fn new(config: RandomSearchConfig) -> Self {
        let climber = HillClimberConfig::default()
            .generations(config.generations)
            .mutation(MutationKind::Random)
            .objective(config.objective);
        Self {
            inner: HillClimber::new(climber),
        }
    }

    /// Stop early when `criterion` triggers
    pub fn with_termination(mut self, criterion: impl TerminationCriterion + 'static) -> Self {
        self.inner = self.inner.with_termination(criterion);
        self
    }

    /// Run the search
    pub fn run<P, G, F, R>(&self, ops: &mut Operators<P, G, F>, rng: &mut R) -> TraceResult<SearchResult<P>>
    where
        G: Fn(&mut Rnd<'_>) -> P,
        F: Fn(&P) -> f64,
        R: Rng,
    {
        self.inner.run(ops, rng)
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new(RandomSearchConfig::default())
    }
}
