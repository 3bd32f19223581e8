//! Search algorithms
//!
//! Solvers built only on the public [`Operators`](crate::operators::Operators)
//! surface: they create, mutate, recombine and evaluate solutions and never
//! look inside a trace.

pub mod genetic_algorithm;
pub mod hill_climber;
pub mod random_search;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::termination::{MaxGenerations, SearchState, TerminationCriterion};
use crate::trace::Solution;

pub use genetic_algorithm::{GeneticAlgorithm, GeneticAlgorithmConfig};
pub use hill_climber::{HillClimber, HillClimberConfig};
pub use random_search::{RandomSearch, RandomSearchConfig};

/// Direction of the search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Larger fitness is better
    #[default]
    Maximize,
    /// Smaller fitness is better
    Minimize,
}

impl Objective {
    /// Returns true if `a` is strictly better than `b`
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Self::Maximize => a > b,
            Self::Minimize => a < b,
        }
    }

    /// Returns true if `a` is at least as good as `b`
    pub fn is_at_least(self, a: f64, b: f64) -> bool {
        match self {
            Self::Maximize => a >= b,
            Self::Minimize => a <= b,
        }
    }

    /// Ordering that sorts better fitness first; NaN sorts last
    pub fn rank(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                Self::Maximize => b.total_cmp(&a),
                Self::Minimize => a.total_cmp(&b),
            },
        }
    }
}

/// Result of a search run
#[derive(Clone, Debug)]
pub struct SearchResult<P> {
    /// Best solution found
    pub best: Solution<P>,
    /// Fitness of the best solution
    pub fitness: f64,
    /// Number of generations completed
    pub generations: usize,
    /// Total fitness evaluations
    pub evaluations: usize,
    /// Best fitness after each generation, starting with the initial one
    pub history: Vec<f64>,
    /// Why the search stopped
    pub termination_reason: String,
}

/// Reason to stop, if any: the generation budget first, then the extra criterion
pub(crate) fn stop_reason(
    generations: usize,
    extra: Option<&dyn TerminationCriterion>,
    state: &SearchState,
) -> Option<&'static str> {
    let budget = MaxGenerations::new(generations);
    if budget.should_terminate(state) {
        return Some(budget.reason());
    }
    extra.filter(|c| c.should_terminate(state)).map(|c| c.reason())
}

pub mod prelude {
    pub use super::genetic_algorithm::{GeneticAlgorithm, GeneticAlgorithmConfig};
    pub use super::hill_climber::{HillClimber, HillClimberConfig};
    pub use super::random_search::{RandomSearch, RandomSearchConfig};
    pub use super::{Objective, SearchResult};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::TargetFitness;

    #[test]
    fn test_objective_comparisons() {
        assert!(Objective::Maximize.is_better(2.0, 1.0));
        assert!(!Objective::Maximize.is_better(1.0, 1.0));
        assert!(Objective::Maximize.is_at_least(1.0, 1.0));
        assert!(Objective::Minimize.is_better(1.0, 2.0));
        assert!(Objective::Minimize.is_at_least(2.0, 2.0));
        assert!(!Objective::Minimize.is_at_least(3.0, 2.0));
    }

    #[test]
    fn test_rank_sorts_best_first() {
        let mut values = vec![1.0, f64::NAN, 3.0, 2.0];
        values.sort_by(|a, b| Objective::Maximize.rank(*a, *b));
        assert_eq!(&values[..3], &[3.0, 2.0, 1.0]);
        assert!(values[3].is_nan());

        let mut values = vec![1.0, 3.0, 2.0];
        values.sort_by(|a, b| Objective::Minimize.rank(*a, *b));
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_stop_reason() {
        let history = [0.0];
        let state = SearchState {
            generation: 3,
            evaluations: 4,
            best_fitness: 10.0,
            objective: Objective::Maximize,
            fitness_history: &history,
        };
        assert_eq!(stop_reason(3, None, &state), Some("Maximum generations reached"));
        assert_eq!(stop_reason(5, None, &state), None);

        let target = TargetFitness::new(5.0);
        assert_eq!(stop_reason(5, Some(&target as &dyn TerminationCriterion), &state), Some("Target fitness reached"));
    }

    #[test]
    fn test_objective_serde() {
        let json = serde_json::to_string(&Objective::Minimize).unwrap();
        assert_eq!(json, "\"minimize\"");
        let parsed: Objective = serde_json::from_str("\"maximize\"").unwrap();
        assert_eq!(parsed, Objective::Maximize);
    }
}
