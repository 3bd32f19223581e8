//! Termination criteria
//!
//! Stop rules consulted by the solvers once per generation, before the next
//! generation is produced. The generation budget of each solver always
//! applies; a criterion passed with `with_termination` can only stop earlier.

use crate::algorithms::Objective;

/// Snapshot of a running search
#[derive(Clone, Debug)]
pub struct SearchState<'a> {
    /// Generations completed so far
    pub generation: usize,
    /// Fitness evaluations so far, including the initial ones
    pub evaluations: usize,
    /// Best fitness found so far
    pub best_fitness: f64,
    /// Direction of the search
    pub objective: Objective,
    /// Best fitness after each generation, starting with the initial one
    pub fitness_history: &'a [f64],
}

/// Termination criterion trait
pub trait TerminationCriterion: Send + Sync {
    /// Returns true once the search should stop
    fn should_terminate(&self, state: &SearchState) -> bool;

    /// Short description reported in the search result
    fn reason(&self) -> &'static str;
}

/// Stop after a number of generations
#[derive(Clone, Debug)]
pub struct MaxGenerations(pub usize);

impl MaxGenerations {
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationCriterion for MaxGenerations {
    fn should_terminate(&self, state: &SearchState) -> bool {
        state.generation >= self.0
    }

    fn reason(&self) -> &'static str {
        "Maximum generations reached"
    }
}

/// Stop once the fitness function has been called a number of times
#[derive(Clone, Debug)]
pub struct MaxEvaluations(pub usize);

impl MaxEvaluations {
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationCriterion for MaxEvaluations {
    fn should_terminate(&self, state: &SearchState) -> bool {
        state.evaluations >= self.0
    }

    fn reason(&self) -> &'static str {
        "Maximum evaluations reached"
    }
}

/// Stop when the best fitness improved by less than `epsilon` over the last
/// `window` generations.
///
/// Improvement is measured in the search direction, so a history that got
/// worse (possible without elitism) also counts as stagnant.
#[derive(Clone, Debug)]
pub struct FitnessStagnation {
    /// Generations to look back
    pub window: usize,
    /// Smallest improvement that still counts as progress
    pub epsilon: f64,
}

impl FitnessStagnation {
    pub fn new(window: usize, epsilon: f64) -> Self {
        Self { window, epsilon }
    }
}

impl TerminationCriterion for FitnessStagnation {
    fn should_terminate(&self, state: &SearchState) -> bool {
        let history = state.fitness_history;
        if self.window == 0 || history.len() <= self.window {
            return false;
        }
        let now = history[history.len() - 1];
        let then = history[history.len() - 1 - self.window];
        let improvement = match state.objective {
            Objective::Maximize => now - then,
            Objective::Minimize => then - now,
        };
        improvement < self.epsilon
    }

    fn reason(&self) -> &'static str {
        "Fitness stagnation detected"
    }
}

/// Stop once the best fitness reaches `target`.
///
/// "Reaches" follows the search objective: at or above the target when
/// maximizing, at or below it when minimizing, within `tolerance`.
#[derive(Clone, Debug)]
pub struct TargetFitness {
    pub target: f64,
    pub tolerance: f64,
}

impl TargetFitness {
    pub fn new(target: f64) -> Self {
        Self::with_tolerance(target, 0.0)
    }

    pub fn with_tolerance(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance }
    }
}

impl TerminationCriterion for TargetFitness {
    fn should_terminate(&self, state: &SearchState) -> bool {
        match state.objective {
            Objective::Maximize => state.best_fitness >= self.target - self.tolerance,
            Objective::Minimize => state.best_fitness <= self.target + self.tolerance,
        }
    }

    fn reason(&self) -> &'static str {
        "Target fitness reached"
    }
}

/// Stop as soon as any of the wrapped criteria triggers
pub struct AnyOf {
    criteria: Vec<Box<dyn TerminationCriterion>>,
}

impl AnyOf {
    pub fn new(criteria: Vec<Box<dyn TerminationCriterion>>) -> Self {
        Self { criteria }
    }

    /// Add another criterion
    pub fn or(mut self, criterion: impl TerminationCriterion + 'static) -> Self {
        self.criteria.push(Box::new(criterion));
        self
    }
}

impl TerminationCriterion for AnyOf {
    fn should_terminate(&self, state: &SearchState) -> bool {
        self.criteria.iter().any(|c| c.should_terminate(state))
    }

    fn reason(&self) -> &'static str {
        "One of multiple criteria met"
    }
}

pub mod prelude {
    pub use super::{
        AnyOf, FitnessStagnation, MaxEvaluations, MaxGenerations, SearchState, TargetFitness, TerminationCriterion,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(generation: usize, best_fitness: f64, objective: Objective, fitness_history: &[f64]) -> SearchState<'_> {
        SearchState {
            generation,
            evaluations: generation * 10,
            best_fitness,
            objective,
            fitness_history,
        }
    }

    #[test]
    fn test_budgets() {
        let state = at(20, 0.0, Objective::Maximize, &[]);
        assert!(MaxGenerations::new(20).should_terminate(&state));
        assert!(!MaxGenerations::new(21).should_terminate(&state));
        assert!(MaxEvaluations::new(200).should_terminate(&state));
        assert!(!MaxEvaluations::new(201).should_terminate(&state));
    }

    #[test]
    fn test_stagnation_needs_a_full_window() {
        let criterion = FitnessStagnation::new(3, 0.5);
        assert!(!criterion.should_terminate(&at(2, 1.0, Objective::Maximize, &[1.0, 1.0, 1.0])));
        assert!(criterion.should_terminate(&at(3, 1.0, Objective::Maximize, &[1.0, 1.0, 1.0, 1.0])));
        assert!(!FitnessStagnation::new(0, 0.5).should_terminate(&at(3, 1.0, Objective::Maximize, &[1.0; 4])));
    }

    #[test]
    fn test_stagnation_compares_against_window_start() {
        let criterion = FitnessStagnation::new(2, 0.5);
        // early progress outside the window does not count
        let history = [0.0, 5.0, 5.2, 5.3];
        assert!(criterion.should_terminate(&at(3, 5.3, Objective::Maximize, &history)));
        let history = [0.0, 5.0, 5.2, 6.0];
        assert!(!criterion.should_terminate(&at(3, 6.0, Objective::Maximize, &history)));
    }

    #[test]
    fn test_stagnation_follows_objective() {
        let criterion = FitnessStagnation::new(2, 0.5);
        let falling = [9.0, 6.0, 3.0];
        assert!(!criterion.should_terminate(&at(2, 3.0, Objective::Minimize, &falling)));
        assert!(criterion.should_terminate(&at(2, 3.0, Objective::Maximize, &falling)));
    }

    #[test]
    fn test_target_fitness() {
        let criterion = TargetFitness::new(10.0);
        assert!(!criterion.should_terminate(&at(0, 9.5, Objective::Maximize, &[])));
        assert!(criterion.should_terminate(&at(0, 10.0, Objective::Maximize, &[])));
        assert!(TargetFitness::with_tolerance(10.0, 1.0).should_terminate(&at(0, 9.5, Objective::Maximize, &[])));

        assert!(!criterion.should_terminate(&at(0, 10.5, Objective::Minimize, &[])));
        assert!(criterion.should_terminate(&at(0, 2.0, Objective::Minimize, &[])));
    }

    #[test]
    fn test_any_of() {
        let criterion = AnyOf::new(vec![Box::new(MaxGenerations::new(50))]).or(TargetFitness::new(1.0));
        assert!(!criterion.should_terminate(&at(10, 0.5, Objective::Maximize, &[])));
        assert!(criterion.should_terminate(&at(50, 0.5, Objective::Maximize, &[])));
        assert!(criterion.should_terminate(&at(10, 1.0, Objective::Maximize, &[])));
        assert!(!AnyOf::new(Vec::new()).should_terminate(&at(10, 1.0, Objective::Maximize, &[])));
    }
}
