//! Hill climbing
//!
//! Keeps one current solution and replaces it by its mutant whenever the
//! mutant is at least as good, so neutral moves are accepted.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{stop_reason, Objective, SearchResult};
use crate::bindings::Rnd;
use crate::error::{TraceError, TraceResult};
use crate::operators::{MutationKind, Operators};
use crate::termination::{SearchState, TerminationCriterion};

/// Configuration for the hill climber
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillClimberConfig {
    /// Number of mutation steps
    pub generations: usize,
    /// Mutation applied at every step
    pub mutation: MutationKind,
    /// Direction of the search
    pub objective: Objective,
}

impl Default for HillClimberConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            mutation: MutationKind::PositionWise,
            objective: Objective::Maximize,
        }
    }
}

impl HillClimberConfig {
    /// Set the number of mutation steps
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Set the mutation kind
    pub fn mutation(mut self, mutation: MutationKind) -> Self {
        self.mutation = mutation;
        self
    }

    /// Set the search direction
    pub fn objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Check the configuration before a run
    pub fn validate(&self) -> TraceResult<()> {
        if self.generations == 0 {
            return Err(TraceError::Configuration(
                "generations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Single-solution hill climber
#[derive(Default)]
pub struct HillClimber {
    config: HillClimberConfig,
    termination: Option<Box<dyn TerminationCriterion>>,
}

impl HillClimber {
    /// Create a hill climber with the given configuration
    pub fn new(config: HillClimberConfig) -> Self {
        Self {
            config,
            termination: None,
        }
    }

    /// Stop early when `criterion` triggers (the generation budget still applies)
    pub fn with_termination(mut self, criterion: impl TerminationCriterion + 'static) -> Self {
        self.termination = Some(Box::new(criterion));
        self
    }

    /// Current configuration
    pub fn config(&self) -> &HillClimberConfig {
        &self.config
    }

    /// Run the search
    pub fn run<P, G, F, R>(&self, ops: &mut Operators<P, G, F>, rng: &mut R) -> TraceResult<SearchResult<P>>
    where
        G: Fn(&mut Rnd<'_>) -> P,
        F: Fn(&P) -> f64,
        R: Rng,
    {
        self.config.validate()?;
        let objective = self.config.objective;
        info!(
            generations = self.config.generations,
            mutation = ?self.config.mutation,
            objective = ?objective,
            "starting hill climber"
        );

        let mut best = ops.create_ind(rng);
        let mut best_fitness = ops.evaluate_ind(&best);
        let mut evaluations = 1;
        let mut history = vec![best_fitness];
        let mut generation = 0;

        let reason = loop {
            let state = SearchState {
                generation,
                evaluations,
                best_fitness,
                objective,
                fitness_history: &history,
            };
            if let Some(reason) = stop_reason(self.config.generations, self.termination.as_deref(), &state) {
                break reason;
            }

            let candidate = ops.mutate_with(self.config.mutation, &best, rng);
            let fitness = ops.evaluate_ind(&candidate);
            evaluations += 1;
            if objective.is_at_least(fitness, best_fitness) {
                best = candidate;
                best_fitness = fitness;
            }

            generation += 1;
            history.push(best_fitness);
            debug!(generation, best_fitness, "hill climber step");
        };

        info!(generation, evaluations, best_fitness, reason, "hill climber finished");
        Ok(SearchResult {
            best,
            fitness: best_fitness,
            generations: generation,
            evaluations,
            history,
            termination_reason: reason.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::TargetFitness;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bits(rnd: &mut Rnd<'_>) -> Vec<bool> {
        (0..20).map(|_| rnd.choice(&[false, true])).collect()
    }

    fn ones(xs: &Vec<bool>) -> f64 {
        xs.iter().filter(|&&b| b).count() as f64
    }

    #[test]
    fn test_validate_rejects_zero_generations() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ops = Operators::new(bits, ones);
        let hc = HillClimber::new(HillClimberConfig::default().generations(0));
        assert!(matches!(hc.run(&mut ops, &mut rng), Err(TraceError::Configuration(_))));
    }

    #[test]
    fn test_history_is_monotone() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut ops = Operators::new(bits, ones);
        let result = HillClimber::new(HillClimberConfig::default().generations(200))
            .run(&mut ops, &mut rng)
            .unwrap();

        assert_eq!(result.generations, 200);
        assert_eq!(result.evaluations, 201);
        assert_eq!(result.history.len(), 201);
        assert!(result.history.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(result.fitness, ones(&result.best.pheno));
        assert_eq!(result.termination_reason, "Maximum generations reached");
    }

    #[test]
    fn test_minimizing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ops = Operators::new(bits, ones);
        let config = HillClimberConfig::default()
            .generations(300)
            .objective(Objective::Minimize);
        let result = HillClimber::new(config).run(&mut ops, &mut rng).unwrap();
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
        assert!(result.fitness <= result.history[0]);
    }

    #[test]
    fn test_stops_at_target() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut ops = Operators::new(bits, ones);
        let result = HillClimber::new(HillClimberConfig::default().generations(5000))
            .with_termination(TargetFitness::new(20.0))
            .run(&mut ops, &mut rng)
            .unwrap();
        assert_eq!(result.fitness, 20.0);
        assert!(result.generations < 5000);
        assert_eq!(result.termination_reason, "Target fitness reached");
    }
}
