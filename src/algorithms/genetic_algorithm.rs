//! Generational genetic algorithm
//!
//! Truncation selection, then crossover and mutation through the trace
//! operators. With elitism the best solution of each generation survives
//! unchanged into the next.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{stop_reason, Objective, SearchResult};
use crate::bindings::Rnd;
use crate::error::{TraceError, TraceResult};
use crate::operators::{CrossoverKind, MutationKind, Operators};
use crate::termination::{SearchState, TerminationCriterion};
use crate::trace::Solution;

/// Configuration for the genetic algorithm
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticAlgorithmConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations
    pub generations: usize,
    /// Fraction of the ranked population that may reproduce, in (0, 1]
    pub truncation_rate: f64,
    /// Mutation applied to every child
    pub mutation: MutationKind,
    /// Crossover used to produce children
    pub crossover: CrossoverKind,
    /// Whether to carry the best solution over unchanged
    pub elitism: bool,
    /// Direction of the search
    pub objective: Objective,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            truncation_rate: 0.5,
            mutation: MutationKind::PositionWise,
            crossover: CrossoverKind::OnePoint,
            elitism: true,
            objective: Objective::Maximize,
        }
    }
}

impl GeneticAlgorithmConfig {
    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the number of generations
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Set the truncation rate
    pub fn truncation_rate(mut self, rate: f64) -> Self {
        self.truncation_rate = rate;
        self
    }

    /// Set the mutation kind
    pub fn mutation(mut self, mutation: MutationKind) -> Self {
        self.mutation = mutation;
        self
    }

    /// Set the crossover kind
    pub fn crossover(mut self, crossover: CrossoverKind) -> Self {
        self.crossover = crossover;
        self
    }

    /// Enable or disable elitism
    pub fn elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Set the search direction
    pub fn objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Check the configuration before a run
    pub fn validate(&self) -> TraceResult<()> {
        if self.population_size == 0 {
            return Err(TraceError::EmptyPopulation);
        }
        if self.generations == 0 {
            return Err(TraceError::Configuration(
                "generations must be positive".to_string(),
            ));
        }
        if !(self.truncation_rate > 0.0 && self.truncation_rate <= 1.0) {
            return Err(TraceError::Configuration(format!(
                "truncation_rate must be in (0, 1], got {}",
                self.truncation_rate
            )));
        }
        Ok(())
    }

    /// Number of ranked solutions allowed to reproduce
    fn mating_pool_size(&self) -> usize {
        let n = self.population_size;
        ((n as f64 * self.truncation_rate).ceil() as usize).clamp(1, n)
    }
}

/// Generational genetic algorithm over trace operators
#[derive(Default)]
pub struct GeneticAlgorithm {
    config: GeneticAlgorithmConfig,
    termination: Option<Box<dyn TerminationCriterion>>,
}

impl GeneticAlgorithm {
    /// Create a genetic algorithm with the given configuration
    pub fn new(config: GeneticAlgorithmConfig) -> Self {
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
    pub fn config(&self) -> &GeneticAlgorithmConfig {
        &self.config
    }

    /// Run the search
    pub fn run<P, G, F, R>(&self, ops: &mut Operators<P, G, F>, rng: &mut R) -> TraceResult<SearchResult<P>>
    where
        P: Clone,
        G: Fn(&mut Rnd<'_>) -> P,
        F: Fn(&P) -> f64,
        R: Rng,
    {
        self.config.validate()?;
        let objective = self.config.objective;
        let n = self.config.population_size;
        let pool_size = self.config.mating_pool_size();
        info!(
            population_size = n,
            generations = self.config.generations,
            pool_size,
            mutation = ?self.config.mutation,
            crossover = ?self.config.crossover,
            "starting genetic algorithm"
        );

        let mut population: Vec<(Solution<P>, f64)> = (0..n)
            .map(|_| {
                let sol = ops.create_ind(rng);
                let fitness = ops.evaluate_ind(&sol);
                (sol, fitness)
            })
            .collect();
        let mut evaluations = n;

        population.sort_by(|a, b| objective.rank(a.1, b.1));
        let (mut best, mut best_fitness) = population
            .first()
            .map(|(sol, f)| (sol.clone(), *f))
            .ok_or(TraceError::EmptyPopulation)?;
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

            // population is ranked best first here
            let mut next = Vec::with_capacity(n);
            if self.config.elitism {
                next.push(population[0].clone());
            }
            while next.len() < n {
                let p1 = &population[rng.gen_range(0..pool_size)].0;
                let p2 = &population[rng.gen_range(0..pool_size)].0;
                let child = ops.crossover_with(self.config.crossover, p1, p2, rng);
                let child = ops.mutate_with(self.config.mutation, &child, rng);
                let fitness = ops.evaluate_ind(&child);
                evaluations += 1;
                next.push((child, fitness));
            }

            population = next;
            population.sort_by(|a, b| objective.rank(a.1, b.1));
            if objective.is_better(population[0].1, best_fitness) {
                best = population[0].0.clone();
                best_fitness = population[0].1;
            }

            generation += 1;
            history.push(best_fitness);
            debug!(
                generation,
                best_fitness,
                generation_best = population[0].1,
                "genetic algorithm generation"
            );
        };

        info!(generation, evaluations, best_fitness, reason, "genetic algorithm finished");
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
