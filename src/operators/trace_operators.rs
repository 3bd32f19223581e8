//! Trace-based genetic operators
//!
//! Mutation and crossover edit a copy of the parents' genotypes through the
//! [`Distribution`] operators and then replay the edited genotype, so the
//! child is always a genotype the generator can actually produce. Parents are
//! never modified.

use std::marker::PhantomData;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use super::config::{CrossoverKind, MutationKind, OperatorsConfig};
use crate::bindings::{KeyStrategy, LinearKeys, Rnd};
use crate::distribution::Mode;
use crate::trace::{Solution, Trace, TraceKey, Tracer};

/// Genetic operators for one generator and fitness function
///
/// The generator receives an [`Rnd`] bound to this instance's private tracer
/// and must route all of its randomness through it.
pub struct Operators<P, G, F> {
    generator: G,
    fitness: F,
    tracer: Tracer,
    config: OperatorsConfig,
    keys: Box<dyn KeyStrategy>,
    _pheno: PhantomData<fn() -> P>,
}

impl<P, G, F> Operators<P, G, F>
where
    G: Fn(&mut Rnd<'_>) -> P,
    F: Fn(&P) -> f64,
{
    /// Create operators with the default configuration and linear keys
    pub fn new(generator: G, fitness: F) -> Self {
        Self {
            generator,
            fitness,
            tracer: Tracer::new(),
            config: OperatorsConfig::default(),
            keys: Box::new(LinearKeys),
            _pheno: PhantomData,
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: OperatorsConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the operator regime attached to every decision
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the naming strategy
    pub fn with_keys(mut self, keys: impl KeyStrategy + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    /// Current configuration
    pub fn config(&self) -> &OperatorsConfig {
        &self.config
    }

    fn replay<R: Rng>(&mut self, input: Trace, rng: &mut R) -> Solution<P> {
        let generator = &self.generator;
        let keys = &*self.keys;
        let mode = self.config.mode;
        self.tracer.play(input, |tracer| {
            let mut rnd = Rnd::new(tracer, rng).with_mode(mode).with_keys(keys);
            generator(&mut rnd)
        })
    }

    /// Run the generator from scratch
    pub fn create_ind<R: Rng>(&mut self, rng: &mut R) -> Solution<P> {
        self.replay(Trace::new(), rng)
    }

    /// Fitness of a solution's phenotype
    pub fn evaluate_ind(&self, sol: &Solution<P>) -> f64 {
        (self.fitness)(&sol.pheno)
    }

    /// Replay an arbitrary genotype into a valid solution
    pub fn fix_ind<R: Rng>(&mut self, geno: Trace, rng: &mut R) -> Solution<P> {
        self.replay(geno, rng)
    }

    /// Mutate one uniformly chosen decision
    pub fn mutate_point_ind<R: Rng>(&mut self, sol: &Solution<P>, rng: &mut R) -> Solution<P> {
        let keys: Vec<&TraceKey> = sol.geno.keys().collect();
        let Some(&key) = keys.choose(rng) else {
            return self.create_ind(rng);
        };

        let mut geno = sol.geno.clone();
        if let Some(dist) = geno.get_mut(key) {
            trace!(key = %key, kind = %dist.kind(), "point mutation");
            *dist = dist.mutation(rng);
        }
        self.fix_ind(geno, rng)
    }

    /// Mutate each decision independently with probability 1/N
    pub fn mutate_position_wise_ind<R: Rng>(&mut self, sol: &Solution<P>, rng: &mut R) -> Solution<P> {
        if sol.geno.is_empty() {
            return self.create_ind(rng);
        }

        let probability = 1.0 / sol.geno.len() as f64;
        let geno: Trace = sol
            .geno
            .iter()
            .map(|(key, dist)| {
                let dist = if rng.gen::<f64>() < probability {
                    dist.mutation(rng)
                } else {
                    dist.clone()
                };
                (key.clone(), dist)
            })
            .collect();
        self.fix_ind(geno, rng)
    }

    /// Ignore the solution and create a new one
    pub fn mutate_random_ind<R: Rng>(&mut self, _sol: &Solution<P>, rng: &mut R) -> Solution<P> {
        self.create_ind(rng)
    }

    /// Mutation selected by the configuration
    pub fn mutate_ind<R: Rng>(&mut self, sol: &Solution<P>, rng: &mut R) -> Solution<P> {
        self.mutate_with(self.config.mutation, sol, rng)
    }

    /// Mutation of the given kind
    pub fn mutate_with<R: Rng>(&mut self, kind: MutationKind, sol: &Solution<P>, rng: &mut R) -> Solution<P> {
        match kind {
            MutationKind::Point => self.mutate_point_ind(sol, rng),
            MutationKind::PositionWise => self.mutate_position_wise_ind(sol, rng),
            MutationKind::Random => self.mutate_random_ind(sol, rng),
        }
    }

    /// Recombine every decision the parents share.
    ///
    /// The child starts as the union of both genotypes (the second parent wins
    /// on shared keys) and each shared key is then replaced by the crossover of
    /// the two parents' decisions.
    pub fn crossover_uniform_ind<R: Rng>(&mut self, s1: &Solution<P>, s2: &Solution<P>, rng: &mut R) -> Solution<P> {
        let mut geno = s1.geno.union(&s2.geno);
        for key in s1.geno.common_keys(&s2.geno) {
            if let (Some(a), Some(b)) = (s1.geno.get(&key), s2.geno.get(&key)) {
                let child = a.crossover(b, rng);
                geno.insert(key, child);
            }
        }
        self.fix_ind(geno, rng)
    }

    /// Whole-decision one-point crossover over the shared keys
    pub fn crossover_one_point_ind<R: Rng>(&mut self, s1: &Solution<P>, s2: &Solution<P>, rng: &mut R) -> Solution<P> {
        let shared = s1.geno.common_keys(&s2.geno).len();
        if shared == 0 {
            return self.fix_ind(s1.geno.union(&s2.geno), rng);
        }
        let cut = rng.gen_range(0..shared);
        self.crossover_one_point_at(s1, s2, cut, rng)
    }

    /// One-point crossover with a fixed cut.
    ///
    /// Shared keys before `cut` (in the first parent's order) take the first
    /// parent's decision, the rest take the second parent's.
    pub fn crossover_one_point_at<R: Rng>(
        &mut self,
        s1: &Solution<P>,
        s2: &Solution<P>,
        cut: usize,
        rng: &mut R,
    ) -> Solution<P> {
        let mut geno = s1.geno.union(&s2.geno);
        for (i, key) in s1.geno.common_keys(&s2.geno).into_iter().enumerate() {
            let source = if i < cut { &s1.geno } else { &s2.geno };
            if let Some(dist) = source.get(&key) {
                geno.insert(key, dist.clone());
            }
        }
        self.fix_ind(geno, rng)
    }

    /// Crossover selected by the configuration
    pub fn crossover_ind<R: Rng>(&mut self, s1: &Solution<P>, s2: &Solution<P>, rng: &mut R) -> Solution<P> {
        self.crossover_with(self.config.crossover, s1, s2, rng)
    }

    /// Crossover of the given kind
    pub fn crossover_with<R: Rng>(
        &mut self,
        kind: CrossoverKind,
        s1: &Solution<P>,
        s2: &Solution<P>,
        rng: &mut R,
    ) -> Solution<P> {
        match kind {
            CrossoverKind::Uniform => self.crossover_uniform_ind(s1, s2, rng),
            CrossoverKind::OnePoint => self.crossover_one_point_ind(s1, s2, rng),
        }
    }

    /// Three-parent crossover over the keys all parents share
    pub fn convex_crossover_ind<R: Rng>(
        &mut self,
        s1: &Solution<P>,
        s2: &Solution<P>,
        s3: &Solution<P>,
        rng: &mut R,
    ) -> Solution<P> {
        let mut geno = s1.geno.union(&s2.geno).union(&s3.geno);
        for key in s1.geno.common_keys(&s2.geno) {
            if let (Some(a), Some(b), Some(c)) = (s1.geno.get(&key), s2.geno.get(&key), s3.geno.get(&key)) {
                let child = a.convex_crossover(b, c, rng);
                geno.insert(key, child);
            }
        }
        self.fix_ind(geno, rng)
    }

    /// Distance between two solutions.
    ///
    /// Sum of per-decision distances over shared keys plus one for every key
    /// only one of the genotypes has.
    pub fn distance_ind(&self, s1: &Solution<P>, s2: &Solution<P>) -> f64 {
        let shared: f64 = s1
            .geno
            .iter()
            .map(|(key, a)| match s2.geno.get(key) {
                Some(b) => a.distance(b),
                None => 1.0,
            })
            .sum();
        let only_second = s2.geno.keys().filter(|k| !s1.geno.contains_key(k)).count();
        shared + only_second as f64
    }
}

impl<Q, E, G, F> Operators<Result<Q, E>, G, F>
where
    G: Fn(&mut Rnd<'_>) -> Result<Q, E>,
    F: Fn(&Result<Q, E>) -> f64,
{
    fn try_replay<R: Rng>(&mut self, input: Trace, rng: &mut R) -> Result<Solution<Q>, E> {
        let generator = &self.generator;
        let keys = &*self.keys;
        let mode = self.config.mode;
        self.tracer.try_play(input, |tracer| {
            let mut rnd = Rnd::new(tracer, rng).with_mode(mode).with_keys(keys);
            generator(&mut rnd)
        })
    }

    /// Run a fallible generator from scratch, returning its error unchanged
    pub fn try_create_ind<R: Rng>(&mut self, rng: &mut R) -> Result<Solution<Q>, E> {
        self.try_replay(Trace::new(), rng)
    }

    /// Replay a genotype through a fallible generator
    pub fn try_fix_ind<R: Rng>(&mut self, geno: Trace, rng: &mut R) -> Result<Solution<Q>, E> {
        self.try_replay(geno, rng)
    }
}

impl<P, G, F> std::fmt::Debug for Operators<P, G, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operators")
            .field("config", &self.config)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}
