//! Operator configuration

use serde::{Deserialize, Serialize};

use crate::distribution::Mode;

/// Mutation used by [`Operators::mutate_ind`](super::Operators::mutate_ind)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Mutate exactly one decision
    #[default]
    Point,
    /// Mutate each decision with probability 1/N
    PositionWise,
    /// Discard the individual and create a new one
    Random,
}

/// Crossover used by [`Operators::crossover_ind`](super::Operators::crossover_ind)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverKind {
    /// Recombine every shared decision
    #[default]
    Uniform,
    /// Take shared decisions from the first parent up to a cut, then from the second
    OnePoint,
}

/// Configuration for [`Operators`](super::Operators)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorsConfig {
    /// Operator regime attached to every decision the generator makes
    pub mode: Mode,
    /// Mutation dispatched by `mutate_ind`
    pub mutation: MutationKind,
    /// Crossover dispatched by `crossover_ind`
    pub crossover: CrossoverKind,
}

impl OperatorsConfig {
    /// Set the operator regime
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
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
}
