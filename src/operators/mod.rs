//! Genetic operators on traces
//!
//! [`Operators`] wraps a generator and a fitness function and exposes the
//! creation, mutation, crossover and distance operators solvers are built
//! from. Every edited genotype is made valid again by replaying it through
//! the generator.

pub mod config;
pub mod trace_operators;

pub use config::{CrossoverKind, MutationKind, OperatorsConfig};
pub use trace_operators::Operators;

pub mod prelude {
    pub use super::config::{CrossoverKind, MutationKind, OperatorsConfig};
    pub use super::trace_operators::Operators;
}
