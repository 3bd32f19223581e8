//! # pto
//!
//! Program trace optimisation: black-box search over the random decisions of
//! an ordinary generator program.
//!
//! A generator draws all of its randomness through [`bindings::Rnd`]. Every
//! decision is recorded as a typed [`distribution::Distribution`] in a
//! [`trace::Trace`], and the search operators mutate, recombine and compare
//! those traces instead of the objects the generator builds. Replaying an
//! edited trace through the generator repairs it, so every operator output is
//! a valid solution.
//!
//! ## Core Concepts
//!
//! - **Traced decisions**: `uniform`, `randint`, `choice` and `sample` each record one distribution
//! - **Record/replay**: the [`trace::Tracer`] reuses, repairs or samples each decision by key
//! - **Operators**: mutation, crossover and distance defined on traces, in a coarse or fine regime
//! - **Solvers**: hill climbing, random search and a genetic algorithm built only on the operators
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pto::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let generator = |rnd: &mut Rnd<'_>| (0..32).map(|_| rnd.choice(&[false, true])).collect::<Vec<_>>();
//! let fitness = |bits: &Vec<bool>| bits.iter().filter(|&&b| b).count() as f64;
//!
//! let mut ops = Operators::new(generator, fitness);
//! let result = HillClimber::new(HillClimberConfig::default().generations(500))
//!     .run(&mut ops, &mut rng)?;
//! ```

pub mod algorithms;
pub mod bindings;
pub mod distribution;
pub mod error;
pub mod operators;
pub mod termination;
pub mod trace;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::bindings::prelude::*;
    pub use crate::distribution::prelude::*;
    pub use crate::error::*;
    pub use crate::operators::prelude::*;
    pub use crate::termination::prelude::*;
    pub use crate::trace::prelude::*;
}
