//! Traced random decisions
//!
//! A [`Distribution`] is the typed record of one random decision made by a
//! generator: its kind, its parameters and (once sampled) its value. Every
//! genetic operator on traces is expressed through the operators defined here.
//!
//! # Operator regimes
//!
//! Each distribution carries a [`Mode`] that selects one of two operator tables:
//!
//! | Operator    | Coarse                    | Fine                                  |
//! |-------------|---------------------------|---------------------------------------|
//! | `mutation`  | resample                  | kind-aware local move                 |
//! | `crossover` | pick one parent (p = 1/2) | blend (real/int), alignment (sample)  |
//! | `repair`    | resample                  | proportional remap / value reuse      |
//! | `distance`  | magnitude or 0/1          | normalised magnitude or alignment     |
//!
//! Sampling itself never depends on the mode.

pub mod cat;
pub mod int;
pub mod real;
pub mod seq;
pub mod value;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TraceError;

pub use cat::{CatParams, RandomCat};
pub use int::{IntParams, RandomInt};
pub use real::{RandomReal, RealParams};
pub use seq::{AlignStats, RandomSeq, SeqParams};
pub use value::{Cardinality, Outcome, Value};

/// Operator regime of a distribution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Domain-agnostic operators, safe under any parameter change
    Coarse,
    /// Domain-aware operators with small, structured perturbations
    #[default]
    Fine,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coarse => write!(f, "coarse"),
            Self::Fine => write!(f, "fine"),
        }
    }
}

impl FromStr for Mode {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coarse" => Ok(Self::Coarse),
            "fine" => Ok(Self::Fine),
            other => Err(TraceError::InvalidMode(other.to_string())),
        }
    }
}

/// Primitive kind of a decision, named after the binding that creates it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Real value in `[a, b)`
    Uniform,
    /// Integer value in `[a, b]`
    RandInt,
    /// One element of a sequence
    Choice,
    /// Ordered selection of `k` distinct positions of a sequence
    Sample,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::RandInt => write!(f, "randint"),
            Self::Choice => write!(f, "choice"),
            Self::Sample => write!(f, "sample"),
        }
    }
}

/// One traced random decision
#[derive(Clone, Debug, PartialEq)]
pub enum Distribution {
    /// `uniform(a, b)`
    Real(RandomReal),
    /// `randint(a, b)`
    Int(RandomInt),
    /// `choice(seq)`
    Cat(RandomCat),
    /// `sample(seq, k)`
    Seq(RandomSeq),
}

impl From<RandomReal> for Distribution {
    fn from(d: RandomReal) -> Self {
        Self::Real(d)
    }
}

impl From<RandomInt> for Distribution {
    fn from(d: RandomInt) -> Self {
        Self::Int(d)
    }
}

impl From<RandomCat> for Distribution {
    fn from(d: RandomCat) -> Self {
        Self::Cat(d)
    }
}

impl From<RandomSeq> for Distribution {
    fn from(d: RandomSeq) -> Self {
        Self::Seq(d)
    }
}

impl Distribution {
    /// Primitive kind of this decision
    pub fn kind(&self) -> Kind {
        match self {
            Self::Real(_) => Kind::Uniform,
            Self::Int(_) => Kind::RandInt,
            Self::Cat(_) => Kind::Choice,
            Self::Seq(_) => Kind::Sample,
        }
    }

    /// Operator regime of this decision
    pub fn mode(&self) -> Mode {
        match self {
            Self::Real(d) => d.mode,
            Self::Int(d) => d.mode,
            Self::Cat(d) => d.mode,
            Self::Seq(d) => d.mode,
        }
    }

    /// Set the operator regime
    pub fn set_mode(&mut self, mode: Mode) {
        match self {
            Self::Real(d) => d.mode = mode,
            Self::Int(d) => d.mode = mode,
            Self::Cat(d) => d.mode = mode,
            Self::Seq(d) => d.mode = mode,
        }
    }

    /// Builder-style variant of [`Distribution::set_mode`]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.set_mode(mode);
        self
    }

    /// The sampled value, if any
    pub fn value(&self) -> Option<Outcome> {
        match self {
            Self::Real(d) => d.val.map(Outcome::Real),
            Self::Int(d) => d.val.map(Outcome::Int),
            Self::Cat(d) => d.val.clone().map(Outcome::Cat),
            Self::Seq(d) => d.val.clone().map(Outcome::Seq),
        }
    }

    /// Returns true once a value has been drawn or adopted
    pub fn is_sampled(&self) -> bool {
        match self {
            Self::Real(d) => d.val.is_some(),
            Self::Int(d) => d.val.is_some(),
            Self::Cat(d) => d.val.is_some(),
            Self::Seq(d) => d.val.is_some(),
        }
    }

    /// Structural equality of kind and parameters, ignoring values and mode
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => a.params == b.params,
            (Self::Int(a), Self::Int(b)) => a.params == b.params,
            (Self::Cat(a), Self::Cat(b)) => a.params == b.params,
            (Self::Seq(a), Self::Seq(b)) => a.params == b.params,
            _ => false,
        }
    }

    /// Cardinality of the decision's domain
    pub fn size(&self) -> Cardinality {
        match self {
            Self::Real(_) => Cardinality::Infinite,
            Self::Int(d) => d.size(),
            Self::Cat(d) => d.size(),
            Self::Seq(d) => d.size(),
        }
    }

    /// Draw a fresh value from the primitive's own law, replacing any previous value
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Outcome {
        match self {
            Self::Real(d) => Outcome::Real(d.sample(rng)),
            Self::Int(d) => Outcome::Int(d.sample(rng)),
            Self::Cat(d) => Outcome::Cat(d.sample(rng)),
            Self::Seq(d) => Outcome::Seq(d.sample(rng)),
        }
    }

    /// Copy the value of a matching trace entry into this decision.
    ///
    /// Returns false (and leaves `self` untouched) if the entry is of another
    /// kind or was never sampled.
    pub(crate) fn adopt(&mut self, other: &Self) -> bool {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) if b.val.is_some() => a.val = b.val,
            (Self::Int(a), Self::Int(b)) if b.val.is_some() => a.val = b.val,
            (Self::Cat(a), Self::Cat(b)) if b.val.is_some() => a.val = b.val.clone(),
            (Self::Seq(a), Self::Seq(b)) if b.val.is_some() => a.val = b.val.clone(),
            _ => return false,
        }
        true
    }

    /// Mutated copy of this decision; `self` is never modified
    pub fn mutation<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        match (self.mode(), self) {
            (Mode::Coarse, _) => {
                let mut offspring = self.clone();
                offspring.sample(rng);
                offspring
            }
            (Mode::Fine, Self::Real(d)) => Self::Real(d.mutated(rng)),
            (Mode::Fine, Self::Int(d)) => Self::Int(d.mutated(rng)),
            (Mode::Fine, Self::Cat(d)) => Self::Cat(d.mutated(rng)),
            (Mode::Fine, Self::Seq(d)) => Self::Seq(d.mutated(rng)),
        }
    }

    /// Recombine with another decision at the same trace key
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        match (self.mode(), self, other) {
            (Mode::Fine, Self::Real(a), Self::Real(b)) => Self::Real(a.blended(b, rng)),
            (Mode::Fine, Self::Int(a), Self::Int(b)) => Self::Int(a.blended(b, rng)),
            (Mode::Fine, Self::Seq(a), Self::Seq(b)) => Self::Seq(a.aligned_prefix(b, rng)),
            _ => pick([self, other], rng),
        }
    }

    /// Recombine with two other decisions at the same trace key
    pub fn convex_crossover<R: Rng + ?Sized>(&self, other1: &Self, other2: &Self, rng: &mut R) -> Self {
        match (self.mode(), self, other1, other2) {
            (Mode::Fine, Self::Real(a), Self::Real(b), Self::Real(c)) => {
                Self::Real(a.convex_blended(b, c, rng))
            }
            (Mode::Fine, Self::Int(a), Self::Int(b), Self::Int(c)) => {
                Self::Int(a.convex_blended(b, c, rng))
            }
            _ => pick([self, other1, other2], rng),
        }
    }

    /// Adapt the value of an outdated trace entry whose parameters no longer match
    pub fn repair<R: Rng + ?Sized>(&mut self, other: &Self, rng: &mut R) {
        if self.mode() == Mode::Coarse {
            self.sample(rng);
            return;
        }
        match self {
            Self::Real(d) => d.repair(other, rng),
            Self::Int(d) => d.repair(other, rng),
            Self::Cat(d) => d.repair(other, rng),
            Self::Seq(d) => d.repair(other, rng),
        }
    }

    /// Distance to another decision at the same trace key
    pub fn distance(&self, other: &Self) -> f64 {
        match (self.mode(), self, other) {
            (Mode::Coarse, Self::Real(a), Self::Real(b)) => a.coarse_distance(b),
            (Mode::Coarse, Self::Int(a), Self::Int(b)) => a.coarse_distance(b),
            (Mode::Coarse, Self::Seq(a), Self::Seq(b)) => a.coarse_distance(b),
            (Mode::Fine, Self::Real(a), Self::Real(b)) => a.fine_distance(b),
            (Mode::Fine, Self::Int(a), Self::Int(b)) => a.fine_distance(b),
            (Mode::Fine, Self::Seq(a), Self::Seq(b)) => a.fine_distance(b),
            _ => self.binary_distance(other),
        }
    }

    /// 0 for identical kind, parameters and value, 1 otherwise
    fn binary_distance(&self, other: &Self) -> f64 {
        if self.matches(other) && self.value() == other.value() {
            0.0
        } else {
            1.0
        }
    }
}

fn pick<const N: usize, R: Rng + ?Sized>(parents: [&Distribution; N], rng: &mut R) -> Distribution {
    parents[rng.gen_range(0..N)].clone()
}

pub mod prelude {
    pub use super::{
        Cardinality, Distribution, Kind, Mode, Outcome, RandomCat, RandomInt, RandomReal, RandomSeq, Value,
    };
}
