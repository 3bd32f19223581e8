//! Categorical decisions (`choice`)

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Cardinality, Distribution, Kind, Mode, Value};
use crate::error::{TraceError, TraceResult};

/// Parameters of a `choice(seq)` decision
#[derive(Clone, Debug, PartialEq)]
pub struct CatParams {
    /// Candidate elements, in order (duplicates allowed)
    pub seq: Vec<Value>,
}

/// Categorical decision: one element of `seq`
#[derive(Clone, Debug, PartialEq)]
pub struct RandomCat {
    /// Candidate elements
    pub params: CatParams,
    /// Sampled value (None before sampling)
    pub val: Option<Value>,
    /// Operator regime
    pub mode: Mode,
}

impl RandomCat {
    /// Create a new unsampled categorical decision
    ///
    /// # Panics
    /// Panics if `seq` is empty
    pub fn new(seq: Vec<Value>) -> Self {
        match Self::try_new(seq) {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    /// Try to create a categorical decision
    pub fn try_new(seq: Vec<Value>) -> TraceResult<Self> {
        if seq.is_empty() {
            return Err(TraceError::invalid(Kind::Choice, "cannot choose from an empty sequence"));
        }
        Ok(Self {
            params: CatParams { seq },
            val: None,
            mode: Mode::default(),
        })
    }

    /// Set the value
    pub fn with_value(mut self, val: Value) -> Self {
        self.val = Some(val);
        self
    }

    /// Set the operator regime
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub(crate) fn size(&self) -> Cardinality {
        Cardinality::Finite(self.params.seq.len() as u128)
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Value {
        let idx = rng.gen_range(0..self.params.seq.len());
        let val = self.params.seq[idx].clone();
        self.val = Some(val.clone());
        val
    }

    pub(crate) fn mutated<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut offspring = self.clone();
        let Some(current) = &self.val else {
            offspring.sample(rng);
            return offspring;
        };
        let others: Vec<&Value> = self.params.seq.iter().filter(|v| *v != current).collect();
        if let Some(&next) = others.choose(rng) {
            offspring.val = Some(next.clone());
        }
        offspring
    }

    pub(crate) fn repair<R: Rng + ?Sized>(&mut self, other: &Distribution, rng: &mut R) {
        let Distribution::Cat(old) = other else {
            self.sample(rng);
            return;
        };
        if let Some(old_val) = old.val.as_ref().filter(|v| self.params.seq.contains(v)) {
            self.val = Some(old_val.clone());
            return;
        }
        // prefer values the old trace entry could not have produced
        let unseen: Vec<&Value> = self
            .params
            .seq
            .iter()
            .filter(|v| !old.params.seq.contains(v))
            .collect();
        match unseen.choose(rng) {
            Some(&val) => self.val = Some(val.clone()),
            None => {
                self.sample(rng);
            }
        }
    }
}
