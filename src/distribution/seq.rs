//! Sequence decisions (`sample`)
//!
//! A `sample(seq, k)` decision is an ordered selection of `k` positions of
//! `seq` without replacement. Its fine operators are all built on one
//! alignment pass that walks the value towards a target value using two edits:
//!
//! - **swap**: the target element sits further right in the value; swap it in
//! - **replacement**: the target element is in the pool (elements of `seq`
//!   not currently used); exchange it with the element at this position
//!
//! Both edits preserve the invariant that the value plus the pool is exactly
//! the multiset `seq`.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Cardinality, Distribution, Kind, Mode, Value};
use crate::error::{TraceError, TraceResult};

/// Parameters of a `sample(seq, k)` decision
#[derive(Clone, Debug, PartialEq)]
pub struct SeqParams {
    /// Population to draw from (duplicates allowed)
    pub seq: Vec<Value>,
    /// Number of elements drawn
    pub k: usize,
}

/// Sequence decision: `k` distinct positions of `seq`, in order
#[derive(Clone, Debug, PartialEq)]
pub struct RandomSeq {
    /// Population and selection size
    pub params: SeqParams,
    /// Sampled value (None before sampling)
    pub val: Option<Vec<Value>>,
    /// Operator regime
    pub mode: Mode,
}

/// Edits performed by one alignment pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlignStats {
    /// Positions fixed by swapping within the value
    pub swaps: usize,
    /// Positions fixed by exchanging with the pool
    pub replacements: usize,
    /// Positions left different from the target
    pub unresolved: usize,
}

impl AlignStats {
    /// Number of edits actually performed
    pub fn edits(&self) -> usize {
        self.swaps + self.replacements
    }
}

/// Walk `value` towards `target` over positions `0..upto`.
///
/// `pool` must hold the elements of the source sequence not present in
/// `value`; it is kept consistent with every replacement.
pub fn align(value: &mut [Value], pool: &mut Vec<Value>, target: &[Value], upto: usize) -> AlignStats {
    let mut stats = AlignStats::default();
    let upto = upto.min(value.len()).min(target.len());

    for i in 0..upto {
        let wanted = &target[i];
        if value[i] == *wanted {
            continue;
        }
        if let Some(j) = (i + 1..value.len()).find(|&j| value[j] == *wanted) {
            value.swap(i, j);
            stats.swaps += 1;
        } else if let Some(p) = pool.iter().position(|v| v == wanted) {
            let incoming = pool.remove(p);
            let displaced = std::mem::replace(&mut value[i], incoming);
            pool.push(displaced);
            stats.replacements += 1;
        } else {
            stats.unresolved += 1;
        }
    }

    stats
}

impl RandomSeq {
    /// Create a new unsampled sequence decision
    ///
    /// # Panics
    /// Panics if `k` exceeds the length of `seq`
    pub fn new(seq: Vec<Value>, k: usize) -> Self {
        match Self::try_new(seq, k) {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    /// Try to create a sequence decision
    pub fn try_new(seq: Vec<Value>, k: usize) -> TraceResult<Self> {
        if k > seq.len() {
            return Err(TraceError::invalid(
                Kind::Sample,
                format!("k = {k} exceeds population of {}", seq.len()),
            ));
        }
        Ok(Self {
            params: SeqParams { seq, k },
            val: None,
            mode: Mode::default(),
        })
    }

    /// Set the value
    pub fn with_value(mut self, val: Vec<Value>) -> Self {
        self.val = Some(val);
        self
    }

    /// Set the operator regime
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Elements of `seq` not used by the current value (multiset difference)
    pub fn pool(&self) -> Vec<Value> {
        let mut pool = self.params.seq.clone();
        for used in self.val.iter().flatten() {
            if let Some(p) = pool.iter().position(|v| v == used) {
                pool.remove(p);
            }
        }
        pool
    }

    /// Number of k-permutations of `seq` (saturating)
    pub(crate) fn size(&self) -> Cardinality {
        let n = self.params.seq.len() as u128;
        let count = (0..self.params.k as u128).fold(1u128, |acc, i| acc.saturating_mul(n - i));
        Cardinality::Finite(count)
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Value> {
        let mut shuffled = self.params.seq.clone();
        let (chosen, _) = shuffled.partial_shuffle(rng, self.params.k);
        let val = chosen.to_vec();
        self.val = Some(val.clone());
        val
    }

    pub(crate) fn mutated<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut offspring = self.clone();
        if offspring.val.is_none() {
            offspring.sample(rng);
            return offspring;
        }
        let mut pool = self.pool();
        let Some(val) = offspring.val.as_mut() else {
            return offspring;
        };

        let replace = |val: &mut Vec<Value>, pool: &mut Vec<Value>, rng: &mut R| {
            let i = rng.gen_range(0..val.len());
            let p = rng.gen_range(0..pool.len());
            std::mem::swap(&mut val[i], &mut pool[p]);
        };

        if val.len() < 2 {
            if !val.is_empty() && !pool.is_empty() {
                replace(val, &mut pool, rng);
            }
        } else if pool.is_empty() || rng.gen_bool(0.5) {
            let i = rng.gen_range(0..val.len());
            let mut j = rng.gen_range(0..val.len() - 1);
            if j >= i {
                j += 1;
            }
            val.swap(i, j);
        } else {
            replace(val, &mut pool, rng);
        }
        offspring
    }

    pub(crate) fn aligned_prefix<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        let mut offspring = self.clone();
        let mut pool = self.pool();
        if let (Some(val), Some(target)) = (offspring.val.as_mut(), other.val.as_ref()) {
            let overlap = val.len().min(target.len());
            if overlap > 0 {
                let cut = rng.gen_range(0..overlap);
                align(val, &mut pool, target, cut);
            }
        }
        offspring
    }

    pub(crate) fn repair<R: Rng + ?Sized>(&mut self, other: &Distribution, rng: &mut R) {
        self.sample(rng);
        let Distribution::Seq(old) = other else {
            return;
        };
        let mut pool = self.pool();
        if let (Some(val), Some(target)) = (self.val.as_mut(), old.val.as_ref()) {
            align(val, &mut pool, target, usize::MAX);
        }
    }

    pub(crate) fn coarse_distance(&self, other: &Self) -> f64 {
        match (&self.val, &other.val) {
            (Some(a), Some(b)) => {
                let mismatches = a.iter().zip(b).filter(|(x, y)| x != y).count();
                (mismatches + a.len().abs_diff(b.len())) as f64
            }
            (None, None) => 0.0,
            _ => 1.0,
        }
    }

    pub(crate) fn fine_distance(&self, other: &Self) -> f64 {
        match (&self.val, &other.val) {
            (Some(a), Some(b)) => {
                let mut working = a.clone();
                let mut pool = self.pool();
                let stats = align(&mut working, &mut pool, b, usize::MAX);
                (stats.edits() + a.len().abs_diff(b.len())) as f64
            }
            (None, None) => 0.0,
            _ => 1.0,
        }
    }
}
