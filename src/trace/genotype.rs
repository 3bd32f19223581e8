//! Ordered trace storage
//!
//! A [`Trace`] maps keys to decisions and remembers insertion order, which is
//! the order in which the generator made its decisions. One-point crossover
//! and the key alignment of all crossovers depend on that order.

use std::collections::HashMap;

use super::TraceKey;
use crate::distribution::Distribution;

/// Ordered mapping from trace key to decision (the genotype)
#[derive(Clone, Debug, Default)]
pub struct Trace {
    entries: Vec<(TraceKey, Distribution)>,
    index: HashMap<TraceKey, usize>,
}

impl Trace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of decisions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the trace holds no decisions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a decision is stored under `key`
    pub fn contains_key(&self, key: &TraceKey) -> bool {
        self.index.contains_key(key)
    }

    /// Decision stored under `key`
    pub fn get(&self, key: &TraceKey) -> Option<&Distribution> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Mutable access to the decision stored under `key`
    pub fn get_mut(&mut self, key: &TraceKey) -> Option<&mut Distribution> {
        let i = *self.index.get(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Store a decision.
    ///
    /// An existing key keeps its position and the previous decision is returned;
    /// a new key is appended.
    pub fn insert(&mut self, key: TraceKey, dist: Distribution) -> Option<Distribution> {
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, dist));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, dist));
        None
    }

    /// Keys in decision order
    pub fn keys(&self) -> impl Iterator<Item = &TraceKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Decisions in decision order
    pub fn values(&self) -> impl Iterator<Item = &Distribution> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Entries in decision order
    pub fn iter(&self) -> impl Iterator<Item = (&TraceKey, &Distribution)> {
        self.entries.iter().map(|(k, d)| (k, d))
    }

    /// Union of two traces.
    ///
    /// Keys keep `self`'s order followed by keys only `other` has; on a key
    /// collision `other`'s decision wins.
    pub fn union(&self, other: &Trace) -> Trace {
        let mut merged = self.clone();
        for (key, dist) in other.iter() {
            merged.insert(key.clone(), dist.clone());
        }
        merged
    }

    /// Keys present in both traces, in `self`'s order
    pub fn common_keys(&self, other: &Trace) -> Vec<TraceKey> {
        self.keys().filter(|k| other.contains_key(k)).cloned().collect()
    }
}

impl PartialEq for Trace {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(TraceKey, Distribution)> for Trace {
    fn from_iter<I: IntoIterator<Item = (TraceKey, Distribution)>>(iter: I) -> Self {
        let mut trace = Trace::new();
        trace.extend(iter);
        trace
    }
}

impl Extend<(TraceKey, Distribution)> for Trace {
    fn extend<I: IntoIterator<Item = (TraceKey, Distribution)>>(&mut self, iter: I) {
        for (key, dist) in iter {
            self.insert(key, dist);
        }
    }
}

impl IntoIterator for Trace {
    type Item = (TraceKey, Distribution);
    type IntoIter = std::vec::IntoIter<(TraceKey, Distribution)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
