//! Record/replay controller

use std::ops::{Deref, DerefMut};

use rand::Rng;
use tracing::{debug, trace};

use super::{Trace, TraceKey};
use crate::distribution::{Distribution, Outcome};

/// A phenotype together with the trace that produced it
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<P> {
    /// Whatever the generator returned
    pub pheno: P,
    /// The decisions the generator made, in order
    pub geno: Trace,
}

impl<P> Solution<P> {
    /// Pair a phenotype with its genotype
    pub fn new(pheno: P, geno: Trace) -> Self {
        Self { pheno, geno }
    }
}

/// Record/replay controller for one generator run at a time.
///
/// Inactive, every decision is a plain fresh sample. During [`Tracer::play`]
/// each decision is looked up by key in the input trace and then reused,
/// repaired or freshly sampled, and recorded in the output trace.
///
/// A tracer must not be shared between concurrent searches; each search owns
/// its own.
#[derive(Debug, Default)]
pub struct Tracer {
    active: bool,
    input: Trace,
    output: Trace,
    counter: usize,
}

/// Keeps a tracer active for the duration of one replay
///
/// Dropping the session, on any exit path including unwinding, deactivates
/// the tracer.
struct Session<'a> {
    tracer: &'a mut Tracer,
}

impl<'a> Session<'a> {
    fn begin(tracer: &'a mut Tracer, input: Trace) -> Self {
        tracer.active = true;
        tracer.input = input;
        tracer.output = Trace::new();
        tracer.counter = 0;
        Self { tracer }
    }

    fn finish(self) -> Trace {
        let geno = std::mem::take(&mut self.tracer.output);
        debug!(decisions = geno.len(), "replay finished");
        geno
    }
}

impl Deref for Session<'_> {
    type Target = Tracer;

    fn deref(&self) -> &Tracer {
        self.tracer
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut Tracer {
        self.tracer
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.tracer.active = false;
        self.tracer.input = Trace::new();
    }
}

impl Tracer {
    /// Create an inactive tracer
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a replay is running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run `generator` against `input` and return its phenotype and output trace.
    ///
    /// Panics raised by the generator propagate after the tracer is deactivated.
    pub fn play<P, G>(&mut self, input: Trace, generator: G) -> Solution<P>
    where
        G: FnOnce(&mut Tracer) -> P,
    {
        let mut session = Session::begin(self, input);
        let pheno = generator(&mut *session);
        Solution::new(pheno, session.finish())
    }

    /// Fallible variant of [`Tracer::play`]; the generator's error is returned unchanged
    pub fn try_play<P, E, G>(&mut self, input: Trace, generator: G) -> Result<Solution<P>, E>
    where
        G: FnOnce(&mut Tracer) -> Result<P, E>,
    {
        let mut session = Session::begin(self, input);
        let pheno = generator(&mut *session)?;
        Ok(Solution::new(pheno, session.finish()))
    }

    /// Next auto-assigned key
    fn next_key(&mut self) -> TraceKey {
        let key = TraceKey::Index(self.counter);
        self.counter += 1;
        key
    }

    /// Resolve one decision and return its value.
    ///
    /// A missing `key` is replaced by the next auto-assigned integer key. The
    /// input entry under the key is reused if it matches `dist`, repaired if it
    /// does not, and `dist` is sampled fresh if there is no entry.
    ///
    /// # Panics
    /// Panics if `key` was already used earlier in the same replay.
    pub fn sample<R: Rng + ?Sized>(&mut self, key: Option<TraceKey>, mut dist: Distribution, rng: &mut R) -> Outcome {
        if !self.active {
            return dist.sample(rng);
        }

        let key = key.unwrap_or_else(|| self.next_key());
        if self.output.contains_key(&key) {
            panic!("trace key {key} was issued twice in one replay");
        }
        match self.input.get(&key) {
            Some(prev) if dist.matches(prev) => {
                if dist.adopt(prev) {
                    trace!(key = %key, kind = %dist.kind(), "reused decision");
                } else {
                    debug!(key = %key, kind = %dist.kind(), "input decision unsampled, sampling");
                    dist.sample(rng);
                }
            }
            Some(prev) => {
                debug!(key = %key, kind = %dist.kind(), from = %prev.kind(), "repairing decision");
                dist.repair(prev, rng);
            }
            None => {
                debug!(key = %key, kind = %dist.kind(), "sampling new decision");
                dist.sample(rng);
            }
        }

        let value = match dist.value() {
            Some(value) => value,
            None => dist.sample(rng),
        };
        self.output.insert(key, dist);
        value
    }
}
