//! Primitive bindings
//!
//! [`Rnd`] is the only source of randomness a generator may use. Each call
//! builds the matching [`Distribution`], asks the naming strategy for a key and
//! hands both to the [`Tracer`], which decides whether the value is reused,
//! repaired or freshly sampled.
//!
//! ```rust,ignore
//! use pto::prelude::*;
//!
//! fn route(rnd: &mut Rnd<'_>) -> Vec<usize> {
//!     let mut cities: Vec<usize> = (0..10).collect();
//!     rnd.shuffle(&mut cities);
//!     cities
//! }
//! ```

pub mod naming;

use rand::RngCore;

use crate::distribution::{Distribution, Kind, Mode, Outcome, RandomCat, RandomInt, RandomReal, RandomSeq, Value};
use crate::trace::{TraceKey, Tracer};

pub use naming::{KeyStrategy, LinearKeys, ScopedKeys};

static LINEAR_KEYS: LinearKeys = LinearKeys;

/// Types that can be drawn by `choice`, `sample` and `shuffle`
pub trait Element: Clone {
    /// Trace representation of this element
    fn to_value(&self) -> Value;
}

macro_rules! impl_element_int {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

impl_element_int!(i8, i16, i32, i64, u8, u16, u32);

impl Element for usize {
    fn to_value(&self) -> Value {
        match i64::try_from(*self) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Text(self.to_string()),
        }
    }
}

impl Element for u64 {
    fn to_value(&self) -> Value {
        match i64::try_from(*self) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Text(self.to_string()),
        }
    }
}

impl Element for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Element for f64 {
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }
}

impl Element for f32 {
    fn to_value(&self) -> Value {
        Value::Real(f64::from(*self))
    }
}

impl Element for char {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl Element for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl Element for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl Element for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: Element> Element for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Element::to_value).collect())
    }
}

/// Random primitives bound to one tracer and one random source.
///
/// Every primitive has an `*_at` variant taking an explicit trace key. Bad
/// parameters (`randint(5, 1)`, `choice(&[])`, `sample(seq, k > len)`) panic.
pub struct Rnd<'a> {
    tracer: &'a mut Tracer,
    rng: &'a mut dyn RngCore,
    mode: Mode,
    keys: &'a dyn KeyStrategy,
    path: Vec<TraceKey>,
    ordinals: Vec<usize>,
}

impl<'a> Rnd<'a> {
    /// Bind to a tracer with fine operators and linear keys
    pub fn new(tracer: &'a mut Tracer, rng: &'a mut dyn RngCore) -> Self {
        Self {
            tracer,
            rng,
            mode: Mode::default(),
            keys: &LINEAR_KEYS,
            path: Vec::new(),
            ordinals: vec![0],
        }
    }

    /// Set the operator regime attached to every decision
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the naming strategy
    pub fn with_keys(mut self, keys: &'a dyn KeyStrategy) -> Self {
        self.keys = keys;
        self
    }

    /// Operator regime attached to every decision
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Real value in `[a, b)`
    pub fn uniform(&mut self, a: f64, b: f64) -> f64 {
        self.uniform_keyed(None, a, b)
    }

    /// [`Rnd::uniform`] under an explicit key
    pub fn uniform_at(&mut self, key: impl Into<TraceKey>, a: f64, b: f64) -> f64 {
        self.uniform_keyed(Some(key.into()), a, b)
    }

    /// Integer value in `[a, b]`
    pub fn randint(&mut self, a: i64, b: i64) -> i64 {
        self.randint_keyed(None, a, b)
    }

    /// [`Rnd::randint`] under an explicit key
    pub fn randint_at(&mut self, key: impl Into<TraceKey>, a: i64, b: i64) -> i64 {
        self.randint_keyed(Some(key.into()), a, b)
    }

    /// One element of `seq`
    pub fn choice<T: Element>(&mut self, seq: &[T]) -> T {
        self.choice_keyed(None, seq)
    }

    /// [`Rnd::choice`] under an explicit key
    pub fn choice_at<T: Element>(&mut self, key: impl Into<TraceKey>, seq: &[T]) -> T {
        self.choice_keyed(Some(key.into()), seq)
    }

    /// `k` elements of `seq` without replacement, in random order
    pub fn sample<T: Element>(&mut self, seq: &[T], k: usize) -> Vec<T> {
        self.sample_keyed(None, seq, k)
    }

    /// [`Rnd::sample`] under an explicit key
    pub fn sample_at<T: Element>(&mut self, key: impl Into<TraceKey>, seq: &[T], k: usize) -> Vec<T> {
        self.sample_keyed(Some(key.into()), seq, k)
    }

    /// Permute `items` in place through one traced `sample(items, len)` decision
    pub fn shuffle<T: Element>(&mut self, items: &mut [T]) {
        let permuted = self.sample(&*items, items.len());
        items.clone_from_slice(&permuted);
    }

    /// Run `body` inside a named scope.
    ///
    /// Scopes nest; the naming strategy sees the labels of all enclosing scopes
    /// and an ordinal that restarts at zero in every scope. Sibling scopes
    /// therefore need distinct labels (include the loop index); reusing one
    /// within a replay issues the same key twice and panics.
    pub fn scope<T>(&mut self, label: impl Into<TraceKey>, body: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(label.into());
        self.ordinals.push(0);
        let out = body(self);
        self.ordinals.pop();
        self.path.pop();
        out
    }

    fn draw(&mut self, explicit: Option<TraceKey>, dist: Distribution) -> Outcome {
        let ordinal = match self.ordinals.last_mut() {
            Some(next) => {
                *next += 1;
                *next - 1
            }
            None => 0,
        };
        let key = self.keys.key(&self.path, explicit, dist.kind(), ordinal);
        self.tracer.sample(key, dist.with_mode(self.mode), &mut *self.rng)
    }

    fn uniform_keyed(&mut self, key: Option<TraceKey>, a: f64, b: f64) -> f64 {
        match self.draw(key, RandomReal::new(a, b).into()) {
            Outcome::Real(x) => x,
            other => kind_mismatch(Kind::Uniform, &other),
        }
    }

    fn randint_keyed(&mut self, key: Option<TraceKey>, a: i64, b: i64) -> i64 {
        match self.draw(key, RandomInt::new(a, b).into()) {
            Outcome::Int(i) => i,
            other => kind_mismatch(Kind::RandInt, &other),
        }
    }

    fn choice_keyed<T: Element>(&mut self, key: Option<TraceKey>, seq: &[T]) -> T {
        let values: Vec<Value> = seq.iter().map(Element::to_value).collect();
        match self.draw(key, RandomCat::new(values.clone()).into()) {
            Outcome::Cat(v) => {
                let mut used = vec![false; values.len()];
                seq[position_of(&values, &mut used, &v)].clone()
            }
            other => kind_mismatch(Kind::Choice, &other),
        }
    }

    fn sample_keyed<T: Element>(&mut self, key: Option<TraceKey>, seq: &[T], k: usize) -> Vec<T> {
        let values: Vec<Value> = seq.iter().map(Element::to_value).collect();
        match self.draw(key, RandomSeq::new(values.clone(), k).into()) {
            Outcome::Seq(drawn) => {
                let mut used = vec![false; values.len()];
                drawn
                    .iter()
                    .map(|v| seq[position_of(&values, &mut used, v)].clone())
                    .collect()
            }
            other => kind_mismatch(Kind::Sample, &other),
        }
    }
}

/// First unused position of `value` in `values`; marks it used
fn position_of(values: &[Value], used: &mut [bool], value: &Value) -> usize {
    match (0..values.len()).find(|&i| !used[i] && values[i] == *value) {
        Some(i) => {
            used[i] = true;
            i
        }
        None => panic!("traced value {value} is not drawn from the sequence it was recorded for"),
    }
}

fn kind_mismatch(kind: Kind, outcome: &Outcome) -> ! {
    panic!("{kind} decision resolved to a value of another kind: {outcome:?}")
}

pub mod prelude {
    pub use super::naming::{KeyStrategy, LinearKeys, ScopedKeys};
    pub use super::{Element, Rnd};
}
