//! Integer decisions (`randint`)

use rand::Rng;

use super::{Cardinality, Distribution, Kind, Mode};
use crate::error::{TraceError, TraceResult};

/// Number of attempts fine mutation makes at finding a different neighbour
const MUTATION_ATTEMPTS: usize = 10;

/// Parameters of a `randint(a, b)` decision
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntParams {
    /// Lower bound (inclusive)
    pub a: i64,
    /// Upper bound (inclusive)
    pub b: i64,
}

/// Integer decision over `[a, b]`
#[derive(Clone, Debug, PartialEq)]
pub struct RandomInt {
    /// Interval bounds
    pub params: IntParams,
    /// Sampled value (None before sampling)
    pub val: Option<i64>,
    /// Operator regime
    pub mode: Mode,
}

impl RandomInt {
    /// Create a new unsampled integer decision
    ///
    /// # Panics
    /// Panics if `a > b`
    pub fn new(a: i64, b: i64) -> Self {
        match Self::try_new(a, b) {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    /// Try to create an integer decision
    pub fn try_new(a: i64, b: i64) -> TraceResult<Self> {
        if a > b {
            return Err(TraceError::invalid(
                Kind::RandInt,
                format!("lower bound {a} exceeds upper bound {b}"),
            ));
        }
        Ok(Self {
            params: IntParams { a, b },
            val: None,
            mode: Mode::default(),
        })
    }

    /// Set the value
    pub fn with_value(mut self, val: i64) -> Self {
        self.val = Some(val);
        self
    }

    /// Set the operator regime
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Distance between the bounds (`b - a`)
    pub fn span(&self) -> i64 {
        self.params.b.saturating_sub(self.params.a)
    }

    pub(crate) fn size(&self) -> Cardinality {
        let count = (i128::from(self.params.b) - i128::from(self.params.a) + 1) as u128;
        Cardinality::Finite(count)
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i64 {
        let val = rng.gen_range(self.params.a..=self.params.b);
        self.val = Some(val);
        val
    }

    /// Round a real-valued candidate onto the integer domain
    fn snap(&self, candidate: f64) -> i64 {
        let lo = self.params.a as f64;
        let hi = self.params.b as f64;
        candidate.round().clamp(lo, hi) as i64
    }

    pub(crate) fn mutated<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut offspring = self.clone();
        let Some(val) = self.val else {
            offspring.sample(rng);
            return offspring;
        };
        for _ in 0..MUTATION_ATTEMPTS {
            let step = if rng.gen_bool(0.5) { 1 } else { -1 };
            let candidate = val.saturating_add(step).clamp(self.params.a, self.params.b);
            offspring.val = Some(candidate);
            if candidate != val {
                break;
            }
        }
        offspring
    }

    pub(crate) fn blended<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        let mut offspring = self.clone();
        match (self.val, other.val) {
            (Some(x), Some(y)) => offspring.val = Some(rng.gen_range(x.min(y)..=x.max(y))),
            (None, Some(y)) => offspring.val = Some(y),
            _ => {}
        }
        offspring
    }

    pub(crate) fn convex_blended<R: Rng + ?Sized>(&self, other1: &Self, other2: &Self, rng: &mut R) -> Self {
        let values: Vec<i64> = [self.val, other1.val, other2.val].into_iter().flatten().collect();
        let mut offspring = self.clone();
        if let (Some(&lo), Some(&hi)) = (values.iter().min(), values.iter().max()) {
            offspring.val = Some(rng.gen_range(lo..=hi));
        }
        offspring
    }

    pub(crate) fn repair<R: Rng + ?Sized>(&mut self, other: &Distribution, rng: &mut R) {
        match other {
            Distribution::Int(old) if old.span() != 0 => match old.val {
                Some(old_val) => {
                    let relative = (old_val as f64 - old.params.a as f64) / old.span() as f64;
                    self.val = Some(self.snap(relative * self.span() as f64 + self.params.a as f64));
                }
                None => {
                    self.sample(rng);
                }
            },
            _ => {
                self.sample(rng);
            }
        }
    }

    pub(crate) fn coarse_distance(&self, other: &Self) -> f64 {
        match (self.val, other.val) {
            (Some(x), Some(y)) => (x as f64 - y as f64).abs(),
            (None, None) => 0.0,
            _ => 1.0,
        }
    }

    pub(crate) fn fine_distance(&self, other: &Self) -> f64 {
        match (self.val, other.val) {
            (Some(_), Some(_)) if self.span() == 0 => 0.0,
            (Some(x), Some(y)) => ((x as f64 - y as f64).abs() / self.span() as f64).min(1.0),
            (None, None) => 0.0,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_try_new_rejects_inverted_bounds() {
        assert!(RandomInt::try_new(5, 1).is_err());
        assert!(RandomInt::try_new(1, 1).is_ok());
    }

    #[test]
    fn test_sample_inclusive_bounds() {
        let mut rng = rand::thread_rng();
        let mut d = RandomInt::new(0, 2);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let v = d.sample(&mut rng);
            assert!((0..=2).contains(&v));
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_fine_mutation_moves_by_one() {
        let mut rng = rand::thread_rng();
        let d = RandomInt::new(0, 100).with_value(50);
        for _ in 0..50 {
            let v = d.mutated(&mut rng).val.unwrap();
            assert!([49, 50, 51].contains(&v));
        }
    }

    #[test]
    fn test_fine_mutation_at_boundary() {
        let mut rng = rand::thread_rng();
        let d = RandomInt::new(0, 10).with_value(0);
        for _ in 0..50 {
            assert_eq!(d.mutated(&mut rng).val, Some(1));
        }
    }

    #[test]
    fn test_fine_mutation_single_value_domain() {
        let mut rng = rand::thread_rng();
        let d = RandomInt::new(3, 3).with_value(3);
        assert_eq!(d.mutated(&mut rng).val, Some(3));
    }

    #[test]
    fn test_blend_between_parents() {
        let mut rng = rand::thread_rng();
        let a = RandomInt::new(0, 100).with_value(70);
        let b = RandomInt::new(0, 100).with_value(20);
        for _ in 0..100 {
            let v = a.blended(&b, &mut rng).val.unwrap();
            assert!((20..=70).contains(&v));
        }
    }

    #[test]
    fn test_repair_proportional_remap() {
        let mut rng = rand::thread_rng();
        let old = Distribution::Int(RandomInt::new(0, 10).with_value(5));
        let mut d = RandomInt::new(0, 100);
        d.repair(&old, &mut rng);
        assert_eq!(d.val, Some(50));

        let old = Distribution::Int(RandomInt::new(0, 3).with_value(3));
        let mut d = RandomInt::new(10, 12);
        d.repair(&old, &mut rng);
        assert_eq!(d.val, Some(12));
    }

    #[test]
    fn test_repair_falls_back_when_old_span_is_zero() {
        let mut rng = rand::thread_rng();
        let old = Distribution::Int(RandomInt::new(7, 7).with_value(7));
        let mut d = RandomInt::new(0, 4);
        d.repair(&old, &mut rng);
        assert!((0..=4).contains(&d.val.unwrap()));
    }

    #[test]
    fn test_fine_distance() {
        let a = RandomInt::new(0, 10).with_value(0);
        let b = RandomInt::new(0, 10).with_value(5);
        assert_relative_eq!(a.fine_distance(&b), 0.5);
        assert_relative_eq!(b.fine_distance(&b), 0.0);

        let flat = RandomInt::new(2, 2).with_value(2);
        assert_relative_eq!(flat.fine_distance(&flat), 0.0);
    }

    #[test]
    fn test_size() {
        assert_eq!(RandomInt::new(-5, 5).size(), Cardinality::Finite(11));
        assert_eq!(
            RandomInt::new(i64::MIN, i64::MAX).size(),
            Cardinality::Finite(u128::from(u64::MAX) + 1)
        );
    }
}
