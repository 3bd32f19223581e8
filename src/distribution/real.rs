//! Real-valued decisions (`uniform`)

use rand::Rng;
use rand_distr::{Distribution as _, Normal};

use super::{Distribution, Kind, Mode};
use crate::error::{TraceError, TraceResult};

/// Parameters of a `uniform(a, b)` decision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealParams {
    /// Lower bound (inclusive)
    pub a: f64,
    /// Upper bound
    pub b: f64,
}

/// Continuous decision over `[a, b)`
#[derive(Clone, Debug, PartialEq)]
pub struct RandomReal {
    /// Interval bounds
    pub params: RealParams,
    /// Sampled value (None before sampling)
    pub val: Option<f64>,
    /// Operator regime
    pub mode: Mode,
}

impl RandomReal {
    /// Create a new unsampled real decision
    ///
    /// # Panics
    /// Panics if the bounds or their width are not finite, or `a > b`
    pub fn new(a: f64, b: f64) -> Self {
        match Self::try_new(a, b) {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    /// Try to create a real decision, returning an error for unusable bounds
    pub fn try_new(a: f64, b: f64) -> TraceResult<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(TraceError::invalid(
                Kind::Uniform,
                format!("bounds must be finite, got ({a}, {b})"),
            ));
        }
        if a > b {
            return Err(TraceError::invalid(
                Kind::Uniform,
                format!("lower bound {a} exceeds upper bound {b}"),
            ));
        }
        if !(b - a).is_finite() {
            return Err(TraceError::invalid(
                Kind::Uniform,
                format!("interval width overflows, got ({a}, {b})"),
            ));
        }
        Ok(Self {
            params: RealParams { a, b },
            val: None,
            mode: Mode::default(),
        })
    }

    /// Set the value
    pub fn with_value(mut self, val: f64) -> Self {
        self.val = Some(val);
        self
    }

    /// Set the operator regime
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Width of the interval
    pub fn range(&self) -> f64 {
        self.params.b - self.params.a
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let val = self.params.a + rng.gen::<f64>() * self.range();
        self.val = Some(val);
        val
    }

    fn clamp(&self, val: f64) -> f64 {
        val.clamp(self.params.a, self.params.b)
    }

    pub(crate) fn mutated<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut offspring = self.clone();
        let Some(val) = self.val else {
            offspring.sample(rng);
            return offspring;
        };
        let sigma = 0.1 * self.range();
        let noise = match Normal::new(0.0, sigma) {
            Ok(normal) if sigma > 0.0 => normal.sample(rng),
            _ => 0.0,
        };
        offspring.val = Some(self.clamp(val + noise));
        offspring
    }

    pub(crate) fn blended<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        let mut offspring = self.clone();
        match (self.val, other.val) {
            (Some(x), Some(y)) => offspring.val = Some(x + rng.gen::<f64>() * (y - x)),
            (None, Some(y)) => offspring.val = Some(y),
            _ => {}
        }
        offspring
    }

    pub(crate) fn convex_blended<R: Rng + ?Sized>(&self, other1: &Self, other2: &Self, rng: &mut R) -> Self {
        let values: Vec<f64> = [self.val, other1.val, other2.val].into_iter().flatten().collect();
        let mut offspring = self.clone();
        if values.is_empty() {
            return offspring;
        }
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        offspring.val = Some(lo + rng.gen::<f64>() * (hi - lo));
        offspring
    }

    pub(crate) fn repair<R: Rng + ?Sized>(&mut self, other: &Distribution, rng: &mut R) {
        match other {
            Distribution::Real(old) if old.range() != 0.0 => match old.val {
                Some(old_val) => {
                    let relative = (old_val - old.params.a) / old.range();
                    self.val = Some(self.clamp(relative * self.range() + self.params.a));
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
            (Some(x), Some(y)) => (x - y).abs(),
            (None, None) => 0.0,
            _ => 1.0,
        }
    }

    pub(crate) fn fine_distance(&self, other: &Self) -> f64 {
        match (self.val, other.val) {
            (Some(_), Some(_)) if self.range() == 0.0 => 0.0,
            (Some(x), Some(y)) => ((x - y).abs() / self.range()).min(1.0),
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
    fn test_try_new_rejects_bad_bounds() {
        assert!(RandomReal::try_new(1.0, 0.0).is_err());
        assert!(RandomReal::try_new(0.0, f64::INFINITY).is_err());
        assert!(RandomReal::try_new(f64::NAN, 1.0).is_err());
        assert!(RandomReal::try_new(2.0, 2.0).is_ok());
    }

    #[test]
    fn test_try_new_rejects_overflowing_width() {
        let err = RandomReal::try_new(-1e308, 1e308).unwrap_err();
        assert!(err.to_string().contains("width overflows"));
        assert!(RandomReal::try_new(f64::MIN, 0.0).is_ok());
        assert!(RandomReal::try_new(f64::MIN, f64::MAX).is_err());
    }

    #[test]
    #[should_panic(expected = "lower bound")]
    fn test_new_panics_on_inverted_bounds() {
        let _ = RandomReal::new(3.0, 1.0);
    }

    #[test]
    fn test_sample_in_range() {
        let mut rng = rand::thread_rng();
        let mut d = RandomReal::new(-2.0, 3.0);
        for _ in 0..200 {
            let v = d.sample(&mut rng);
            assert!((-2.0..3.0).contains(&v));
            assert_eq!(d.val, Some(v));
        }
    }

    #[test]
    fn test_fine_mutation_clamped() {
        let mut rng = rand::thread_rng();
        let d = RandomReal::new(0.0, 1.0).with_value(1.0);
        for _ in 0..200 {
            let v = d.mutated(&mut rng).val.unwrap();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_fine_mutation_zero_range_is_noop() {
        let mut rng = rand::thread_rng();
        let d = RandomReal::new(4.0, 4.0).with_value(4.0);
        assert_eq!(d.mutated(&mut rng).val, Some(4.0));
    }

    #[test]
    fn test_blend_between_parents() {
        let mut rng = rand::thread_rng();
        let a = RandomReal::new(0.0, 10.0).with_value(8.0);
        let b = RandomReal::new(0.0, 10.0).with_value(2.0);
        for _ in 0..100 {
            let v = a.blended(&b, &mut rng).val.unwrap();
            assert!((2.0..=8.0).contains(&v));
        }
    }

    #[test]
    fn test_repair_proportional_remap() {
        let mut rng = rand::thread_rng();
        let old = Distribution::Real(RandomReal::new(0.0, 10.0).with_value(2.5));
        let mut d = RandomReal::new(100.0, 200.0);
        d.repair(&old, &mut rng);
        assert_relative_eq!(d.val.unwrap(), 125.0);
    }

    #[test]
    fn test_repair_falls_back_when_old_range_is_zero() {
        let mut rng = rand::thread_rng();
        let old = Distribution::Real(RandomReal::new(5.0, 5.0).with_value(5.0));
        let mut d = RandomReal::new(0.0, 1.0);
        d.repair(&old, &mut rng);
        assert!((0.0..1.0).contains(&d.val.unwrap()));
    }

    #[test]
    fn test_repair_falls_back_across_kinds() {
        let mut rng = rand::thread_rng();
        let old = Distribution::Int(crate::distribution::RandomInt::new(0, 10).with_value(10));
        let mut d = RandomReal::new(0.0, 1.0);
        d.repair(&old, &mut rng);
        assert!((0.0..1.0).contains(&d.val.unwrap()));
    }

    #[test]
    fn test_fine_distance() {
        let zero = RandomReal::new(0.0, 10.0).with_value(0.0);
        let ten = RandomReal::new(0.0, 10.0).with_value(10.0);
        let five = RandomReal::new(0.0, 10.0).with_value(5.0);
        assert_relative_eq!(zero.fine_distance(&ten), 1.0);
        assert_relative_eq!(zero.fine_distance(&five), 0.5);
        assert_relative_eq!(five.fine_distance(&five), 0.0);

        let flat = RandomReal::new(1.0, 1.0).with_value(1.0);
        assert_relative_eq!(flat.fine_distance(&flat), 0.0);
    }
}
