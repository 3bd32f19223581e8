//! Property-based tests for pto
//!
//! Uses proptest to verify invariants of decisions, traces and operators.

use pto::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn ints(n: i64) -> Vec<Value> {
    (0..n).map(Value::Int).collect()
}

fn as_ints(values: &[Value]) -> Vec<i64> {
    values
        .iter()
        .map(|v| match v {
            Value::Int(i) => *i,
            _ => -1,
        })
        .collect()
}

/// True if `val` uses each element of `seq` at most as often as `seq` holds it
fn sub_multiset(val: &[Value], seq: &[Value]) -> bool {
    let mut remaining = seq.to_vec();
    val.iter().all(|v| match remaining.iter().position(|r| r == v) {
        Some(p) => {
            remaining.remove(p);
            true
        }
        None => false,
    })
}

fn seq_value(dist: &Distribution) -> Vec<Value> {
    match dist.value() {
        Some(Outcome::Seq(values)) => values,
        _ => Vec::new(),
    }
}

fn mixed_generator(rnd: &mut Rnd<'_>) -> (f64, i64, Vec<i64>) {
    let x = rnd.uniform(-5.0, 5.0);
    let n = rnd.randint(1, 6);
    let items: Vec<i64> = (0..n).map(|_| rnd.randint(0, 9)).collect();
    (x, n, items)
}

fn mixed_fitness(p: &(f64, i64, Vec<i64>)) -> f64 {
    p.0 + p.2.iter().sum::<i64>() as f64
}

proptest! {
    // ==================== Distribution Properties ====================

    #[test]
    fn real_sample_within_bounds(a in -100.0..100.0f64, width in 0.0..50.0f64, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut dist = Distribution::from(RandomReal::new(a, a + width));
        match dist.sample(&mut rng) {
            Outcome::Real(x) => prop_assert!(x >= a && x <= a + width),
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn int_mutation_stays_in_domain(a in -50i64..50, span in 0i64..20, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut dist = Distribution::from(RandomInt::new(a, a + span));
        dist.sample(&mut rng);
        for mode in [Mode::Coarse, Mode::Fine] {
            let mutant = dist.clone().with_mode(mode).mutation(&mut rng);
            prop_assert!(mutant.matches(&dist));
            match mutant.value() {
                Some(Outcome::Int(v)) => prop_assert!(v >= a && v <= a + span),
                other => prop_assert!(false, "unexpected value {:?}", other),
            }
        }
    }

    #[test]
    fn seq_sample_draws_distinct_positions(n in 1i64..15, k_frac in 0.0..=1.0f64, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let k = ((n as f64) * k_frac).floor() as usize;
        let mut dist = Distribution::from(RandomSeq::new(ints(n), k));
        match dist.sample(&mut rng) {
            Outcome::Seq(values) => {
                prop_assert_eq!(values.len(), k);
                let mut seen = as_ints(&values);
                seen.sort_unstable();
                seen.dedup();
                prop_assert_eq!(seen.len(), k);
                prop_assert!(seen.iter().all(|i| (0..n).contains(i)));
            }
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn seq_mutation_keeps_a_valid_selection(n in 2i64..12, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let k = (n / 2) as usize;
        let mut dist = Distribution::from(RandomSeq::new(ints(n), k));
        dist.sample(&mut rng);
        for mode in [Mode::Coarse, Mode::Fine] {
            let mutant = dist.clone().with_mode(mode).mutation(&mut rng);
            match mutant.value() {
                Some(Outcome::Seq(values)) => {
                    let mut seen = as_ints(&values);
                    seen.sort_unstable();
                    seen.dedup();
                    prop_assert_eq!(seen.len(), k);
                }
                other => prop_assert!(false, "unexpected value {:?}", other),
            }
        }
    }

    #[test]
    fn seq_fine_repair_and_crossover_stay_in_seq(
        seq in prop::collection::vec(0i64..4, 1..10),
        old_seq in prop::collection::vec(0i64..4, 1..10),
        k_frac in 0.0..=1.0f64,
        old_k_frac in 0.0..=1.0f64,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let seq: Vec<Value> = seq.into_iter().map(Value::Int).collect();
        let old_seq: Vec<Value> = old_seq.into_iter().map(Value::Int).collect();
        let k = ((seq.len() as f64) * k_frac).floor() as usize;
        let old_k = ((old_seq.len() as f64) * old_k_frac).floor() as usize;

        let mut old = Distribution::from(RandomSeq::new(old_seq, old_k));
        old.sample(&mut rng);
        let mut repaired = Distribution::from(RandomSeq::new(seq.clone(), k));
        repaired.repair(&old, &mut rng);
        let val = seq_value(&repaired);
        prop_assert_eq!(val.len(), k);
        prop_assert!(sub_multiset(&val, &seq));

        let mut a = Distribution::from(RandomSeq::new(seq.clone(), k));
        let mut b = Distribution::from(RandomSeq::new(seq.clone(), k));
        a.sample(&mut rng);
        b.sample(&mut rng);
        let child = a.crossover(&b, &mut rng);
        let val = seq_value(&child);
        prop_assert_eq!(val.len(), k);
        prop_assert!(sub_multiset(&val, &seq));
    }

    #[test]
    fn distance_to_self_is_zero(seed in any::<u64>(), fine in any::<bool>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mode = if fine { Mode::Fine } else { Mode::Coarse };
        let mut dists = vec![
            Distribution::from(RandomReal::new(0.0, 3.0)),
            Distribution::from(RandomInt::new(-4, 4)),
            Distribution::from(RandomCat::new(ints(5))),
            Distribution::from(RandomSeq::new(ints(6), 4)),
        ];
        for dist in dists.iter_mut() {
            dist.set_mode(mode);
            dist.sample(&mut rng);
            let copy = dist.clone();
            prop_assert_eq!(dist.distance(&copy), 0.0);
        }
    }

    #[test]
    fn repair_lands_in_new_domain(old_b in 1i64..100, new_b in 0i64..100, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut old = Distribution::from(RandomInt::new(0, old_b));
        old.sample(&mut rng);
        let mut new = Distribution::from(RandomInt::new(0, new_b));
        new.repair(&old, &mut rng);
        match new.value() {
            Some(Outcome::Int(v)) => prop_assert!((0..=new_b).contains(&v)),
            other => prop_assert!(false, "unexpected value {:?}", other),
        }
    }

    // ==================== Trace Properties ====================

    #[test]
    fn union_holds_every_key(left in prop::collection::vec(0usize..20, 0..10), right in prop::collection::vec(0usize..20, 0..10)) {
        let build = |keys: &[usize]| -> Trace {
            keys.iter()
                .map(|&k| (TraceKey::Index(k), Distribution::from(RandomInt::new(0, 1))))
                .collect()
        };
        let a = build(&left);
        let b = build(&right);
        let union = a.union(&b);
        for key in a.keys().chain(b.keys()) {
            prop_assert!(union.contains_key(key));
        }
        prop_assert!(union.len() <= a.len() + b.len());
    }

    // ==================== Operator Properties ====================

    #[test]
    fn replay_is_deterministic(seed in any::<u64>(), fine in any::<bool>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mode = if fine { Mode::Fine } else { Mode::Coarse };
        let mut ops = Operators::new(mixed_generator, mixed_fitness).with_mode(mode);
        let sol = ops.create_ind(&mut rng);
        let replayed = ops.fix_ind(sol.geno.clone(), &mut rng);
        prop_assert_eq!(&replayed.pheno, &sol.pheno);
        prop_assert_eq!(&replayed.geno, &sol.geno);
        prop_assert_eq!(ops.distance_ind(&sol, &replayed), 0.0);
    }

    #[test]
    fn operator_outputs_are_valid_generator_outputs(seed in any::<u64>(), fine in any::<bool>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mode = if fine { Mode::Fine } else { Mode::Coarse };
        let mut ops = Operators::new(mixed_generator, mixed_fitness).with_mode(mode);
        let p1 = ops.create_ind(&mut rng);
        let p2 = ops.create_ind(&mut rng);

        let children = [
            ops.mutate_point_ind(&p1, &mut rng),
            ops.mutate_position_wise_ind(&p1, &mut rng),
            ops.crossover_uniform_ind(&p1, &p2, &mut rng),
            ops.crossover_one_point_ind(&p1, &p2, &mut rng),
        ];
        for child in &children {
            let (x, n, items) = &child.pheno;
            prop_assert!((-5.0..=5.0).contains(x));
            prop_assert!((1..=6).contains(n));
            prop_assert_eq!(items.len() as i64, *n);
            prop_assert!(items.iter().all(|i| (0..=9).contains(i)));
            prop_assert_eq!(child.geno.len(), 2 + items.len());
        }
    }

    #[test]
    fn distance_is_symmetric_on_shared_structure(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ops = Operators::new(
            |rnd: &mut Rnd<'_>| (0..8).map(|_| rnd.randint(0, 10)).collect::<Vec<_>>(),
            |xs: &Vec<i64>| xs.iter().sum::<i64>() as f64,
        )
        .with_mode(Mode::Coarse);
        let a = ops.create_ind(&mut rng);
        let b = ops.create_ind(&mut rng);
        let d1 = ops.distance_ind(&a, &b);
        let d2 = ops.distance_ind(&b, &a);
        prop_assert!((d1 - d2).abs() < 1e-9);
    }
}
