//! Travelling salesman
//!
//! A tour is one traced `shuffle`. Fine-mode operators act on the permutation
//! by alignment, coarse-mode operators resample or pick whole decisions; the
//! demo runs the same genetic algorithm in both regimes.

use pto::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cities(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| (rng.gen::<f64>() * 100.0, rng.gen::<f64>() * 100.0)).collect()
}

fn tour_length(cities: &[(f64, f64)], order: &[usize]) -> f64 {
    (0..order.len())
        .map(|i| {
            let (x1, y1) = cities[order[i]];
            let (x2, y2) = cities[order[(i + 1) % order.len()]];
            ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
        })
        .sum()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let map = cities(20, 7);
    println!("=== TSP ({} cities) ===\n", map.len());

    for mode in [Mode::Coarse, Mode::Fine] {
        let mut rng = StdRng::seed_from_u64(42);

        let n = map.len();
        let generator = move |rnd: &mut Rnd<'_>| {
            let mut order: Vec<usize> = (0..n).collect();
            rnd.shuffle(&mut order);
            order
        };
        let fitness = |order: &Vec<usize>| tour_length(&map, order);

        let mut ops = Operators::new(generator, fitness).with_mode(mode);
        let config = GeneticAlgorithmConfig::default()
            .population_size(60)
            .generations(300)
            .objective(Objective::Minimize);
        let result = GeneticAlgorithm::new(config)
            .with_termination(AnyOf::new(vec![Box::new(FitnessStagnation::new(60, 1e-9))]).or(MaxEvaluations::new(15_000)))
            .run(&mut ops, &mut rng)?;

        println!("{mode} mode:");
        println!("  Initial best: {:.2}", result.history[0]);
        println!("  Final best:   {:.2}", result.fitness);
        println!("  Generations:  {}", result.generations);
        println!("  Stopped:      {}", result.termination_reason);
        println!("  Tour:         {:?}\n", result.best.pheno);
    }

    Ok(())
}
