//! Sphere function
//!
//! Minimise the sum of squares over a real vector drawn with `uniform`.
//! Compares the three solvers on the same evaluation budget.

use pto::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DIM: usize = 10;

fn generator(rnd: &mut Rnd<'_>) -> Vec<f64> {
    (0..DIM).map(|_| rnd.uniform(-5.12, 5.12)).collect()
}

fn sphere(x: &Vec<f64>) -> f64 {
    x.iter().map(|v| v * v).sum()
}

fn report(name: &str, result: &SearchResult<Vec<f64>>) {
    println!("{name}:");
    println!("  Best fitness: {:.6}", result.fitness);
    println!("  Evaluations:  {}", result.evaluations);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Sphere Function ({DIM} dimensions) ===\n");

    let budget = 5000;
    let mut rng = StdRng::seed_from_u64(42);
    let mut ops = Operators::new(generator, sphere);

    let rs = RandomSearch::new(RandomSearchConfig {
        generations: budget,
        objective: Objective::Minimize,
    })
    .run(&mut ops, &mut rng)?;
    report("Random search", &rs);

    let hc_config = HillClimberConfig::default()
        .generations(budget)
        .objective(Objective::Minimize);
    let hc = HillClimber::new(hc_config).run(&mut ops, &mut rng)?;
    report("Hill climber", &hc);

    let ga_config = GeneticAlgorithmConfig::default()
        .population_size(50)
        .generations(budget / 50)
        .crossover(CrossoverKind::Uniform)
        .objective(Objective::Minimize);
    let ga = GeneticAlgorithm::new(ga_config)
        .with_termination(MaxEvaluations::new(budget))
        .run(&mut ops, &mut rng)?;
    report("Genetic algorithm", &ga);

    println!("\nBest solution:");
    for (i, val) in ga.best.pheno.iter().enumerate() {
        println!("  x[{i}] = {val:.6}");
    }

    Ok(())
}
