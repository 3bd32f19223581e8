//! OneMax
//!
//! Maximise the number of `true` bits in a fixed-length string. The generator
//! is a plain loop of `choice` calls; the operators never see the bits, only
//! the trace of decisions that produced them.

use pto::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const N: usize = 64;

fn generator(rnd: &mut Rnd<'_>) -> Vec<bool> {
    (0..N).map(|_| rnd.choice(&[false, true])).collect()
}

fn fitness(bits: &Vec<bool>) -> f64 {
    bits.iter().filter(|&&b| b).count() as f64
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== OneMax ({N} bits) ===\n");

    let mut rng = StdRng::seed_from_u64(42);

    let mut ops = Operators::new(generator, fitness);
    let hc = HillClimber::new(HillClimberConfig::default().generations(5000))
        .with_termination(TargetFitness::new(N as f64))
        .run(&mut ops, &mut rng)?;

    println!("Hill climber:");
    println!("  Best fitness: {}", hc.fitness);
    println!("  Generations:  {}", hc.generations);
    println!("  Stopped:      {}", hc.termination_reason);

    let ga = GeneticAlgorithm::new(GeneticAlgorithmConfig::default().generations(200))
        .with_termination(TargetFitness::new(N as f64))
        .run(&mut ops, &mut rng)?;

    println!("\nGenetic algorithm:");
    println!("  Best fitness: {}", ga.fitness);
    println!("  Generations:  {}", ga.generations);
    println!("  Evaluations:  {}", ga.evaluations);

    let bits: String = ga.best.pheno.iter().map(|&b| if b { '1' } else { '0' }).collect();
    println!("\nBest string: {bits}");

    Ok(())
}
