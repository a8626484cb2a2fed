use evotrader::config::evolution::{CrossoverMethod, EvolutionConfig, SelectionStrategy};
use evotrader::config::fitness::FitnessConfig;
use evotrader::engines::evaluation::GenomeEvaluator;
use evotrader::engines::evolution::{ConsoleObserver, EvolutionEngine};
use evotrader::genome::BehaviorParams;
use evotrader::market::synthetic::{generate_synthetic, RegimeSegment};
use evotrader::types::Regime;
use std::env;

fn main() {
    env_logger::init();

    println!("=== EvoTrader Quickstart ===\n");

    let args: Vec<String> = env::args().collect();
    let population_size = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(40);
    let max_generations = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(15);
    let seed = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(42);

    println!("Configuration:");
    println!("  Population size: {}", population_size);
    println!("  Generations:     {}", max_generations);
    println!("  Seed:            {}", seed);
    println!();

    // A mixed regime schedule so the winner is not just a bull-market
    // momentum chaser.
    let schedule = vec![
        RegimeSegment { regime: Regime::Bull, bars: 250 },
        RegimeSegment { regime: Regime::Volatile, bars: 100 },
        RegimeSegment { regime: Regime::Bear, bars: 150 },
        RegimeSegment { regime: Regime::Recovery, bars: 100 },
    ];
    let bars = generate_synthetic(&schedule, seed);
    println!("Generated {} synthetic market bars\n", bars.len());

    let evolution_config = EvolutionConfig {
        population_size,
        max_generations,
        selection_strategy: SelectionStrategy::Tournament,
        crossover_method: CrossoverMethod::Blend,
        random_seed: seed,
        ..Default::default()
    };

    let evaluator = GenomeEvaluator::new(bars, FitnessConfig::default());
    let mut engine = match EvolutionEngine::new(evolution_config, evaluator) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    println!("Starting evolution...\n");
    match engine.run(&mut ConsoleObserver) {
        Ok(outcome) => {
            println!("\nRun finished: {:?}", outcome.state);
            println!(
                "Best genome {} (generation {}, archetype {}): fitness {:.4}",
                outcome.best.id(),
                outcome.best.generation,
                outcome.best.archetype(),
                outcome.best.fitness.unwrap_or(0.0)
            );
            println!("Traits:   {:?}", outcome.best.traits());
            println!("Behavior: {:#?}", BehaviorParams::derive(&outcome.best));
            println!(
                "Lineage:  {} genomes recorded, {} ancestors behind the winner",
                outcome.lineage.len(),
                outcome.lineage.ancestors(outcome.best.id()).len()
            );
        }
        Err(e) => {
            eprintln!("\nEvolution failed: {}", e);
            std::process::exit(1);
        }
    }
}
