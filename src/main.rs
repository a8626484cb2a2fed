use anyhow::Context;
use evotrader::config::{ConfigManager, MarketMode};
use evotrader::engines::evaluation::GenomeEvaluator;
use evotrader::engines::evolution::{ConsoleObserver, EvolutionEngine};
use evotrader::genome::BehaviorParams;
use evotrader::market::synthetic::generate_synthetic;
use evotrader::market::{CsvProvider, HistoricalLoader};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if let Some(path) = std::env::args().nth(1) {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading config from {}", path))?;
    }
    let config = manager.get();

    // All market data is prepared before the evolution loop starts.
    let bars = match config.market.mode {
        MarketMode::Synthetic => generate_synthetic(
            &config.market.regime_schedule,
            config.market.market_seed,
        ),
        MarketMode::Historical => {
            let provider = Arc::new(CsvProvider::new(config.market.data_dir.clone()));
            let loader = HistoricalLoader::new(provider);
            loader.load(
                &config.market.symbol,
                config.market.timeframe,
                config.market.start_date,
                config.market.end_date,
            )?
        }
    };
    log::info!("prepared {} market bars", bars.len());

    let evaluator = GenomeEvaluator::new(bars, config.fitness.clone());
    let mut engine = EvolutionEngine::new(config.evolution.clone(), evaluator)?;
    let outcome = engine.run(&mut ConsoleObserver)?;

    println!("\nRun finished: {:?}", outcome.state);
    println!(
        "Best genome {} (generation {}, archetype {}): fitness {:.4}",
        outcome.best.id(),
        outcome.best.generation,
        outcome.best.archetype(),
        outcome.best.fitness.unwrap_or(0.0)
    );
    println!("Traits: {:?}", outcome.best.traits());
    println!("Behavior: {:#?}", BehaviorParams::derive(&outcome.best));
    println!(
        "Lineage: {} genomes recorded, {} ancestors behind the winner",
        outcome.lineage.len(),
        outcome.lineage.ancestors(outcome.best.id()).len()
    );

    Ok(())
}
