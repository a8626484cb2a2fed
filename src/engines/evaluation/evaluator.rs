use crate::config::fitness::FitnessConfig;
use crate::engines::evaluation::adapter::TradingRules;
use crate::engines::evaluation::backtester::Backtester;
use crate::engines::metrics::FitnessEvaluator;
use crate::genome::Genome;
use crate::types::{BacktestResult, MarketBar};
use std::sync::Arc;

/// Scored outcome for one genome.
#[derive(Debug, Clone)]
pub struct EvaluatedGenome {
    pub genome_id: u64,
    pub fitness: f64,
    /// Retained for inspection; the engine only needs the fitness.
    pub result: Option<BacktestResult>,
    pub error: Option<String>,
}

/// Pure (genome, market-sequence) → fitness function.
///
/// Holds no mutable state, so one instance is shared across the rayon
/// worker pool during a generation.
pub struct GenomeEvaluator {
    bars: Arc<[MarketBar]>,
    backtester: Backtester,
    fitness: FitnessEvaluator,
}

impl GenomeEvaluator {
    pub fn new(bars: Arc<[MarketBar]>, config: FitnessConfig) -> Self {
        let backtester = Backtester::new(config.initial_capital, config.annualization_factor);
        let fitness = FitnessEvaluator::new(config);
        Self {
            bars,
            backtester,
            fitness,
        }
    }

    pub fn bars(&self) -> &Arc<[MarketBar]> {
        &self.bars
    }

    /// Replay and score one genome. A failed backtest is isolated here:
    /// the genome receives the fitness floor and the error is carried in
    /// the outcome instead of aborting the rest of the population.
    pub fn evaluate(&self, genome: &Genome) -> EvaluatedGenome {
        let rules = TradingRules::from_genome(genome);

        match self.backtester.run(&rules, &self.bars) {
            Ok(result) => EvaluatedGenome {
                genome_id: genome.id(),
                fitness: self.fitness.score(&result.metrics),
                result: Some(result),
                error: None,
            },
            Err(e) => {
                log::warn!("backtest failed for genome {}: {}", genome.id(), e);
                EvaluatedGenome {
                    genome_id: genome.id(),
                    fitness: self.fitness.floor(),
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::synthetic::{generate_synthetic, RegimeSegment};
    use crate::types::Regime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluator() -> GenomeEvaluator {
        let bars = generate_synthetic(
            &[RegimeSegment { regime: Regime::Bull, bars: 150 }],
            21,
        );
        GenomeEvaluator::new(bars, FitnessConfig::default())
    }

    #[test]
    fn fitness_is_in_unit_interval() {
        let evaluator = evaluator();
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..20 {
            let genome = Genome::random(i, 0, &mut rng);
            let outcome = evaluator.evaluate(&genome);
            assert!((0.0..=1.0).contains(&outcome.fitness));
            assert!(outcome.error.is_none());
        }
    }

    #[test]
    fn evaluation_is_deterministic_per_genome() {
        let evaluator = evaluator();
        let mut rng = StdRng::seed_from_u64(9);
        let genome = Genome::random(0, 0, &mut rng);
        let a = evaluator.evaluate(&genome);
        let b = evaluator.evaluate(&genome);
        assert_eq!(a.fitness, b.fitness);
    }

    #[test]
    fn empty_market_is_isolated_to_the_floor() {
        let bars: Arc<[crate::types::MarketBar]> = Vec::new().into();
        let config = FitnessConfig::default();
        let floor = config.fitness_floor;
        let evaluator = GenomeEvaluator::new(bars, config);
        let mut rng = StdRng::seed_from_u64(1);
        let genome = Genome::random(0, 0, &mut rng);

        let outcome = evaluator.evaluate(&genome);
        assert_eq!(outcome.fitness, floor);
        assert!(outcome.error.is_some());
    }
}
