use chrono::NaiveDate;
use evotrader::config::evolution::EvolutionConfig;
use evotrader::config::fitness::{FitnessConfig, FitnessWeights};
use evotrader::engines::evaluation::GenomeEvaluator;
use evotrader::engines::evolution::{EvolutionEngine, NullObserver};
use evotrader::engines::metrics::FitnessEvaluator;
use evotrader::genome::Genome;
use evotrader::types::{MarketBar, PerformanceMetrics, Regime, VolatilityState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn flat_market(bars: usize) -> Arc<[MarketBar]> {
    (0..bars)
        .map(|i| MarketBar {
            index: i,
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
                + chrono::Duration::days(i as i64),
            open: 100.0,
            high: 100.1,
            low: 99.9,
            close: 100.0,
            volume: 1000.0,
            regime: Regime::Sideways,
            volatility: 0.005,
            vol_state: VolatilityState::Calm,
        })
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn sharpe_and_drawdown_dominance_orders_fitness() {
    let base = PerformanceMetrics {
        total_return: 0.15,
        sharpe_ratio: 0.8,
        max_drawdown: 0.25,
        win_rate: 0.55,
        trade_count: 12,
    };
    let dominant = PerformanceMetrics {
        sharpe_ratio: 1.4,
        max_drawdown: 0.12,
        ..base
    };

    // Holds under the defaults and under any weighting that keeps both
    // metrics in play.
    let configs = [
        FitnessConfig::default(),
        FitnessConfig {
            weights: FitnessWeights {
                sharpe: 0.5,
                drawdown: 0.5,
                total_return: 0.0,
                win_rate: 0.0,
                trade_count: 0.0,
            },
            ..Default::default()
        },
        FitnessConfig {
            weights: FitnessWeights {
                sharpe: 0.1,
                drawdown: 0.1,
                total_return: 0.4,
                win_rate: 0.2,
                trade_count: 0.2,
            },
            ..Default::default()
        },
    ];

    for config in configs {
        let evaluator = FitnessEvaluator::new(config);
        assert!(evaluator.score(&dominant) > evaluator.score(&base));
    }
}

#[test]
fn zero_trade_backtest_receives_the_configured_floor() {
    let config = FitnessConfig {
        fitness_floor: 0.17,
        ..Default::default()
    };
    let evaluator = GenomeEvaluator::new(flat_market(300), config);

    let mut rng = StdRng::seed_from_u64(33);
    for i in 0..10 {
        let genome = Genome::random(i, 0, &mut rng);
        let outcome = evaluator.evaluate(&genome);
        assert_eq!(outcome.fitness, 0.17);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.result.unwrap().trades.len(), 0);
    }
}

#[test]
fn evaluation_failures_are_isolated_not_fatal() {
    // An empty market sequence makes every backtest fail; the run must
    // still complete with floored fitness and a full error count.
    let empty: Arc<[MarketBar]> = Vec::new().into();
    let fitness_config = FitnessConfig::default();
    let floor = fitness_config.fitness_floor;
    let evaluator = GenomeEvaluator::new(empty, fitness_config);

    let config = EvolutionConfig {
        population_size: 8,
        max_generations: 2,
        elitism_ratio: 0.25,
        random_seed: 11,
        ..Default::default()
    };
    let mut engine = EvolutionEngine::new(config, evaluator).unwrap();
    let outcome = engine.run(&mut NullObserver).unwrap();

    assert_eq!(outcome.history.len(), 2);
    assert_eq!(outcome.history[0].error_count, 8);
    // The two carried-over elites keep their floored fitness and are not
    // re-run, so only the six fresh children can fail.
    assert_eq!(outcome.history[1].error_count, 6);
    for record in &outcome.history {
        assert_eq!(record.max_fitness, floor);
    }
    assert_eq!(outcome.best.fitness, Some(floor));
}
