use crate::config::fitness::FitnessConfig;
use crate::types::PerformanceMetrics;

/// Weighted multi-metric fitness in [0, 1].
///
/// Each metric is squashed through its own strictly monotone map before
/// weighting, so improving one metric while holding the others fixed
/// always raises fitness. Zero-trade results receive the configured
/// floor rather than zero, keeping maximally conservative genomes alive.
pub struct FitnessEvaluator {
    config: FitnessConfig,
}

// Squash scales: a Sharpe of ~2 or a 50% return already score near the
// top of their bands.
const SHARPE_SCALE: f64 = 2.0;
const RETURN_SCALE: f64 = 0.5;

impl FitnessEvaluator {
    pub fn new(config: FitnessConfig) -> Self {
        Self { config }
    }

    pub fn floor(&self) -> f64 {
        self.config.fitness_floor
    }

    pub fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        if metrics.trade_count == 0 {
            return self.config.fitness_floor;
        }

        let w = &self.config.weights;

        let sharpe_score = squash(metrics.sharpe_ratio, SHARPE_SCALE);
        let drawdown_score = 1.0 - metrics.max_drawdown.clamp(0.0, 1.0);
        let return_score = squash(metrics.total_return, RETURN_SCALE);
        let win_score = metrics.win_rate.clamp(0.0, 1.0);
        let trade_score =
            (metrics.trade_count as f64 / self.config.target_trade_count).min(1.0);

        let weighted = w.sharpe * sharpe_score
            + w.drawdown * drawdown_score
            + w.total_return * return_score
            + w.win_rate * win_score
            + w.trade_count * trade_score;

        (weighted / w.total()).clamp(0.0, 1.0)
    }
}

/// Strictly increasing map from the real line into (0, 1).
fn squash(value: f64, scale: f64) -> f64 {
    0.5 * (1.0 + (value / scale).tanh())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(sharpe: f64, drawdown: f64, trades: usize) -> PerformanceMetrics {
        PerformanceMetrics {
            total_return: 0.1,
            sharpe_ratio: sharpe,
            max_drawdown: drawdown,
            win_rate: 0.5,
            trade_count: trades,
        }
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let evaluator = FitnessEvaluator::new(FitnessConfig::default());
        for (sharpe, dd) in [(-5.0, 0.9), (0.0, 0.0), (3.0, 0.1), (10.0, 1.0)] {
            let score = evaluator.score(&metrics(sharpe, dd, 10));
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn higher_sharpe_lower_drawdown_dominates() {
        let evaluator = FitnessEvaluator::new(FitnessConfig::default());
        let weaker = evaluator.score(&metrics(0.5, 0.30, 10));
        let stronger = evaluator.score(&metrics(1.5, 0.10, 10));
        assert!(stronger > weaker);
    }

    #[test]
    fn zero_trades_receive_the_floor() {
        let config = FitnessConfig::default();
        let floor = config.fitness_floor;
        let evaluator = FitnessEvaluator::new(config);
        let score = evaluator.score(&metrics(3.0, 0.0, 0));
        assert_eq!(score, floor);
        assert!(score > 0.0);
    }
}
