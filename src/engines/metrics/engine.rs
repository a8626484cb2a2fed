use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics};
use crate::types::{PerformanceMetrics, Trade};

pub struct MetricsEngine {
    annualization_factor: f64,
}

impl MetricsEngine {
    pub fn new(annualization_factor: f64) -> Self {
        Self { annualization_factor }
    }

    pub fn calculate(&self, equity_curve: &[f64], trades: &[Trade]) -> PerformanceMetrics {
        PerformanceMetrics {
            total_return: ProfitabilityMetrics::total_return(equity_curve),
            sharpe_ratio: RiskMetrics::sharpe_ratio(equity_curve, self.annualization_factor),
            max_drawdown: RiskMetrics::max_drawdown(equity_curve),
            win_rate: ProfitabilityMetrics::win_rate(trades),
            trade_count: trades.len(),
        }
    }
}
