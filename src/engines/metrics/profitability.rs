use crate::types::Trade;

pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    /// Final over initial equity, minus one.
    pub fn total_return(equity_curve: &[f64]) -> f64 {
        match (equity_curve.first(), equity_curve.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => last / first - 1.0,
            _ => 0.0,
        }
    }

    /// Fraction of closed trades with positive profit; 0 with no trades.
    pub fn win_rate(trades: &[Trade]) -> f64 {
        if trades.is_empty() {
            return 0.0;
        }
        let wins = trades.iter().filter(|t| t.profit > 0.0).count();
        wins as f64 / trades.len() as f64
    }
}
