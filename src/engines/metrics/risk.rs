pub struct RiskMetrics;

impl RiskMetrics {
    /// Annualized Sharpe ratio over the per-bar returns of an equity
    /// curve. Defined as 0 when the return variance is 0.
    pub fn sharpe_ratio(equity_curve: &[f64], annualization_factor: f64) -> f64 {
        let returns = Self::bar_returns(equity_curve);
        if returns.is_empty() {
            return 0.0;
        }

        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let volatility = Self::std_dev(&returns);
        if volatility == 0.0 {
            return 0.0;
        }

        (mean / volatility) * annualization_factor.sqrt()
    }

    /// Maximum peak-to-trough decline as a fraction of the peak.
    pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
        if equity_curve.is_empty() {
            return 0.0;
        }

        let mut max_dd = 0.0;
        let mut peak = equity_curve[0];

        for &value in equity_curve.iter() {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                let dd = (peak - value) / peak;
                if dd > max_dd {
                    max_dd = dd;
                }
            }
        }

        max_dd
    }

    pub fn bar_returns(equity_curve: &[f64]) -> Vec<f64> {
        equity_curve
            .windows(2)
            .filter(|w| w[0] != 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect()
    }

    pub fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance =
            values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        variance.sqrt()
    }
}
