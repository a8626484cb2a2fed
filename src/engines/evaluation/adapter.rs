use crate::genome::{BehaviorParams, Genome};
use serde::{Deserialize, Serialize};

/// Concrete trading-rule parameters for the backtester, derived
/// deterministically from a genome's behavior parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingRules {
    /// Fraction of equity committed per position.
    pub position_fraction: f64,
    /// Momentum magnitude required to open a position.
    pub entry_threshold: f64,
    /// Momentum level at which an open position is abandoned.
    pub exit_threshold: f64,
    /// Entries are skipped while bar volatility exceeds this.
    pub volatility_cutoff: f64,
    /// Lookback bars for the momentum signal.
    pub momentum_window: usize,
}

impl TradingRules {
    pub fn from_behavior(params: &BehaviorParams) -> Self {
        let sizing = (0.05 + 0.20 * params.risk_tolerance)
            * (1.0 - 0.25 * params.cooperativeness);

        Self {
            position_fraction: sizing,
            entry_threshold: 0.002 + 0.010 * (1.0 - params.aggressiveness),
            exit_threshold: -(0.002 + 0.008 * params.patience),
            volatility_cutoff: 0.008 + 0.035 * params.stress_resistance,
            momentum_window: 3 + (params.patience * 10.0).round() as usize,
        }
    }

    pub fn from_genome(genome: &Genome) -> Self {
        Self::from_behavior(&BehaviorParams::derive(genome))
    }
}
