use super::traits::ConfigSection;
use crate::error::EvoTraderError;
use serde::{Deserialize, Serialize};

/// Metric weights for the fitness combination. Defaults favor Sharpe and
/// the drawdown penalty over raw return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    pub sharpe: f64,
    pub drawdown: f64,
    pub total_return: f64,
    pub win_rate: f64,
    pub trade_count: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            sharpe: 0.35,
            drawdown: 0.25,
            total_return: 0.20,
            win_rate: 0.10,
            trade_count: 0.10,
        }
    }
}

impl FitnessWeights {
    pub fn total(&self) -> f64 {
        self.sharpe + self.drawdown + self.total_return + self.win_rate + self.trade_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessConfig {
    pub weights: FitnessWeights,
    /// Fitness assigned to zero-trade genomes and to genomes whose
    /// backtest failed. Never zero and never an error.
    pub fitness_floor: f64,
    /// Bars per year for Sharpe annualization.
    pub annualization_factor: f64,
    /// Trade count at which the trade-count score saturates.
    pub target_trade_count: f64,
    pub initial_capital: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            weights: FitnessWeights::default(),
            fitness_floor: 0.1,
            annualization_factor: 252.0,
            target_trade_count: 20.0,
            initial_capital: 10_000.0,
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), EvoTraderError> {
        let w = &self.weights;
        for (name, value) in [
            ("sharpe", w.sharpe),
            ("drawdown", w.drawdown),
            ("total_return", w.total_return),
            ("win_rate", w.win_rate),
            ("trade_count", w.trade_count),
        ] {
            if value < 0.0 {
                return Err(EvoTraderError::Configuration(format!(
                    "Fitness weight '{}' must be non-negative",
                    name
                )));
            }
        }
        if w.total() <= 0.0 {
            return Err(EvoTraderError::Configuration(
                "Fitness weights must not all be zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fitness_floor) {
            return Err(EvoTraderError::Configuration(
                "Fitness floor must be in [0, 1]".to_string(),
            ));
        }
        if self.annualization_factor <= 0.0 {
            return Err(EvoTraderError::Configuration(
                "Annualization factor must be positive".to_string(),
            ));
        }
        if self.target_trade_count <= 0.0 {
            return Err(EvoTraderError::Configuration(
                "Target trade count must be positive".to_string(),
            ));
        }
        if self.initial_capital <= 0.0 {
            return Err(EvoTraderError::Configuration(
                "Initial capital must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FitnessConfig::default().validate().is_ok());
    }

    #[test]
    fn all_zero_weights_rejected() {
        let config = FitnessConfig {
            weights: FitnessWeights {
                sharpe: 0.0,
                drawdown: 0.0,
                total_return: 0.0,
                win_rate: 0.0,
                trade_count: 0.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_weight_rejected() {
        let config = FitnessConfig {
            weights: FitnessWeights {
                sharpe: -0.1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
