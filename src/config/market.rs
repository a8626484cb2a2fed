use super::traits::ConfigSection;
use crate::error::EvoTraderError;
use crate::market::synthetic::RegimeSegment;
use crate::types::{Regime, Timeframe};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketMode {
    Synthetic,
    Historical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub mode: MarketMode,
    /// Synthetic mode: ordered regime legs.
    pub regime_schedule: Vec<RegimeSegment>,
    pub market_seed: u64,
    /// Historical mode: instrument and range.
    pub symbol: String,
    pub timeframe: Timeframe,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Directory served by the CSV provider.
    pub data_dir: PathBuf,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            mode: MarketMode::Synthetic,
            regime_schedule: vec![
                RegimeSegment { regime: Regime::Bull, bars: 120 },
                RegimeSegment { regime: Regime::Volatile, bars: 60 },
                RegimeSegment { regime: Regime::Bear, bars: 90 },
                RegimeSegment { regime: Regime::Recovery, bars: 60 },
                RegimeSegment { regime: Regime::Sideways, bars: 90 },
            ],
            market_seed: 7,
            symbol: "BTC".to_string(),
            timeframe: Timeframe::Day,
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ConfigSection for MarketConfig {
    fn section_name() -> &'static str {
        "market"
    }

    fn validate(&self) -> Result<(), EvoTraderError> {
        match self.mode {
            MarketMode::Synthetic => {
                let total: usize = self.regime_schedule.iter().map(|s| s.bars).sum();
                if total == 0 {
                    return Err(EvoTraderError::Configuration(
                        "Regime schedule must contain at least one bar".to_string(),
                    ));
                }
            }
            MarketMode::Historical => {
                if self.symbol.is_empty() {
                    return Err(EvoTraderError::Configuration(
                        "Historical mode requires a symbol".to_string(),
                    ));
                }
                if self.start_date > self.end_date {
                    return Err(EvoTraderError::Configuration(
                        "Start date must not be after end date".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
