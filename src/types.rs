use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named market-condition profile governing synthetic generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Bull,
    Bear,
    Volatile,
    Sideways,
    Crash,
    Recovery,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::Bull => "bull",
            Regime::Bear => "bear",
            Regime::Volatile => "volatile",
            Regime::Sideways => "sideways",
            Regime::Crash => "crash",
            Regime::Recovery => "recovery",
        };
        write!(f, "{}", name)
    }
}

/// Coarse volatility bucket relative to the regime's base level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityState {
    Calm,
    Normal,
    Elevated,
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Minute,
    Hour,
    Day,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Timeframe::Minute => "1min",
            Timeframe::Hour => "1hour",
            Timeframe::Day => "1day",
        };
        write!(f, "{}", name)
    }
}

/// One observation of the market. Sequences of bars are immutable once
/// generated or fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketBar {
    pub index: usize,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub regime: Regime,
    /// Per-bar volatility (stdev of the return process at this bar).
    pub volatility: f64,
    pub vol_state: VolatilityState,
}

/// Trade record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_bar: usize,
    pub exit_bar: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    pub direction: Direction,
    pub size: f64,
    pub profit: f64,
    pub exit_reason: ExitReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Signal,
    VolatilityStop,
    EndOfData,
}

/// Performance of one (genome, market-sequence) replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Final equity over initial equity, minus one (fraction).
    pub total_return: f64,
    /// Annualized mean/stdev of per-bar returns; 0 when variance is 0.
    pub sharpe_ratio: f64,
    /// Peak-to-trough equity decline as a fraction of the peak.
    pub max_drawdown: f64,
    /// Fraction of closed trades with positive profit.
    pub win_rate: f64,
    pub trade_count: usize,
}

/// Complete backtest output. Ephemeral: consumed by the fitness evaluator
/// and then discarded or archived for inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub equity_curve: Vec<f64>,
    pub trades: Vec<Trade>,
    pub metrics: PerformanceMetrics,
}
