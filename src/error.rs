use crate::types::Timeframe;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoTraderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data unavailable: {symbol} {timeframe} {start}..{end}")]
    DataUnavailable {
        symbol: String,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Rate limited by data provider: {0}")]
    RateLimited(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Backtest error: {0}")]
    Backtest(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvoTraderError>;
