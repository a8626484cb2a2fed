use crate::error::{EvoTraderError, Result};
use crate::market::cache::{BarCache, BarCacheKey};
use crate::market::synthetic::classify_vol_state;
use crate::types::{MarketBar, Regime, Timeframe};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Raw record as delivered by a data provider, before normalization.
#[derive(Debug, Clone)]
pub struct ProviderBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// External market-data source. Opaque to the engine: records are
/// normalized into `MarketBar`s and the provider is never consulted for
/// a range the cache already holds.
pub trait MarketDataProvider: Send + Sync {
    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderBar>>;
}

/// File-backed provider reading `{dir}/{SYMBOL}_{timeframe}.csv` with
/// date,open,high,low,close,volume columns.
pub struct CsvProvider {
    data_dir: PathBuf,
}

impl CsvProvider {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self { data_dir: data_dir.into() }
    }

    fn read_frame(&self, path: &std::path::Path) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| EvoTraderError::DataLoading(format!("Failed to open CSV: {}", e)))?
            .finish()
            .map_err(|e| EvoTraderError::DataLoading(format!("Failed to read CSV: {}", e)))?;
        Ok(df)
    }
}

impl MarketDataProvider for CsvProvider {
    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderBar>> {
        let path = self.data_dir.join(format!("{}_{}.csv", symbol, timeframe));
        if !path.exists() {
            return Err(EvoTraderError::DataUnavailable {
                symbol: symbol.to_string(),
                timeframe,
                start,
                end,
            });
        }

        let df = self.read_frame(&path)?;
        let dates = df.column("date")?.str()?;
        let opens = df.column("open")?.cast(&DataType::Float64)?;
        let highs = df.column("high")?.cast(&DataType::Float64)?;
        let lows = df.column("low")?.cast(&DataType::Float64)?;
        let closes = df.column("close")?.cast(&DataType::Float64)?;
        let volumes = df.column("volume")?.cast(&DataType::Float64)?;

        let mut records = Vec::new();
        for i in 0..df.height() {
            let Some(raw_date) = dates.get(i) else { continue };
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .map_err(|e| EvoTraderError::DataLoading(format!("Bad date '{}': {}", raw_date, e)))?;
            if date < start || date > end {
                continue;
            }
            records.push(ProviderBar {
                date,
                open: opens.f64()?.get(i).unwrap_or(f64::NAN),
                high: highs.f64()?.get(i).unwrap_or(f64::NAN),
                low: lows.f64()?.get(i).unwrap_or(f64::NAN),
                close: closes.f64()?.get(i).unwrap_or(f64::NAN),
                volume: volumes.f64()?.get(i).unwrap_or(0.0),
            });
        }

        if records.is_empty() {
            return Err(EvoTraderError::DataUnavailable {
                symbol: symbol.to_string(),
                timeframe,
                start,
                end,
            });
        }

        Ok(records)
    }
}

/// Loads historical bars through the cache, back-filling regime labels so
/// historical and synthetic runs stay comparable.
pub struct HistoricalLoader {
    provider: Arc<dyn MarketDataProvider>,
    cache: BarCache,
}

// Rolling window for the regime back-fill.
const REGIME_WINDOW: usize = 20;

// Daily-scale thresholds on rolling mean return / volatility.
const CRASH_MEAN: f64 = -0.008;
const RECOVERY_MEAN: f64 = 0.008;
const VOLATILE_VOL: f64 = 0.02;
const TREND_MEAN: f64 = 0.0015;

impl HistoricalLoader {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            cache: BarCache::new(64),
        }
    }

    /// Fetch-and-normalize with caching: repeated requests for the same
    /// (symbol, timeframe, start, end) never re-invoke the provider.
    pub fn load(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<[MarketBar]>> {
        let key = BarCacheKey {
            symbol: symbol.to_string(),
            timeframe,
            start,
            end,
        };

        if let Some(bars) = self.cache.get(&key) {
            log::debug!("cache hit for {} {} {}..{}", symbol, timeframe, start, end);
            return Ok(bars);
        }

        let records = self.provider.fetch(symbol, timeframe, start, end)?;
        let bars = normalize(&records);
        self.cache.set(key, bars.clone());
        Ok(bars)
    }
}

/// Convert provider records to MarketBars with regime labels derived
/// from rolling return/volatility thresholds.
pub fn normalize(records: &[ProviderBar]) -> Arc<[MarketBar]> {
    let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    let (regimes, vols) = backfill_regimes(&closes);
    let avg_vol = if vols.is_empty() {
        0.0
    } else {
        vols.iter().sum::<f64>() / vols.len() as f64
    };

    records
        .iter()
        .enumerate()
        .map(|(i, r)| MarketBar {
            index: i,
            date: r.date,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
            regime: regimes[i],
            volatility: vols[i],
            vol_state: classify_vol_state(vols[i], avg_vol.max(f64::EPSILON)),
        })
        .collect::<Vec<_>>()
        .into()
}

fn label_regime(mean: f64, vol: f64) -> Regime {
    if mean <= CRASH_MEAN {
        Regime::Crash
    } else if mean >= RECOVERY_MEAN {
        Regime::Recovery
    } else if vol >= VOLATILE_VOL {
        Regime::Volatile
    } else if mean >= TREND_MEAN {
        Regime::Bull
    } else if mean <= -TREND_MEAN {
        Regime::Bear
    } else {
        Regime::Sideways
    }
}

fn backfill_regimes(closes: &[f64]) -> (Vec<Regime>, Vec<f64>) {
    let n = closes.len();
    let mut regimes = vec![Regime::Sideways; n];
    let mut vols = vec![0.0; n];
    if n < 2 {
        return (regimes, vols);
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();

    let mut first_labeled: Option<(Regime, f64)> = None;
    for t in 0..n {
        // Returns strictly before or at bar t only.
        if t < REGIME_WINDOW {
            continue;
        }
        let window = &returns[t - REGIME_WINDOW..t];
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        let variance =
            window.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / window.len() as f64;
        let vol = variance.sqrt();

        regimes[t] = label_regime(mean, vol);
        vols[t] = vol;
        if first_labeled.is_none() {
            first_labeled = Some((regimes[t], vol));
        }
    }

    // Leading bars inherit the first computed label.
    if let Some((regime, vol)) = first_labeled {
        for t in 0..REGIME_WINDOW.min(n) {
            regimes[t] = regime;
            vols[t] = vol;
        }
    }

    (regimes, vols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start * (1.0 + step).powi(i as i32)).collect()
    }

    #[test]
    fn steady_climb_labels_bull() {
        let closes = ramp(100.0, 0.003, 60);
        let (regimes, _) = backfill_regimes(&closes);
        assert_eq!(regimes[59], Regime::Bull);
    }

    #[test]
    fn steep_decline_labels_crash() {
        let closes = ramp(100.0, -0.02, 60);
        let (regimes, _) = backfill_regimes(&closes);
        assert_eq!(regimes[59], Regime::Crash);
    }

    #[test]
    fn flat_series_labels_sideways_with_zero_vol() {
        let closes = vec![100.0; 50];
        let (regimes, vols) = backfill_regimes(&closes);
        assert!(regimes.iter().all(|&r| r == Regime::Sideways));
        assert!(vols.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn leading_bars_inherit_first_label() {
        let closes = ramp(100.0, 0.003, 40);
        let (regimes, _) = backfill_regimes(&closes);
        assert_eq!(regimes[0], regimes[REGIME_WINDOW]);
    }

    #[test]
    fn normalize_preserves_order_and_indices() {
        let records: Vec<ProviderBar> = (0..30)
            .map(|i| ProviderBar {
                date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: 100.0 + i as f64,
                high: 101.0 + i as f64,
                low: 99.0 + i as f64,
                close: 100.5 + i as f64,
                volume: 1000.0,
            })
            .collect();
        let bars = normalize(&records);
        assert_eq!(bars.len(), 30);
        assert!(bars.iter().enumerate().all(|(i, b)| b.index == i));
    }
}
