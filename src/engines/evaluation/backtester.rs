use crate::engines::evaluation::adapter::TradingRules;
use crate::engines::evaluation::portfolio::Portfolio;
use crate::engines::metrics::MetricsEngine;
use crate::error::{EvoTraderError, Result};
use crate::types::{BacktestResult, Direction, ExitReason, MarketBar};

// Open positions are abandoned when bar volatility runs this far past
// the entry cutoff.
const VOL_STOP_MULTIPLIER: f64 = 2.0;

/// Deterministic bar-by-bar replay of a rule set over a market sequence.
///
/// At bar `t` only data up to and including `t` is visible: the momentum
/// signal is the return over the trailing `momentum_window` closes, and
/// fills happen at the current close.
pub struct Backtester {
    initial_capital: f64,
    metrics: MetricsEngine,
}

impl Backtester {
    pub fn new(initial_capital: f64, annualization_factor: f64) -> Self {
        Self {
            initial_capital,
            metrics: MetricsEngine::new(annualization_factor),
        }
    }

    pub fn run(&self, rules: &TradingRules, bars: &[MarketBar]) -> Result<BacktestResult> {
        if bars.is_empty() {
            return Err(EvoTraderError::Backtest(
                "Cannot backtest an empty market sequence".to_string(),
            ));
        }
        if rules.momentum_window == 0 {
            return Err(EvoTraderError::Backtest(
                "Momentum window must be at least 1".to_string(),
            ));
        }

        let mut portfolio = Portfolio::new(self.initial_capital);

        for (t, bar) in bars.iter().enumerate() {
            let price = bar.close;

            if t >= rules.momentum_window {
                let anchor = bars[t - rules.momentum_window].close;
                if anchor > 0.0 {
                    let momentum = price / anchor - 1.0;
                    self.step(&mut portfolio, rules, t, bar, momentum);
                }
            }

            portfolio.mark_to_market(price);
        }

        if portfolio.has_position() {
            let last = bars.len() - 1;
            let price = bars[last].close;
            portfolio.close_position(last, price, ExitReason::EndOfData);
            portfolio.mark_to_market(price);
        }

        let metrics = self
            .metrics
            .calculate(&portfolio.equity_curve, &portfolio.trades);

        Ok(BacktestResult {
            equity_curve: portfolio.equity_curve,
            trades: portfolio.trades,
            metrics,
        })
    }

    fn step(
        &self,
        portfolio: &mut Portfolio,
        rules: &TradingRules,
        t: usize,
        bar: &MarketBar,
        momentum: f64,
    ) {
        let price = bar.close;

        if let Some(pos) = &portfolio.position {
            if bar.volatility > rules.volatility_cutoff * VOL_STOP_MULTIPLIER {
                portfolio.close_position(t, price, ExitReason::VolatilityStop);
                return;
            }
            let should_exit = match pos.direction {
                Direction::Long => momentum < rules.exit_threshold,
                Direction::Short => momentum > -rules.exit_threshold,
            };
            if should_exit {
                portfolio.close_position(t, price, ExitReason::Signal);
            }
            return;
        }

        // Volatility filter gates all entries.
        if bar.volatility > rules.volatility_cutoff {
            return;
        }

        if momentum > rules.entry_threshold {
            portfolio.open_position(t, Direction::Long, price, rules.position_fraction);
        } else if momentum < -rules.entry_threshold {
            portfolio.open_position(t, Direction::Short, price, rules.position_fraction);
        }
    }
}
