use crate::types::{Direction, ExitReason, Trade};

/// Position and equity accounting for a backtest replay.
pub struct Portfolio {
    pub initial_capital: f64,
    pub cash: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,

    realized_pnl: f64,
    unrealized_pnl: f64,
}

pub struct Position {
    pub direction: Direction,
    pub entry_bar: usize,
    pub entry_price: f64,
    pub size: f64,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            cash: initial_capital,
            position: None,
            trades: Vec::new(),
            equity_curve: vec![initial_capital],
            realized_pnl: 0.0,
            unrealized_pnl: 0.0,
        }
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    pub fn open_position(
        &mut self,
        bar: usize,
        direction: Direction,
        price: f64,
        position_fraction: f64,
    ) {
        if self.position.is_some() || price <= 0.0 {
            return;
        }

        let size = (self.equity() * position_fraction) / price;

        match direction {
            Direction::Long => self.cash -= size * price,
            // Short sale proceeds are credited up front.
            Direction::Short => self.cash += size * price,
        }

        self.position = Some(Position {
            direction,
            entry_bar: bar,
            entry_price: price,
            size,
        });
    }

    pub fn close_position(&mut self, bar: usize, price: f64, reason: ExitReason) {
        if let Some(pos) = self.position.take() {
            let profit = match pos.direction {
                Direction::Long => (price - pos.entry_price) * pos.size,
                Direction::Short => (pos.entry_price - price) * pos.size,
            };

            match pos.direction {
                Direction::Long => self.cash += price * pos.size,
                Direction::Short => self.cash -= price * pos.size,
            }
            self.realized_pnl += profit;
            self.unrealized_pnl = 0.0;

            self.trades.push(Trade {
                entry_bar: pos.entry_bar,
                exit_bar: bar,
                entry_price: pos.entry_price,
                exit_price: price,
                direction: pos.direction,
                size: pos.size,
                profit,
                exit_reason: reason,
            });
        }
    }

    /// Revalue the open position at the current price and append the
    /// resulting equity to the curve.
    pub fn mark_to_market(&mut self, price: f64) {
        self.unrealized_pnl = match &self.position {
            Some(pos) => match pos.direction {
                Direction::Long => (price - pos.entry_price) * pos.size,
                Direction::Short => (pos.entry_price - price) * pos.size,
            },
            None => 0.0,
        };
        self.equity_curve.push(self.equity());
    }

    pub fn equity(&self) -> f64 {
        self.initial_capital + self.realized_pnl + self.unrealized_pnl
    }
}
