pub mod adapter;
pub mod backtester;
pub mod evaluator;
pub mod portfolio;

pub use adapter::TradingRules;
pub use backtester::Backtester;
pub use evaluator::{EvaluatedGenome, GenomeEvaluator};
pub use portfolio::{Portfolio, Position};
