pub mod engine;
pub mod fitness;
pub mod profitability;
pub mod risk;

pub use engine::MetricsEngine;
pub use fitness::FitnessEvaluator;
pub use profitability::ProfitabilityMetrics;
pub use risk::RiskMetrics;
