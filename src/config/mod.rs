pub mod evolution;
pub mod fitness;
pub mod manager;
pub mod market;
pub mod traits;

pub use evolution::{CrossoverMethod, EvolutionConfig, SelectionStrategy};
pub use fitness::{FitnessConfig, FitnessWeights};
pub use manager::{AppConfig, ConfigManager};
pub use market::{MarketConfig, MarketMode};
