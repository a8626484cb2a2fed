//! Evolutionary agent-optimization engine: trading behavior as a 5-trait
//! genome, bred across generations and scored by replaying each genome
//! through a synthetic or historical market simulator.

pub mod config;
pub mod engines;
pub mod error;
pub mod genome;
pub mod market;
pub mod types;

pub use config::{AppConfig, ConfigManager};
pub use engines::evaluation::GenomeEvaluator;
pub use engines::evolution::{EvolutionEngine, EvolutionOutcome, RunState};
pub use error::{EvoTraderError, Result};
pub use genome::Genome;
