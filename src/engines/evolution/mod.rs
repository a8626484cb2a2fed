pub mod engine;
pub mod history;
pub mod operators;
pub mod population;
pub mod progress;

pub use engine::{EvolutionEngine, EvolutionOutcome, RunSnapshot, RunState};
pub use history::{GenerationRecord, LineageGraph, RunHistory};
pub use population::Population;
pub use progress::{ChannelObserver, ConsoleObserver, GenerationEvent, GenerationObserver, NullObserver};
