pub mod cache;
pub mod historical;
pub mod synthetic;

pub use cache::{BarCache, BarCacheKey};
pub use historical::{CsvProvider, HistoricalLoader, MarketDataProvider, ProviderBar};
pub use synthetic::{generate_synthetic, RegimeProfile, RegimeSegment};
