use crate::types::{MarketBar, Timeframe};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarCacheKey {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Local store for fetched bar sequences, checked before any provider
/// call and written on miss.
pub struct BarCache {
    data: Mutex<HashMap<BarCacheKey, Arc<[MarketBar]>>>,
    capacity: usize,
}

impl BarCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn get(&self, key: &BarCacheKey) -> Option<Arc<[MarketBar]>> {
        let data = self.data.lock().unwrap();
        data.get(key).cloned()
    }

    pub fn set(&self, key: BarCacheKey, value: Arc<[MarketBar]>) {
        let mut data = self.data.lock().unwrap();
        if data.len() >= self.capacity {
            // A simple eviction strategy: clear the cache when full.
            data.clear();
        }
        data.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
