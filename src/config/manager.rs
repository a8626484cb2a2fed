use super::{
    evolution::EvolutionConfig, fitness::FitnessConfig, market::MarketConfig,
    traits::ConfigSection,
};
use crate::error::EvoTraderError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub market: MarketConfig,
    pub fitness: FitnessConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvoTraderError> {
        self.evolution.validate()?;
        self.market.validate()?;
        self.fitness.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoTraderError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvoTraderError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| EvoTraderError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoTraderError> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| EvoTraderError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvoTraderError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    /// Apply a change and validate it; an invalid change is discarded.
    pub fn update<F>(&self, f: F) -> Result<(), EvoTraderError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap();
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_app_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn update_rejects_invalid_changes() {
        let manager = ConfigManager::new();
        let before = manager.get().evolution.population_size;
        let result = manager.update(|c| c.evolution.population_size = 1);
        assert!(result.is_err());
        assert_eq!(manager.get().evolution.population_size, before);
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(
            parsed.evolution.population_size,
            config.evolution.population_size
        );
        assert_eq!(parsed.market.symbol, config.market.symbol);
    }
}
