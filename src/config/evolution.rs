use super::traits::ConfigSection;
use crate::error::EvoTraderError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    Elite,
    Tournament,
    Roulette,
    Diversity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMethod {
    Uniform,
    Weighted,
    Blend,
    SinglePoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Per-trait probability of a Gaussian perturbation at genome birth.
    pub mutation_rate: f64,
    /// Standard deviation of the perturbation.
    pub mutation_strength: f64,
    /// Fraction of top genomes carried over unchanged each generation.
    pub elitism_ratio: f64,
    pub selection_strategy: SelectionStrategy,
    pub crossover_method: CrossoverMethod,
    pub tournament_size: usize,
    /// Interval-extension factor for blend (BLX) crossover.
    pub blend_alpha: f64,
    /// Minimum fitness for diversity-selection candidates.
    pub diversity_min_fitness: f64,
    /// Generations of average-fitness history inspected for convergence.
    pub convergence_window: usize,
    pub convergence_epsilon: f64,
    pub random_seed: u64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 30,
            mutation_rate: 0.15,
            mutation_strength: 0.10,
            elitism_ratio: 0.10,
            selection_strategy: SelectionStrategy::Tournament,
            crossover_method: CrossoverMethod::Uniform,
            tournament_size: 3,
            blend_alpha: 0.3,
            diversity_min_fitness: 0.0,
            convergence_window: 5,
            convergence_epsilon: 1e-4,
            random_seed: 42,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvoTraderError> {
        if self.population_size < 2 {
            return Err(EvoTraderError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(EvoTraderError::Configuration(
                "Max generations must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvoTraderError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.mutation_strength < 0.0 {
            return Err(EvoTraderError::Configuration(
                "Mutation strength must be non-negative".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.elitism_ratio) {
            return Err(EvoTraderError::Configuration(
                "Elitism ratio must be in [0, 1)".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(EvoTraderError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.blend_alpha < 0.0 {
            return Err(EvoTraderError::Configuration(
                "Blend alpha must be non-negative".to_string(),
            ));
        }
        if self.convergence_window == 0 {
            return Err(EvoTraderError::Configuration(
                "Convergence window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
