use crate::config::evolution::EvolutionConfig;
use crate::config::traits::ConfigSection;
use crate::engines::evaluation::{EvaluatedGenome, GenomeEvaluator};
use crate::engines::evolution::history::{GenerationRecord, LineageGraph, RunHistory};
use crate::engines::evolution::operators;
use crate::engines::evolution::population::Population;
use crate::engines::evolution::progress::GenerationObserver;
use crate::error::{EvoTraderError, Result};
use crate::genome::Genome;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Initialized,
    Evaluating,
    Breeding,
    Converged,
    BudgetExhausted,
}

/// Terminal output of a run: the best genome found, the full generation
/// history, and the parent-child lineage graph.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub state: RunState,
    pub best: Genome,
    pub history: Vec<GenerationRecord>,
    pub lineage: LineageGraph,
}

/// Generation-boundary pause point. Captures everything needed to resume
/// a run; the breeding rng is re-derived from the run seed and the
/// generation number, so resumed runs stay deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub generation: usize,
    pub next_id: u64,
    pub population: Population,
}

/// Orchestrates the generational loop:
/// `Initialized → Evaluating → Breeding → … → Converged | BudgetExhausted`.
///
/// Evaluation is parallel and pure; results are merged in genome-id order
/// before breeding so worker completion order can never change the next
/// generation. Breeding is single-threaded and starts only after every
/// evaluation of the current generation has finished. The engine performs
/// no I/O: market data is fetched up front and lives inside the
/// evaluator.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    evaluator: GenomeEvaluator,
    rng: StdRng,
    next_id: u64,
    state: RunState,
    population: Population,
    history: RunHistory,
    lineage: LineageGraph,
}

impl EvolutionEngine {
    /// Seeds generation 0. Configuration problems are fatal here, before
    /// the loop starts.
    pub fn new(config: EvolutionConfig, evaluator: GenomeEvaluator) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.random_seed);
        let genomes: Vec<Genome> = (0..config.population_size)
            .map(|i| Genome::random(i as u64, 0, &mut rng))
            .collect();

        let mut lineage = LineageGraph::default();
        for genome in &genomes {
            lineage.record(genome);
        }

        let next_id = genomes.len() as u64;
        Ok(Self {
            config,
            evaluator,
            rng,
            next_id,
            state: RunState::Initialized,
            population: Population::new(0, genomes),
            history: RunHistory::default(),
            lineage,
        })
    }

    /// Resume from a generation-boundary snapshot.
    pub fn resume(
        config: EvolutionConfig,
        evaluator: GenomeEvaluator,
        snapshot: RunSnapshot,
    ) -> Result<Self> {
        config.validate()?;
        if snapshot.population.is_empty() {
            return Err(EvoTraderError::Snapshot(
                "Snapshot contains an empty population".to_string(),
            ));
        }

        let seed = config.random_seed
            ^ (snapshot.generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let rng = StdRng::seed_from_u64(seed);

        let mut lineage = LineageGraph::default();
        for genome in &snapshot.population.genomes {
            lineage.record(genome);
        }

        Ok(Self {
            config,
            evaluator,
            rng,
            next_id: snapshot.next_id,
            state: RunState::Initialized,
            population: snapshot.population,
            history: RunHistory::default(),
            lineage,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            generation: self.population.generation,
            next_id: self.next_id,
            population: self.population.clone(),
        }
    }

    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<RunSnapshot> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&contents)?;
        Ok(snapshot)
    }

    /// Run the generational loop to termination.
    pub fn run(&mut self, observer: &mut dyn GenerationObserver) -> Result<EvolutionOutcome> {
        loop {
            let generation = self.population.generation;
            observer.on_generation_start(generation);

            self.state = RunState::Evaluating;
            let record = self.evaluate_population();
            self.history.push(record);
            if let Some(best) = self.population.best() {
                self.history.observe(best);
            }
            observer.on_generation_complete(&record);

            if generation + 1 >= self.config.max_generations {
                self.state = RunState::BudgetExhausted;
                break;
            }
            if let Some(improvement) =
                self.history.improvement_over(self.config.convergence_window)
            {
                if improvement < self.config.convergence_epsilon {
                    log::info!(
                        "converged at generation {} (improvement {:.6} over {} generations)",
                        generation,
                        improvement,
                        self.config.convergence_window
                    );
                    self.state = RunState::Converged;
                    break;
                }
            }

            self.state = RunState::Breeding;
            self.population = self.breed_next_generation();
        }

        let best = self.history.best().cloned().ok_or_else(|| {
            EvoTraderError::Evaluation("No genome was ever evaluated".to_string())
        })?;

        Ok(EvolutionOutcome {
            state: self.state,
            best,
            history: self.history.records().to_vec(),
            lineage: self.lineage.clone(),
        })
    }

    /// Evaluate every unscored genome of the current population in
    /// parallel and merge the results in genome-id order. Carried-over
    /// elites keep their recorded fitness and are not re-run.
    fn evaluate_population(&mut self) -> GenerationRecord {
        let evaluator = &self.evaluator;
        let mut results: Vec<EvaluatedGenome> = self
            .population
            .genomes
            .par_iter()
            .filter(|genome| genome.fitness.is_none())
            .map(|genome| evaluator.evaluate(genome))
            .collect();
        results.sort_by_key(|r| r.genome_id);

        let mut error_count = 0;
        for result in &results {
            if result.error.is_some() {
                error_count += 1;
            }
            if let Some(genome) = self
                .population
                .genomes
                .iter_mut()
                .find(|g| g.id() == result.genome_id)
            {
                genome.fitness = Some(result.fitness);
            }
        }

        let best_genome_id = self.population.best().map(|g| g.id()).unwrap_or(0);
        GenerationRecord {
            generation: self.population.generation,
            avg_fitness: self.population.avg_fitness(),
            max_fitness: self.population.max_fitness(),
            best_genome_id,
            error_count,
        }
    }

    /// Elitism, then Select → Crossover → Mutate until the population is
    /// refilled. Elites keep their recorded fitness; children start with
    /// none.
    fn breed_next_generation(&mut self) -> Population {
        let next_generation = self.population.generation + 1;
        let population_size = self.config.population_size;

        let elite_count = ((population_size as f64 * self.config.elitism_ratio).ceil()
            as usize)
            .min(self.population.len());
        let mut next = operators::elite_selection(&self.population.genomes, elite_count);

        let remaining = population_size.saturating_sub(next.len());
        // Distinct-parent strategies can never fill a pool larger than
        // the population itself.
        let pool_size = remaining.max(2).min(self.population.len());
        let pool = operators::select_parents(
            self.config.selection_strategy,
            &self.population.genomes,
            pool_size,
            self.config.tournament_size,
            self.config.diversity_min_fitness,
            &mut self.rng,
        );

        while next.len() < population_size {
            let parent_a = &pool[self.rng.gen_range(0..pool.len())];
            let parent_b = &pool[self.rng.gen_range(0..pool.len())];

            let traits = operators::crossover(
                self.config.crossover_method,
                parent_a,
                parent_b,
                self.config.blend_alpha,
                &mut self.rng,
            );

            let id = self.next_id;
            self.next_id += 1;
            let mut child = Genome::from_traits(
                id,
                next_generation,
                traits,
                [Some(parent_a.id()), Some(parent_b.id())],
            );
            operators::mutate(
                &mut child,
                self.config.mutation_rate,
                self.config.mutation_strength,
                &mut self.rng,
            );
            self.lineage.record(&child);
            next.push(child);
        }

        Population::new(next_generation, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fitness::FitnessConfig;
    use crate::engines::evolution::progress::NullObserver;
    use crate::market::synthetic::{generate_synthetic, RegimeSegment};
    use crate::types::Regime;

    fn evaluator() -> GenomeEvaluator {
        let bars = generate_synthetic(
            &[RegimeSegment { regime: Regime::Bull, bars: 120 }],
            17,
        );
        GenomeEvaluator::new(bars, FitnessConfig::default())
    }

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 12,
            max_generations: 4,
            convergence_window: 10,
            random_seed: 3,
            ..Default::default()
        }
    }

    #[test]
    fn invalid_config_is_fatal_before_the_loop() {
        let config = EvolutionConfig {
            population_size: 1,
            ..Default::default()
        };
        assert!(EvolutionEngine::new(config, evaluator()).is_err());
    }

    #[test]
    fn run_produces_full_history_and_lineage() {
        let mut engine = EvolutionEngine::new(small_config(), evaluator()).unwrap();
        let outcome = engine.run(&mut NullObserver).unwrap();

        assert_eq!(outcome.state, RunState::BudgetExhausted);
        assert_eq!(outcome.history.len(), 4);
        assert!(outcome.best.fitness.is_some());
        // Every genome ever created is in the lineage graph.
        assert!(outcome.lineage.len() >= 12);
        for (i, record) in outcome.history.iter().enumerate() {
            assert_eq!(record.generation, i);
        }
    }

    #[test]
    fn identical_seeds_give_identical_histories() {
        let mut a = EvolutionEngine::new(small_config(), evaluator()).unwrap();
        let mut b = EvolutionEngine::new(small_config(), evaluator()).unwrap();
        let outcome_a = a.run(&mut NullObserver).unwrap();
        let outcome_b = b.run(&mut NullObserver).unwrap();

        assert_eq!(outcome_a.history.len(), outcome_b.history.len());
        for (ra, rb) in outcome_a.history.iter().zip(outcome_b.history.iter()) {
            assert_eq!(ra.max_fitness, rb.max_fitness);
            assert_eq!(ra.avg_fitness, rb.avg_fitness);
            assert_eq!(ra.best_genome_id, rb.best_genome_id);
        }
        assert_eq!(outcome_a.best.id(), outcome_b.best.id());
    }

    #[test]
    fn elitism_carries_the_best_genome_forward() {
        let mut engine = EvolutionEngine::new(small_config(), evaluator()).unwrap();
        let outcome = engine.run(&mut NullObserver).unwrap();

        // The final population still contains the previous generation's
        // best genome, carried over unchanged by elitism.
        let penultimate_best = outcome.history[outcome.history.len() - 2].best_genome_id;
        assert!(engine
            .population()
            .genomes
            .iter()
            .any(|g| g.id() == penultimate_best));
    }

    #[test]
    fn flat_improvement_triggers_convergence() {
        let config = EvolutionConfig {
            population_size: 10,
            max_generations: 50,
            convergence_window: 3,
            convergence_epsilon: 1.0,
            random_seed: 8,
            ..Default::default()
        };
        let mut engine = EvolutionEngine::new(config, evaluator()).unwrap();
        let outcome = engine.run(&mut NullObserver).unwrap();

        // Improvement can never reach an epsilon of 1.0, so the run stops
        // as soon as the window fills.
        assert_eq!(outcome.state, RunState::Converged);
        assert_eq!(outcome.history.len(), 4);
    }

    #[test]
    fn snapshot_round_trips_the_population() {
        let engine = EvolutionEngine::new(small_config(), evaluator()).unwrap();
        let snapshot = engine.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: RunSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.generation, 0);
        assert_eq!(restored.population.len(), 12);
        assert_eq!(restored.next_id, snapshot.next_id);

        let mut resumed =
            EvolutionEngine::resume(small_config(), evaluator(), restored).unwrap();
        let outcome = resumed.run(&mut NullObserver).unwrap();
        assert_eq!(outcome.history.len(), 4);
    }
}
