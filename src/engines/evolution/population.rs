use crate::genome::Genome;
use serde::{Deserialize, Serialize};

/// The genomes of one generation plus summary statistics.
///
/// Owned by the evolution engine for the generation's lifetime; once
/// superseded it survives only as a `GenerationRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    pub generation: usize,
    pub genomes: Vec<Genome>,
}

impl Population {
    pub fn new(generation: usize, genomes: Vec<Genome>) -> Self {
        Self { generation, genomes }
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Average fitness over evaluated genomes; 0 before evaluation.
    pub fn avg_fitness(&self) -> f64 {
        let scores: Vec<f64> = self.genomes.iter().filter_map(|g| g.fitness).collect();
        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }

    pub fn max_fitness(&self) -> f64 {
        self.genomes
            .iter()
            .filter_map(|g| g.fitness)
            .fold(0.0, f64::max)
    }

    /// Highest-fitness genome; ties resolve to the lowest id.
    pub fn best(&self) -> Option<&Genome> {
        let mut best: Option<&Genome> = None;
        for genome in &self.genomes {
            let Some(fitness) = genome.fitness else { continue };
            match best {
                None => best = Some(genome),
                Some(current) => {
                    let current_fitness = current.fitness.unwrap_or(f64::MIN);
                    if fitness > current_fitness
                        || (fitness == current_fitness && genome.id() < current.id())
                    {
                        best = Some(genome);
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genome(id: u64, fitness: Option<f64>) -> Genome {
        let mut g = Genome::from_traits(id, 0, [0.5; 5], [None, None]);
        g.fitness = fitness;
        g
    }

    #[test]
    fn stats_over_evaluated_genomes_only() {
        let population = Population::new(
            0,
            vec![genome(0, Some(0.2)), genome(1, Some(0.6)), genome(2, None)],
        );
        assert!((population.avg_fitness() - 0.4).abs() < 1e-12);
        assert!((population.max_fitness() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn best_breaks_ties_by_lowest_id() {
        let population = Population::new(
            0,
            vec![genome(3, Some(0.5)), genome(1, Some(0.5)), genome(2, Some(0.1))],
        );
        assert_eq!(population.best().unwrap().id(), 1);
    }

    #[test]
    fn unevaluated_population_has_no_best() {
        let population = Population::new(0, vec![genome(0, None)]);
        assert!(population.best().is_none());
    }
}
