use crate::genome::Genome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable summary emitted once per completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub avg_fitness: f64,
    pub max_fitness: f64,
    pub best_genome_id: u64,
    /// Freshly evaluated genomes whose backtest failed and received the
    /// fitness floor. Carried-over elites are not re-run.
    pub error_count: usize,
}

/// Parent-child edges across the whole run. Stores ids only; genomes are
/// never owned here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineageGraph {
    parents: HashMap<u64, [Option<u64>; 2]>,
}

impl LineageGraph {
    pub fn record(&mut self, genome: &Genome) {
        self.parents.insert(genome.id(), genome.parents);
    }

    pub fn parents_of(&self, id: u64) -> Option<[Option<u64>; 2]> {
        self.parents.get(&id).copied()
    }

    /// All ancestor ids reachable from `id`, nearest first.
    pub fn ancestors(&self, id: u64) -> Vec<u64> {
        let mut seen = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            if let Some(parents) = self.parents_of(current) {
                for parent in parents.into_iter().flatten() {
                    if !seen.contains(&parent) {
                        seen.push(parent);
                        frontier.push(parent);
                    }
                }
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Append-only run history: per-generation records plus the best genome
/// observed so far.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    records: Vec<GenerationRecord>,
    best: Option<Genome>,
}

impl RunHistory {
    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    pub fn observe(&mut self, candidate: &Genome) {
        let candidate_fitness = candidate.fitness.unwrap_or(f64::MIN);
        let current_fitness = self
            .best
            .as_ref()
            .and_then(|g| g.fitness)
            .unwrap_or(f64::MIN);
        if self.best.is_none() || candidate_fitness > current_fitness {
            self.best = Some(candidate.clone());
        }
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    /// Average-fitness improvement over the trailing `window` records,
    /// once enough history exists.
    pub fn improvement_over(&self, window: usize) -> Option<f64> {
        if self.records.len() <= window {
            return None;
        }
        let last = self.records.last().unwrap().avg_fitness;
        let earlier = self.records[self.records.len() - 1 - window].avg_fitness;
        Some(last - earlier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(generation: usize, avg: f64) -> GenerationRecord {
        GenerationRecord {
            generation,
            avg_fitness: avg,
            max_fitness: avg,
            best_genome_id: 0,
            error_count: 0,
        }
    }

    #[test]
    fn improvement_needs_enough_history() {
        let mut history = RunHistory::default();
        history.push(record(0, 0.2));
        assert_eq!(history.improvement_over(2), None);
        history.push(record(1, 0.3));
        history.push(record(2, 0.5));
        let improvement = history.improvement_over(2).unwrap();
        assert!((improvement - 0.3).abs() < 1e-12);
    }

    #[test]
    fn lineage_walks_ancestors() {
        let mut lineage = LineageGraph::default();
        let founder_a = Genome::from_traits(0, 0, [0.5; 5], [None, None]);
        let founder_b = Genome::from_traits(1, 0, [0.4; 5], [None, None]);
        let child = Genome::from_traits(2, 1, [0.45; 5], [Some(0), Some(1)]);
        let grandchild = Genome::from_traits(3, 2, [0.45; 5], [Some(2), Some(0)]);
        for g in [&founder_a, &founder_b, &child, &grandchild] {
            lineage.record(g);
        }

        let ancestors = lineage.ancestors(3);
        assert!(ancestors.contains(&2));
        assert!(ancestors.contains(&1));
        assert!(ancestors.contains(&0));
        assert_eq!(lineage.parents_of(2), Some([Some(0), Some(1)]));
    }

    #[test]
    fn observe_keeps_the_fittest() {
        let mut history = RunHistory::default();
        let mut a = Genome::from_traits(0, 0, [0.5; 5], [None, None]);
        a.fitness = Some(0.4);
        let mut b = Genome::from_traits(1, 0, [0.6; 5], [None, None]);
        b.fitness = Some(0.7);
        let mut c = Genome::from_traits(2, 0, [0.7; 5], [None, None]);
        c.fitness = Some(0.5);

        history.observe(&a);
        history.observe(&b);
        history.observe(&c);
        assert_eq!(history.best().unwrap().id(), 1);
    }
}
