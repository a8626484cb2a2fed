use crate::genome::archetype::Archetype;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TRAIT_COUNT: usize = 5;

/// Behavioral DNA: 5 continuous traits, each in [0, 1], indexed as
/// [risk, aggression, resilience, patience, cooperation].
pub type TraitVector = [f64; TRAIT_COUNT];

/// One mutation applied at genome birth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MutationEvent {
    pub trait_index: usize,
    pub delta: f64,
    pub generation: usize,
}

/// Trait-vector representation of an agent's behavior.
///
/// Genomes are created by random initialization (generation 0) or by
/// crossover + mutation; after the birth-time mutation step the traits
/// never change. The archetype is recomputed from the traits on every
/// construction, so it cannot desync from its source vector. Parent
/// references are ids only, never owned genomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    id: u64,
    traits: TraitVector,
    archetype: Archetype,
    pub fitness: Option<f64>,
    pub generation: usize,
    pub parents: [Option<u64>; 2],
    pub mutation_log: Vec<MutationEvent>,
}

impl Genome {
    /// Generation-0 genome: 5 independent uniform draws in [0, 1].
    pub fn random<R: Rng>(id: u64, generation: usize, rng: &mut R) -> Self {
        let traits: TraitVector = std::array::from_fn(|_| rng.gen::<f64>());
        Self::from_traits(id, generation, traits, [None, None])
    }

    /// Child genome from a crossover trait vector. Traits are clamped to
    /// [0, 1] before classification.
    pub fn from_traits(
        id: u64,
        generation: usize,
        mut traits: TraitVector,
        parents: [Option<u64>; 2],
    ) -> Self {
        for t in traits.iter_mut() {
            *t = t.clamp(0.0, 1.0);
        }
        let archetype = Archetype::classify(&traits);
        Self {
            id,
            traits,
            archetype,
            fitness: None,
            generation,
            parents,
            mutation_log: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn traits(&self) -> &TraitVector {
        &self.traits
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Birth-time trait perturbation. The only sanctioned trait change;
    /// clamps to [0, 1], reclassifies, and records the event.
    pub fn apply_mutation(&mut self, trait_index: usize, delta: f64) {
        let old = self.traits[trait_index];
        self.traits[trait_index] = (old + delta).clamp(0.0, 1.0);
        self.archetype = Archetype::classify(&self.traits);
        self.mutation_log.push(MutationEvent {
            trait_index,
            delta,
            generation: self.generation,
        });
    }

    /// Euclidean distance between trait vectors.
    pub fn distance(&self, other: &Genome) -> f64 {
        self.traits
            .iter()
            .zip(other.traits.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Similarity in [0, 1]: 1 − distance normalized by the trait-space
    /// diagonal (√5). Used by diversity-aware selection.
    pub fn compatibility(&self, other: &Genome) -> f64 {
        let max_distance = (TRAIT_COUNT as f64).sqrt();
        1.0 - self.distance(other) / max_distance
    }
}
