use crate::genome::genome::{TraitVector, TRAIT_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of behavioral categories. Classification is a pure function
/// of the trait vector; the label is never stored apart from its traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Aggressor,
    Guardian,
    Opportunist,
    Analyst,
    Collaborator,
    Contrarian,
    Generalist,
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::Aggressor,
        Archetype::Guardian,
        Archetype::Opportunist,
        Archetype::Analyst,
        Archetype::Collaborator,
        Archetype::Contrarian,
        Archetype::Generalist,
    ];

    /// Prototype trait vector for each archetype, indexed as
    /// [risk, aggression, resilience, patience, cooperation].
    pub fn centroid(self) -> TraitVector {
        match self {
            Archetype::Aggressor => [0.90, 0.85, 0.50, 0.20, 0.30],
            Archetype::Guardian => [0.15, 0.20, 0.60, 0.85, 0.60],
            Archetype::Opportunist => [0.70, 0.75, 0.40, 0.35, 0.25],
            Archetype::Analyst => [0.40, 0.50, 0.70, 0.80, 0.50],
            Archetype::Collaborator => [0.45, 0.40, 0.55, 0.60, 0.90],
            Archetype::Contrarian => [0.65, 0.30, 0.80, 0.70, 0.20],
            Archetype::Generalist => [0.50, 0.50, 0.50, 0.50, 0.50],
        }
    }

    /// Nearest-centroid assignment by Euclidean distance. Ties resolve to
    /// the lowest archetype index.
    pub fn classify(traits: &TraitVector) -> Archetype {
        let mut best = Archetype::ALL[0];
        let mut best_dist = f64::INFINITY;

        for archetype in Archetype::ALL {
            let dist = squared_distance(traits, &archetype.centroid());
            if dist < best_dist {
                best_dist = dist;
                best = archetype;
            }
        }

        best
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Archetype::Aggressor => "aggressor",
            Archetype::Guardian => "guardian",
            Archetype::Opportunist => "opportunist",
            Archetype::Analyst => "analyst",
            Archetype::Collaborator => "collaborator",
            Archetype::Contrarian => "contrarian",
            Archetype::Generalist => "generalist",
        };
        write!(f, "{}", name)
    }
}

fn squared_distance(a: &TraitVector, b: &TraitVector) -> f64 {
    (0..TRAIT_COUNT).map(|i| (a[i] - b[i]).powi(2)).sum()
}
