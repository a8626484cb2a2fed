use crate::genome::genome::Genome;
use serde::{Deserialize, Serialize};

/// Named behavior modifiers derived from a genome's raw traits.
///
/// The mapping is a fixed set of linear/product combinations of trait
/// pairs; it is pure and side-effect-free, and every output stays in
/// [0, 1] as long as the traits do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorParams {
    pub risk_tolerance: f64,
    pub aggressiveness: f64,
    pub stress_resistance: f64,
    pub patience: f64,
    pub cooperativeness: f64,
}

impl BehaviorParams {
    pub fn derive(genome: &Genome) -> Self {
        let [risk, aggression, resilience, patience, cooperation] = *genome.traits();

        Self {
            risk_tolerance: 0.7 * risk + 0.3 * aggression,
            aggressiveness: 0.6 * aggression + 0.4 * risk * resilience,
            stress_resistance: 0.5 * resilience + 0.5 * (1.0 - risk * aggression),
            patience: 0.8 * patience + 0.2 * (1.0 - aggression),
            cooperativeness: 0.6 * cooperation + 0.4 * patience,
        }
    }
}
