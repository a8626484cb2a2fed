pub mod archetype;
pub mod behavior;
pub mod genome;

pub use archetype::Archetype;
pub use behavior::BehaviorParams;
pub use genome::{Genome, MutationEvent, TraitVector, TRAIT_COUNT};
