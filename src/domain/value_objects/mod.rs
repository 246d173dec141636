//! Value objects - Immutable objects defined by their attributes

mod ability;
mod character_class;
mod ids;
mod position;
mod status_effect;

pub use ability::AbilityType;
pub use character_class::{CharacterClass, UnknownClass};
pub use ids::*;
pub use position::Position;
pub use status_effect::{StatusEffect, StatusEffectKind, StatusEffects};
