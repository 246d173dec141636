//! Domain services - Pure game rules
//!
//! Randomness arrives through `RandomSource`; nothing here touches storage.

pub mod ability_resolver;
pub mod combat_resolver;
pub mod dungeon_generator;
pub mod exploration_tracker;
pub mod progression;
pub mod random_source;

pub use ability_resolver::{resolve_ability_by_name, AbilityOutcome, StatUpdates};
pub use combat_resolver::{resolve_attack, resolve_flee, CombatAction, CombatOutcome, FleeOutcome};
pub use dungeon_generator::generate_floor;
pub use exploration_tracker::merge_or_create;
pub use progression::{apply_victory, VictoryRewards};
pub use random_source::RandomSource;
