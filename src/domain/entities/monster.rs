//! Monster templates - immutable reference data

use crate::domain::value_objects::MonsterId;

/// A monster template
///
/// The hit points of a monster being fought live in the encounter, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub level: i32,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub experience_reward: i32,
    pub gold_reward: i32,
}
