//! Progression - experience, gold and leveling after a victory

use crate::domain::entities::Character;

/// Experience needed to leave a level is `level * EXPERIENCE_PER_LEVEL`
pub const EXPERIENCE_PER_LEVEL: i32 = 100;

/// Max HP granted per level gained
pub const MAX_HP_PER_LEVEL: i32 = 10;

/// Rewards applied by a victory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictoryRewards {
    pub experience_gained: i32,
    pub gold_gained: i32,
    pub level_up: bool,
}

/// Grant experience and gold, leveling up at most once.
///
/// A reward crossing several thresholds still yields a single level; the
/// surplus experience carries over to the next victory. Current HP is not
/// changed by a level-up.
pub fn apply_victory(character: &mut Character, experience: i32, gold: i32) -> VictoryRewards {
    character.experience += experience;
    character.gold += gold;

    let level_up = character.experience >= character.level * EXPERIENCE_PER_LEVEL;
    if level_up {
        character.level += 1;
        character.max_hp += MAX_HP_PER_LEVEL;
    }

    VictoryRewards {
        experience_gained: experience,
        gold_gained: gold,
        level_up,
    }
}
