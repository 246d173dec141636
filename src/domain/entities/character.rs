//! Character entity - a player-owned adventurer

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{
    CharacterClass, CharacterId, PlayerId, Position, StatusEffects,
};

/// A player character exploring the dungeon
///
/// Invariants: `0 <= hp <= max_hp` and `0 <= mp <= max_mp`. All mutators
/// below clamp to keep them.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub owner: PlayerId,
    pub name: String,
    pub class: CharacterClass,

    // Progression
    pub level: i32,
    pub experience: i32,
    pub gold: i32,

    // Resources
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,

    // Attributes
    pub strength: i32,
    pub defense: i32,
    pub magic: i32,
    pub agility: i32,

    // Location
    pub position: Position,
    pub current_floor: i32,

    /// Buffs consumed by basic attack rounds
    pub status_effects: StatusEffects,

    pub created_at: DateTime<Utc>,
}

impl Character {
    /// Create a level 1 character with the class's base stats at the spawn point of floor 1
    pub fn new(owner: PlayerId, name: impl Into<String>, class: CharacterClass) -> Self {
        let base = class.base_stats();
        Self {
            id: CharacterId::new(),
            owner,
            name: name.into(),
            class,
            level: 1,
            experience: 0,
            gold: 0,
            hp: base.max_hp,
            max_hp: base.max_hp,
            mp: base.max_mp,
            max_mp: base.max_mp,
            strength: base.strength,
            defense: base.defense,
            magic: base.magic,
            agility: base.agility,
            position: Position::SPAWN,
            current_floor: 1,
            status_effects: StatusEffects::new(),
            created_at: Utc::now(),
        }
    }

    /// A character at 0 HP cannot act until recovered
    pub fn is_incapacitated(&self) -> bool {
        self.hp <= 0
    }

    /// Set HP, clamped to `[0, max_hp]`
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Set MP, clamped to `[0, max_mp]`
    pub fn set_mp(&mut self, mp: i32) {
        self.mp = mp.clamp(0, self.max_mp);
    }

    /// Restore HP up to the maximum, returning the amount actually restored
    pub fn restore_hp(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.set_hp(self.hp + amount.max(0));
        self.hp - before
    }

    /// Restore MP up to the maximum, returning the amount actually restored
    pub fn restore_mp(&mut self, amount: i32) -> i32 {
        let before = self.mp;
        self.set_mp(self.mp + amount.max(0));
        self.mp - before
    }

    /// Missing HP, the ceiling for any heal
    pub fn missing_hp(&self) -> i32 {
        (self.max_hp - self.hp).max(0)
    }

    /// Move to a new floor, landing on its spawn point
    pub fn change_floor(&mut self, floor_number: i32) {
        self.current_floor = floor_number;
        self.position = Position::SPAWN;
    }
}
