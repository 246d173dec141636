//! Combat resolution - one basic-attack exchange between a character and a monster
//!
//! Both strikes are computed from pre-round hit points: the monster
//! retaliates even when the character's blow kills it.

use crate::domain::entities::{Character, Monster};
use crate::domain::services::progression::{apply_victory, VictoryRewards};
use crate::domain::services::RandomSource;
use crate::domain::value_objects::{StatusEffectKind, StatusEffects};

/// Character attack roll is `strength + [0, CHARACTER_ATTACK_SPREAD]`
pub const CHARACTER_ATTACK_SPREAD: i32 = 9;
/// Monster attack roll is `attack + [0, MONSTER_ATTACK_SPREAD]`
pub const MONSTER_ATTACK_SPREAD: i32 = 4;
/// Every landed strike deals at least this much
pub const MIN_DAMAGE: i32 = 1;
pub const RAGE_MULTIPLIER: i32 = 2;
pub const CRITICAL_MULTIPLIER: i32 = 2;

/// Actions a character can take during an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatAction {
    Attack,
    Flee,
}

impl CombatAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "attack" => Some(Self::Attack),
            "flee" => Some(Self::Flee),
            _ => None,
        }
    }
}

/// Damage modifiers for the character's strike, derived from active buffs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundModifiers {
    pub rage: bool,
    pub critical: bool,
}

impl RoundModifiers {
    pub fn from_effects(effects: &StatusEffects) -> Self {
        Self {
            rage: effects.is_active(StatusEffectKind::Rage),
            critical: effects.is_active(StatusEffectKind::Stealth),
        }
    }

    fn damage_multiplier(&self) -> i32 {
        let mut multiplier = 1;
        if self.rage {
            multiplier *= RAGE_MULTIPLIER;
        }
        if self.critical {
            multiplier *= CRITICAL_MULTIPLIER;
        }
        multiplier
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Victory,
    Defeat,
    Continuing,
}

/// The raw result of one exchange, before any rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub damage_dealt: i32,
    pub damage_received: i32,
    pub monster_hp: i32,
    pub character_hp: i32,
    pub critical: bool,
    pub outcome: RoundOutcome,
}

/// Resolve one simultaneous exchange.
///
/// Draw order is fixed: the character's roll first, then the monster's.
/// Victory takes precedence when both sides drop to 0.
pub fn resolve_round<R: RandomSource + ?Sized>(
    character: &Character,
    monster: &Monster,
    monster_hp: i32,
    modifiers: RoundModifiers,
    rng: &R,
) -> RoundResult {
    let character_attack = character.strength + rng.random_range(0, CHARACTER_ATTACK_SPREAD);
    let damage_dealt = (character_attack - monster.defense).max(MIN_DAMAGE)
        * modifiers.damage_multiplier();

    let monster_attack = monster.attack + rng.random_range(0, MONSTER_ATTACK_SPREAD);
    let damage_received = (monster_attack - character.defense).max(MIN_DAMAGE);

    let monster_hp = (monster_hp - damage_dealt).max(0);
    let character_hp = (character.hp - damage_received).max(0);

    let outcome = if monster_hp == 0 {
        RoundOutcome::Victory
    } else if character_hp == 0 {
        RoundOutcome::Defeat
    } else {
        RoundOutcome::Continuing
    };

    RoundResult {
        damage_dealt,
        damage_received,
        monster_hp,
        character_hp,
        critical: modifiers.critical,
        outcome,
    }
}

/// Everything a caller needs after an attack round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatOutcome {
    pub monster_hp: i32,
    pub character_hp: i32,
    pub victory: bool,
    pub defeat: bool,
    pub damage_dealt: i32,
    pub damage_received: i32,
    pub critical: bool,
    pub experience_gained: i32,
    pub gold_gained: i32,
    pub level_up: bool,
    pub level: i32,
}

/// Resolve an attack round and apply it to the character.
///
/// Sets the character's HP, consumes one turn of every active buff, and on
/// victory grants the monster's rewards through progression.
pub fn resolve_attack<R: RandomSource + ?Sized>(
    character: &mut Character,
    monster: &Monster,
    monster_hp: i32,
    rng: &R,
) -> CombatOutcome {
    let modifiers = RoundModifiers::from_effects(&character.status_effects);
    let round = resolve_round(character, monster, monster_hp, modifiers, rng);

    character.set_hp(round.character_hp);
    character.status_effects.tick();

    let rewards = match round.outcome {
        RoundOutcome::Victory => {
            apply_victory(character, monster.experience_reward, monster.gold_reward)
        }
        RoundOutcome::Defeat | RoundOutcome::Continuing => VictoryRewards {
            experience_gained: 0,
            gold_gained: 0,
            level_up: false,
        },
    };

    CombatOutcome {
        monster_hp: round.monster_hp,
        character_hp: character.hp,
        victory: round.outcome == RoundOutcome::Victory,
        defeat: round.outcome == RoundOutcome::Defeat,
        damage_dealt: round.damage_dealt,
        damage_received: round.damage_received,
        critical: round.critical,
        experience_gained: rewards.experience_gained,
        gold_gained: rewards.gold_gained,
        level_up: rewards.level_up,
        level: character.level,
    }
}

/// Result of fleeing: the encounter ends with no exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleeOutcome {
    pub fled: bool,
}

pub fn resolve_flee() -> FleeOutcome {
    FleeOutcome { fled: true }
}
