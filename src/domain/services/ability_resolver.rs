//! Special ability resolution
//!
//! Rejections (wrong class, not enough MP, unknown name) are ordinary
//! outcomes with `success == false`, never errors, and leave the character
//! untouched.

use serde::Serialize;

use crate::domain::entities::Character;
use crate::domain::value_objects::{AbilityType, StatusEffect, StatusEffectKind};

pub const RAGE_TURNS: u32 = 3;
pub const STEALTH_TURNS: u32 = 2;

/// HP and MP after a successful ability, for clients to refresh their view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityOutcome {
    pub success: bool,
    pub message: String,
    pub stat_updates: StatUpdates,
    /// Buff applied to the caster
    pub effect: Option<StatusEffect>,
    /// Damage to the current opponent
    pub damage: Option<i32>,
    pub heal_amount: Option<i32>,
    pub critical: bool,
}

impl AbilityOutcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stat_updates: StatUpdates::default(),
            effect: None,
            damage: None,
            heal_amount: None,
            critical: false,
        }
    }

    fn succeeded(character: &Character, message: String) -> Self {
        Self {
            success: true,
            message,
            stat_updates: StatUpdates {
                hp: None,
                mp: Some(character.mp),
            },
            effect: None,
            damage: None,
            heal_amount: None,
            critical: false,
        }
    }
}

/// Resolve an ability by its wire name; unknown names are rejected
pub fn resolve_ability_by_name(character: &mut Character, name: &str) -> AbilityOutcome {
    match AbilityType::parse(name) {
        Some(ability) => resolve_ability(character, ability),
        None => AbilityOutcome::rejected(format!("Unknown ability '{}'", name.trim())),
    }
}

/// Resolve `ability` for `character`.
///
/// On success the MP cost is deducted, heals land immediately and buffs are
/// recorded on the character. Damage is only reported; applying it to a
/// monster is the caller's job.
pub fn resolve_ability(character: &mut Character, ability: AbilityType) -> AbilityOutcome {
    if ability.class() != character.class {
        return AbilityOutcome::rejected(format!(
            "{} cannot use {}",
            character.class,
            ability.display_name()
        ));
    }

    let cost = ability.mp_cost();
    if character.mp < cost {
        return AbilityOutcome::rejected(format!(
            "Not enough MP for {} ({} needed, {} available)",
            ability.display_name(),
            cost,
            character.mp
        ));
    }

    character.set_mp(character.mp - cost);

    match ability {
        AbilityType::Rage => buff(character, StatusEffectKind::Rage, RAGE_TURNS, "flies into a rage"),
        AbilityType::Stealth => buff(
            character,
            StatusEffectKind::Stealth,
            STEALTH_TURNS,
            "slips into the shadows",
        ),
        AbilityType::Charge => strike(character, ability, character.strength * 2, false),
        AbilityType::Fireball => strike(character, ability, character.magic * 2, false),
        AbilityType::Backstab => strike(character, ability, character.agility * 2, true),
        AbilityType::Smite => {
            let damage = (character.magic + character.strength) * 3 / 2;
            strike(character, ability, damage, false)
        }
        AbilityType::Heal => heal(character, ability, character.magic * 3),
        // Cleanse has nothing to remove: only buffs exist.
        AbilityType::DivineLight => heal(character, ability, character.magic * 4),
    }
}

fn buff(character: &mut Character, kind: StatusEffectKind, turns: u32, verb: &str) -> AbilityOutcome {
    let effect = StatusEffect::new(kind, turns);
    character.status_effects.apply(effect);

    let mut outcome =
        AbilityOutcome::succeeded(character, format!("{} {}!", character.name, verb));
    outcome.effect = Some(effect);
    outcome
}

fn strike(character: &Character, ability: AbilityType, damage: i32, critical: bool) -> AbilityOutcome {
    let damage = damage.max(0);
    let mut outcome = AbilityOutcome::succeeded(
        character,
        format!(
            "{} uses {} for {} damage{}",
            character.name,
            ability.display_name(),
            damage,
            if critical { " (critical!)" } else { "" }
        ),
    );
    outcome.damage = Some(damage);
    outcome.critical = critical;
    outcome
}

fn heal(character: &mut Character, ability: AbilityType, potency: i32) -> AbilityOutcome {
    let healed = potency.min(character.missing_hp()).max(0);
    character.set_hp(character.hp + healed);

    let mut outcome = AbilityOutcome::succeeded(
        character,
        format!("{} casts {} and recovers {} HP", character.name, ability.display_name(), healed),
    );
    outcome.stat_updates.hp = Some(character.hp);
    outcome.heal_amount = Some(healed);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CharacterClass, PlayerId};

    fn hero(class: CharacterClass) -> Character {
        Character::new(PlayerId::new("p1"), "Ayla", class)
    }

    #[test]
    fn test_wrong_class_is_rejected_regardless_of_mp() {
        let mut mage = hero(CharacterClass::Mage);
        mage.mp = mage.max_mp;
        let before = mage.clone();

        let outcome = resolve_ability(&mut mage, AbilityType::Backstab);

        assert!(!outcome.success);
        assert_eq!(mage, before);
    }

    #[test]
    fn test_rage_needs_twenty_mp() {
        let mut warrior = hero(CharacterClass::Warrior);
        warrior.mp = 19;
        let outcome = resolve_ability(&mut warrior, AbilityType::Rage);
        assert!(!outcome.success);
        assert_eq!(warrior.mp, 19);
        assert_eq!(warrior.status_effects.iter().count(), 0);

        warrior.mp = 20;
        let outcome = resolve_ability(&mut warrior, AbilityType::Rage);
        assert!(outcome.success);
        assert_eq!(warrior.mp, 0);
        assert_eq!(outcome.stat_updates.mp, Some(0));
        assert_eq!(warrior.status_effects.remaining(StatusEffectKind::Rage), RAGE_TURNS);
        assert_eq!(
            outcome.effect,
            Some(StatusEffect::new(StatusEffectKind::Rage, RAGE_TURNS))
        );
    }

    #[test]
    fn test_heal_is_capped_by_missing_hp() {
        let mut mage = hero(CharacterClass::Mage);
        mage.magic = 10;
        mage.max_hp = 100;
        mage.hp = 40;

        let outcome = resolve_ability(&mut mage, AbilityType::Heal);

        assert!(outcome.success);
        assert_eq!(outcome.heal_amount, Some(30));
        assert_eq!(mage.hp, 70);

        mage.mp = mage.max_mp;
        mage.hp = 95;
        let outcome = resolve_ability(&mut mage, AbilityType::Heal);
        assert_eq!(outcome.heal_amount, Some(5));
        assert_eq!(outcome.stat_updates.hp, Some(100));
    }

    #[test]
    fn test_divine_light_heals_four_times_magic() {
        let mut cleric = hero(CharacterClass::Cleric);
        cleric.magic = 10;
        cleric.max_hp = 100;
        cleric.hp = 40;

        let outcome = resolve_ability(&mut cleric, AbilityType::DivineLight);

        assert_eq!(outcome.heal_amount, Some(40));
        assert_eq!(cleric.hp, 80);
        assert_eq!(cleric.mp, cleric.max_mp - 30);
    }

    #[test]
    fn test_damage_abilities() {
        let mut warrior = hero(CharacterClass::Warrior);
        let outcome = resolve_ability(&mut warrior, AbilityType::Charge);
        assert_eq!(outcome.damage, Some(30));

        let mut rogue = hero(CharacterClass::Rogue);
        let outcome = resolve_ability(&mut rogue, AbilityType::Backstab);
        assert_eq!(outcome.damage, Some(30));
        assert!(outcome.critical);

        let mut cleric = hero(CharacterClass::Cleric);
        cleric.magic = 5;
        cleric.strength = 4;
        let outcome = resolve_ability(&mut cleric, AbilityType::Smite);
        // (5 + 4) * 1.5 = 13.5, floored
        assert_eq!(outcome.damage, Some(13));

        let mut mage = hero(CharacterClass::Mage);
        let outcome = resolve_ability(&mut mage, AbilityType::Fireball);
        assert_eq!(outcome.damage, Some(32));
        assert_eq!(mage.mp, 120 - 25);
    }

    #[test]
    fn test_recasting_stealth_keeps_longer_duration() {
        let mut rogue = hero(CharacterClass::Rogue);
        resolve_ability(&mut rogue, AbilityType::Stealth);
        rogue.status_effects.tick();
        assert_eq!(rogue.status_effects.remaining(StatusEffectKind::Stealth), 1);

        resolve_ability(&mut rogue, AbilityType::Stealth);
        assert_eq!(
            rogue.status_effects.remaining(StatusEffectKind::Stealth),
            STEALTH_TURNS
        );
    }

    #[test]
    fn test_unknown_ability_name_is_rejected() {
        let mut warrior = hero(CharacterClass::Warrior);
        let before = warrior.clone();

        let outcome = resolve_ability_by_name(&mut warrior, "meteor");

        assert!(!outcome.success);
        assert!(outcome.message.contains("meteor"));
        assert_eq!(warrior, before);
    }
}
