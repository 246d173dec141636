//! Special abilities

use serde::{Deserialize, Serialize};

use super::CharacterClass;

/// Every special ability in the game, tagged by the class that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityType {
    // Warrior
    Rage,
    Charge,
    // Mage
    Fireball,
    Heal,
    // Rogue
    Backstab,
    Stealth,
    // Cleric
    DivineLight,
    Smite,
}

impl AbilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rage => "rage",
            Self::Charge => "charge",
            Self::Fireball => "fireball",
            Self::Heal => "heal",
            Self::Backstab => "backstab",
            Self::Stealth => "stealth",
            Self::DivineLight => "divine_light",
            Self::Smite => "smite",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rage => "Rage",
            Self::Charge => "Charge",
            Self::Fireball => "Fireball",
            Self::Heal => "Heal",
            Self::Backstab => "Backstab",
            Self::Stealth => "Stealth",
            Self::DivineLight => "Divine Light",
            Self::Smite => "Smite",
        }
    }

    /// The class allowed to use this ability
    pub fn class(&self) -> CharacterClass {
        match self {
            Self::Rage | Self::Charge => CharacterClass::Warrior,
            Self::Fireball | Self::Heal => CharacterClass::Mage,
            Self::Backstab | Self::Stealth => CharacterClass::Rogue,
            Self::DivineLight | Self::Smite => CharacterClass::Cleric,
        }
    }

    /// MP deducted on successful use
    pub fn mp_cost(&self) -> i32 {
        match self {
            Self::Rage => 20,
            Self::Charge => 15,
            Self::Fireball => 25,
            Self::Heal => 20,
            Self::Backstab => 15,
            Self::Stealth => 10,
            Self::DivineLight => 30,
            Self::Smite => 20,
        }
    }

    /// Parse the wire name of an ability; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "rage" => Some(Self::Rage),
            "charge" => Some(Self::Charge),
            "fireball" => Some(Self::Fireball),
            "heal" => Some(Self::Heal),
            "backstab" => Some(Self::Backstab),
            "stealth" => Some(Self::Stealth),
            "divine_light" => Some(Self::DivineLight),
            "smite" => Some(Self::Smite),
            _ => None,
        }
    }
}

impl std::fmt::Display for AbilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
