//! Character classes and their starting stat lines

use serde::{Deserialize, Serialize};

/// The four playable classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Stats a freshly created character starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub max_hp: i32,
    pub max_mp: i32,
    pub strength: i32,
    pub defense: i32,
    pub magic: i32,
    pub agility: i32,
}

impl CharacterClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Mage => "mage",
            Self::Rogue => "rogue",
            Self::Cleric => "cleric",
        }
    }

    pub fn base_stats(&self) -> BaseStats {
        match self {
            Self::Warrior => BaseStats {
                max_hp: 120,
                max_mp: 40,
                strength: 15,
                defense: 10,
                magic: 3,
                agility: 6,
            },
            Self::Mage => BaseStats {
                max_hp: 70,
                max_mp: 120,
                strength: 5,
                defense: 4,
                magic: 16,
                agility: 7,
            },
            Self::Rogue => BaseStats {
                max_hp: 90,
                max_mp: 60,
                strength: 10,
                defense: 6,
                magic: 5,
                agility: 15,
            },
            Self::Cleric => BaseStats {
                max_hp: 100,
                max_mp: 100,
                strength: 8,
                defense: 8,
                magic: 12,
                agility: 5,
            },
        }
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a class name is not one of the four playable classes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown character class: {0}")]
pub struct UnknownClass(pub String);

impl std::str::FromStr for CharacterClass {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warrior" => Ok(Self::Warrior),
            "mage" => Ok(Self::Mage),
            "rogue" => Ok(Self::Rogue),
            "cleric" => Ok(Self::Cleric),
            other => Err(UnknownClass(other.to_string())),
        }
    }
}
