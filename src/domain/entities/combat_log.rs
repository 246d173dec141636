//! Combat log - the record of a finished encounter

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{CharacterId, CombatLogId, MonsterId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatLogOutcome {
    Victory,
    Defeat,
}

impl CombatLogOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "victory" => Some(Self::Victory),
            "defeat" => Some(Self::Defeat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatLog {
    pub id: CombatLogId,
    pub character_id: CharacterId,
    pub monster_id: MonsterId,
    pub damage_dealt: i32,
    pub damage_received: i32,
    pub outcome: CombatLogOutcome,
    pub experience_gained: i32,
    pub gold_gained: i32,
    pub created_at: DateTime<Utc>,
}

impl CombatLog {
    pub fn victory(
        character_id: CharacterId,
        monster_id: MonsterId,
        damage_dealt: i32,
        damage_received: i32,
        experience_gained: i32,
        gold_gained: i32,
    ) -> Self {
        Self {
            id: CombatLogId::new(),
            character_id,
            monster_id,
            damage_dealt,
            damage_received,
            outcome: CombatLogOutcome::Victory,
            experience_gained,
            gold_gained,
            created_at: Utc::now(),
        }
    }

    pub fn defeat(
        character_id: CharacterId,
        monster_id: MonsterId,
        damage_dealt: i32,
        damage_received: i32,
    ) -> Self {
        Self {
            id: CombatLogId::new(),
            character_id,
            monster_id,
            damage_dealt,
            damage_received,
            outcome: CombatLogOutcome::Defeat,
            experience_gained: 0,
            gold_gained: 0,
            created_at: Utc::now(),
        }
    }
}
