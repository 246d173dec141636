use serde::{Deserialize, Serialize};

use super::{CharacterResponseDto, EncounterDto, MonsterResponseDto, StatusEffectDto};
use crate::application::services::{AbilityResult, CombatResult, ItemUseResult};
use crate::domain::services::{StatUpdates, VictoryRewards};

#[derive(Debug, Deserialize)]
pub struct CombatRequestDto {
    pub character_id: String,
    /// "attack" or "flee"
    pub action: String,
    /// Round being answered; required for attacks
    #[serde(default)]
    pub round: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CombatRoundResponseDto {
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
    pub monster: MonsterResponseDto,
    /// Present while the fight goes on, with the round to answer next
    pub encounter: Option<EncounterDto>,
}

#[derive(Debug, Serialize)]
pub struct FleeResponseDto {
    pub fled: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CombatResponseDto {
    Round(CombatRoundResponseDto),
    Fled(FleeResponseDto),
}

impl From<CombatResult> for CombatResponseDto {
    fn from(result: CombatResult) -> Self {
        match result {
            CombatResult::Round {
                outcome,
                monster,
                encounter,
            } => Self::Round(CombatRoundResponseDto {
                monster_hp: outcome.monster_hp,
                character_hp: outcome.character_hp,
                victory: outcome.victory,
                defeat: outcome.defeat,
                damage_dealt: outcome.damage_dealt,
                damage_received: outcome.damage_received,
                critical: outcome.critical,
                experience_gained: outcome.experience_gained,
                gold_gained: outcome.gold_gained,
                level_up: outcome.level_up,
                level: outcome.level,
                monster: monster.into(),
                encounter: encounter.as_ref().map(EncounterDto::from),
            }),
            CombatResult::Fled(flee) => Self::Fled(FleeResponseDto { fled: flee.fled }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AbilityRequestDto {
    pub character_id: String,
    pub ability_type: String,
}

#[derive(Debug, Serialize)]
pub struct VictoryDto {
    pub experience_gained: i32,
    pub gold_gained: i32,
    pub level_up: bool,
}

impl From<VictoryRewards> for VictoryDto {
    fn from(r: VictoryRewards) -> Self {
        Self {
            experience_gained: r.experience_gained,
            gold_gained: r.gold_gained,
            level_up: r.level_up,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AbilityResponseDto {
    pub success: bool,
    pub message: String,
    pub stat_updates: StatUpdates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<StatusEffectDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heal_amount: Option<i32>,
    pub critical: bool,
    pub character: CharacterResponseDto,
    pub encounter: Option<EncounterDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub victory: Option<VictoryDto>,
}

impl From<AbilityResult> for AbilityResponseDto {
    fn from(result: AbilityResult) -> Self {
        let outcome = result.outcome;
        Self {
            success: outcome.success,
            message: outcome.message,
            stat_updates: outcome.stat_updates,
            effect: outcome.effect.as_ref().map(StatusEffectDto::from),
            damage: outcome.damage,
            heal_amount: outcome.heal_amount,
            critical: outcome.critical,
            character: result.character.into(),
            encounter: result.encounter.as_ref().map(EncounterDto::from),
            victory: result.victory.map(VictoryDto::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UseItemRequestDto {
    pub character_id: String,
    pub inventory_id: String,
}

#[derive(Debug, Serialize)]
pub struct UseItemResponseDto {
    pub success: bool,
    pub stat_updates: StatUpdates,
    pub remaining: i32,
}

impl From<ItemUseResult> for UseItemResponseDto {
    fn from(result: ItemUseResult) -> Self {
        Self {
            success: result.success,
            stat_updates: result.updates,
            remaining: result.remaining,
        }
    }
}
