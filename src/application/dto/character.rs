use serde::{Deserialize, Serialize};

use crate::application::services::CreateCharacterRequest;
use crate::domain::entities::{Character, CombatLog, InventoryItem};
use crate::domain::value_objects::StatusEffect;

#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequestDto {
    pub name: String,
    pub class: String,
}

impl From<CreateCharacterRequestDto> for CreateCharacterRequest {
    fn from(dto: CreateCharacterRequestDto) -> Self {
        Self {
            name: dto.name,
            class: dto.class,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusEffectDto {
    pub kind: String,
    pub remaining_turns: u32,
}

impl From<&StatusEffect> for StatusEffectDto {
    fn from(effect: &StatusEffect) -> Self {
        Self {
            kind: effect.kind.as_str().to_string(),
            remaining_turns: effect.remaining_turns,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CharacterResponseDto {
    pub id: String,
    pub name: String,
    pub class: String,
    pub level: i32,
    pub experience: i32,
    pub gold: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub strength: i32,
    pub defense: i32,
    pub magic: i32,
    pub agility: i32,
    pub position_x: i32,
    pub position_y: i32,
    pub current_floor: i32,
    pub status_effects: Vec<StatusEffectDto>,
    pub created_at: String,
}

impl From<Character> for CharacterResponseDto {
    fn from(c: Character) -> Self {
        Self {
            id: c.id.to_string(),
            class: c.class.as_str().to_string(),
            level: c.level,
            experience: c.experience,
            gold: c.gold,
            hp: c.hp,
            max_hp: c.max_hp,
            mp: c.mp,
            max_mp: c.max_mp,
            strength: c.strength,
            defense: c.defense,
            magic: c.magic,
            agility: c.agility,
            position_x: c.position.x,
            position_y: c.position.y,
            current_floor: c.current_floor,
            status_effects: c.status_effects.iter().map(StatusEffectDto::from).collect(),
            created_at: c.created_at.to_rfc3339(),
            name: c.name,
        }
    }
}

/// An inventory entry flattened together with its item
#[derive(Debug, Serialize)]
pub struct InventoryItemResponseDto {
    pub id: String,
    pub item_id: i64,
    pub quantity: i32,
    pub equipped: bool,
    pub name: String,
    pub item_type: String,
    pub rarity: String,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub hp_restore: i32,
    pub mp_restore: i32,
}

impl From<InventoryItem> for InventoryItemResponseDto {
    fn from(InventoryItem { entry, item }: InventoryItem) -> Self {
        Self {
            id: entry.id.to_string(),
            item_id: item.id.value(),
            quantity: entry.quantity,
            equipped: entry.equipped,
            name: item.name,
            item_type: item.item_type.as_str().to_string(),
            rarity: item.rarity.as_str().to_string(),
            attack_bonus: item.attack_bonus,
            defense_bonus: item.defense_bonus,
            hp_restore: item.hp_restore,
            mp_restore: item.mp_restore,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CombatLogResponseDto {
    pub id: String,
    pub monster_id: i64,
    pub damage_dealt: i32,
    pub damage_received: i32,
    pub outcome: String,
    pub experience_gained: i32,
    pub gold_gained: i32,
    pub created_at: String,
}

impl From<CombatLog> for CombatLogResponseDto {
    fn from(log: CombatLog) -> Self {
        Self {
            id: log.id.to_string(),
            monster_id: log.monster_id.value(),
            damage_dealt: log.damage_dealt,
            damage_received: log.damage_received,
            outcome: log.outcome.as_str().to_string(),
            experience_gained: log.experience_gained,
            gold_gained: log.gold_gained,
            created_at: log.created_at.to_rfc3339(),
        }
    }
}
