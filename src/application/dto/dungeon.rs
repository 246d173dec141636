use serde::{Deserialize, Serialize};

use super::CharacterResponseDto;
use crate::application::services::{FloorView, InteractionOutcome, InteractionResult, MoveResult};
use crate::domain::entities::{Encounter, ExplorationRecord, FloorLayout, Item, Monster, Tile, TileKind};

/// A tile as the client draws it
#[derive(Debug, Clone, Serialize)]
pub struct TileDto {
    #[serde(rename = "type")]
    pub tile_type: &'static str,
    pub x: i32,
    pub y: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub looted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defeated: Option<bool>,
}

impl From<&Tile> for TileDto {
    fn from(tile: &Tile) -> Self {
        let (looted, monster_id, defeated) = match tile.kind {
            TileKind::Chest { looted } => (Some(looted), None, None),
            TileKind::Monster {
                monster_id,
                defeated,
            } => (None, Some(monster_id.value()), Some(defeated)),
            _ => (None, None, None),
        };
        Self {
            tile_type: tile.kind.as_str(),
            x: tile.position.x,
            y: tile.position.y,
            looted,
            monster_id,
            defeated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FloorResponseDto {
    pub floor_number: i32,
    pub width: i32,
    pub height: i32,
    /// Rows indexed by y, then x
    pub map: Vec<Vec<TileDto>>,
}

impl From<&FloorLayout> for FloorResponseDto {
    fn from(layout: &FloorLayout) -> Self {
        Self {
            floor_number: layout.floor.floor_number,
            width: layout.grid.width(),
            height: layout.grid.height(),
            map: layout
                .grid
                .rows()
                .iter()
                .map(|row| row.iter().map(TileDto::from).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EncounterDto {
    pub id: String,
    pub monster_id: i64,
    pub monster_hp: i32,
    pub monster_max_hp: i32,
    pub round: u32,
    pub x: i32,
    pub y: i32,
}

impl From<&Encounter> for EncounterDto {
    fn from(e: &Encounter) -> Self {
        Self {
            id: e.id.to_string(),
            monster_id: e.monster_id.value(),
            monster_hp: e.monster_hp,
            monster_max_hp: e.monster_max_hp,
            round: e.round,
            x: e.position.x,
            y: e.position.y,
        }
    }
}

/// The character's current floor with what they have already seen
#[derive(Debug, Serialize)]
pub struct FloorViewResponseDto {
    #[serde(flatten)]
    pub floor: FloorResponseDto,
    pub explored_tiles: Vec<String>,
    pub encounter: Option<EncounterDto>,
}

impl From<FloorView> for FloorViewResponseDto {
    fn from(view: FloorView) -> Self {
        Self {
            floor: FloorResponseDto::from(&view.layout),
            explored_tiles: view
                .explored
                .map(|record| record.explored_tiles.into_iter().collect())
                .unwrap_or_default(),
            encounter: view.encounter.as_ref().map(EncounterDto::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MonsterResponseDto {
    pub id: i64,
    pub name: String,
    pub level: i32,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub experience_reward: i32,
    pub gold_reward: i32,
}

impl From<Monster> for MonsterResponseDto {
    fn from(m: Monster) -> Self {
        Self {
            id: m.id.value(),
            name: m.name,
            level: m.level,
            hp: m.hp,
            attack: m.attack,
            defense: m.defense,
            experience_reward: m.experience_reward,
            gold_reward: m.gold_reward,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemResponseDto {
    pub id: i64,
    pub name: String,
    pub item_type: String,
    pub rarity: String,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub hp_restore: i32,
    pub mp_restore: i32,
}

impl From<Item> for ItemResponseDto {
    fn from(i: Item) -> Self {
        Self {
            id: i.id.value(),
            item_type: i.item_type.as_str().to_string(),
            rarity: i.rarity.as_str().to_string(),
            attack_bonus: i.attack_bonus,
            defense_bonus: i.defense_bonus,
            hp_restore: i.hp_restore,
            mp_restore: i.mp_restore,
            name: i.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveRequestDto {
    pub dx: i32,
    pub dy: i32,
}

#[derive(Debug, Serialize)]
pub struct MoveResponseDto {
    pub character: CharacterResponseDto,
    pub tile: TileDto,
    pub encounter: Option<EncounterDto>,
    pub monster: Option<MonsterResponseDto>,
}

impl From<MoveResult> for MoveResponseDto {
    fn from(result: MoveResult) -> Self {
        let (encounter, monster) = match result.encounter {
            Some((encounter, monster)) => (
                Some(EncounterDto::from(&encounter)),
                Some(MonsterResponseDto::from(monster)),
            ),
            None => (None, None),
        };
        Self {
            character: result.character.into(),
            tile: TileDto::from(&result.tile),
            encounter,
            monster,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InteractResponseDto {
    pub outcome: &'static str,
    pub item: Option<ItemResponseDto>,
    pub quantity: Option<i32>,
    pub character: CharacterResponseDto,
    pub floor: Option<FloorResponseDto>,
}

impl From<InteractionResult> for InteractResponseDto {
    fn from(result: InteractionResult) -> Self {
        let outcome = result.outcome.as_str();
        let (item, quantity) = match result.outcome {
            InteractionOutcome::Looted { item, quantity } => {
                (Some(ItemResponseDto::from(item)), Some(quantity))
            }
            _ => (None, None),
        };
        Self {
            outcome,
            item,
            quantity,
            character: result.character.into(),
            floor: result.floor.as_ref().map(FloorResponseDto::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExploreRequestDto {
    pub character_id: String,
    pub floor_number: i32,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Serialize)]
pub struct ExplorationResponseDto {
    pub character_id: String,
    pub floor_number: i32,
    pub explored_tiles: Vec<String>,
    pub updated_at: String,
}

impl From<ExplorationRecord> for ExplorationResponseDto {
    fn from(record: ExplorationRecord) -> Self {
        Self {
            character_id: record.character_id.to_string(),
            floor_number: record.floor_number,
            explored_tiles: record.explored_tiles.into_iter().collect(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}
