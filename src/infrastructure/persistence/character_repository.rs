//! Character repository implementation for SQLite

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::connection::{db_error, parse_id, SqliteConnection};
use crate::application::ports::outbound::{CharacterRepositoryPort, RepoError};
use crate::domain::entities::Character;
use crate::domain::value_objects::{
    CharacterClass, CharacterId, PlayerId, Position, StatusEffects,
};

const COLUMNS: &str = "id, owner_id, name, class, level, experience, gold, hp, max_hp, mp, max_mp, \
     strength, defense, magic, agility, position_x, position_y, current_floor, status_effects, created_at";

/// Repository for Character operations
pub struct SqliteCharacterRepository {
    connection: SqliteConnection,
}

impl SqliteCharacterRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CharacterRepositoryPort for SqliteCharacterRepository {
    async fn create(&self, character: &Character) -> Result<(), RepoError> {
        let effects_json = serde_json::to_string(&character.status_effects)
            .map_err(RepoError::serialization)?;

        sqlx::query(&format!(
            "INSERT INTO characters ({COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(character.id.to_string())
        .bind(character.owner.as_str())
        .bind(&character.name)
        .bind(character.class.as_str())
        .bind(character.level)
        .bind(character.experience)
        .bind(character.gold)
        .bind(character.hp)
        .bind(character.max_hp)
        .bind(character.mp)
        .bind(character.max_mp)
        .bind(character.strength)
        .bind(character.defense)
        .bind(character.magic)
        .bind(character.agility)
        .bind(character.position.x)
        .bind(character.position.y)
        .bind(character.current_floor)
        .bind(effects_json)
        .bind(character.created_at)
        .execute(self.connection.pool())
        .await
        .map_err(db_error("create_character"))?;

        tracing::debug!("Created character: {}", character.name);
        Ok(())
    }

    async fn get(&self, id: CharacterId, owner: &PlayerId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM characters WHERE id = ? AND owner_id = ?"
        ))
        .bind(id.to_string())
        .bind(owner.as_str())
        .fetch_optional(self.connection.pool())
        .await
        .map_err(db_error("get_character"))?;

        row.as_ref().map(row_to_character).transpose()
    }

    async fn list_by_owner(&self, owner: &PlayerId) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM characters
             WHERE owner_id = ?
             ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(owner.as_str())
        .fetch_all(self.connection.pool())
        .await
        .map_err(db_error("list_characters"))?;

        rows.iter().map(row_to_character).collect()
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let effects_json = serde_json::to_string(&character.status_effects)
            .map_err(RepoError::serialization)?;

        let result = sqlx::query(
            "UPDATE characters
             SET level = ?, experience = ?, gold = ?,
                 hp = ?, max_hp = ?, mp = ?, max_mp = ?,
                 strength = ?, defense = ?, magic = ?, agility = ?,
                 position_x = ?, position_y = ?, current_floor = ?,
                 status_effects = ?
             WHERE id = ?",
        )
        .bind(character.level)
        .bind(character.experience)
        .bind(character.gold)
        .bind(character.hp)
        .bind(character.max_hp)
        .bind(character.mp)
        .bind(character.max_mp)
        .bind(character.strength)
        .bind(character.defense)
        .bind(character.magic)
        .bind(character.agility)
        .bind(character.position.x)
        .bind(character.position.y)
        .bind(character.current_floor)
        .bind(effects_json)
        .bind(character.id.to_string())
        .execute(self.connection.pool())
        .await
        .map_err(db_error("save_character"))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::database(
                "save_character",
                format!("character {} does not exist", character.id),
            ));
        }

        tracing::debug!("Saved character: {}", character.name);
        Ok(())
    }
}

fn row_to_character(row: &SqliteRow) -> Result<Character, RepoError> {
    let get = db_error("decode_character");

    let id: String = row.try_get("id").map_err(&get)?;
    let owner: String = row.try_get("owner_id").map_err(&get)?;
    let class: String = row.try_get("class").map_err(&get)?;
    let effects_json: String = row.try_get("status_effects").map_err(&get)?;

    let class: CharacterClass = class.parse().map_err(RepoError::serialization)?;
    let status_effects: StatusEffects =
        serde_json::from_str(&effects_json).map_err(RepoError::serialization)?;

    Ok(Character {
        id: parse_id(&id)?,
        owner: PlayerId::new(owner),
        name: row.try_get("name").map_err(&get)?,
        class,
        level: row.try_get("level").map_err(&get)?,
        experience: row.try_get("experience").map_err(&get)?,
        gold: row.try_get("gold").map_err(&get)?,
        hp: row.try_get("hp").map_err(&get)?,
        max_hp: row.try_get("max_hp").map_err(&get)?,
        mp: row.try_get("mp").map_err(&get)?,
        max_mp: row.try_get("max_mp").map_err(&get)?,
        strength: row.try_get("strength").map_err(&get)?,
        defense: row.try_get("defense").map_err(&get)?,
        magic: row.try_get("magic").map_err(&get)?,
        agility: row.try_get("agility").map_err(&get)?,
        position: Position::new(
            row.try_get("position_x").map_err(&get)?,
            row.try_get("position_y").map_err(&get)?,
        ),
        current_floor: row.try_get("current_floor").map_err(&get)?,
        status_effects,
        created_at: row.try_get("created_at").map_err(&get)?,
    })
}
