//! Catalog repository - monsters, items and floor dimensions

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::connection::{db_error, SqliteConnection};
use crate::application::ports::outbound::{CatalogRepositoryPort, RepoError};
use crate::domain::entities::{DungeonFloor, Item, ItemType, Monster, Rarity};
use crate::domain::value_objects::{ItemId, MonsterId};

const MONSTER_COLUMNS: &str =
    "id, name, level, hp, attack, defense, experience_reward, gold_reward";
const ITEM_COLUMNS: &str =
    "id, name, item_type, rarity, attack_bonus, defense_bonus, hp_restore, mp_restore";

pub struct SqliteCatalogRepository {
    connection: SqliteConnection,
}

impl SqliteCatalogRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CatalogRepositoryPort for SqliteCatalogRepository {
    async fn get_monster(&self, id: MonsterId) -> Result<Option<Monster>, RepoError> {
        let row = sqlx::query(&format!("SELECT {MONSTER_COLUMNS} FROM monsters WHERE id = ?"))
            .bind(id.value())
            .fetch_optional(self.connection.pool())
            .await
            .map_err(db_error("get_monster"))?;

        row.as_ref().map(row_to_monster).transpose()
    }

    async fn list_monsters(&self) -> Result<Vec<Monster>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {MONSTER_COLUMNS} FROM monsters ORDER BY level, id"
        ))
        .fetch_all(self.connection.pool())
        .await
        .map_err(db_error("list_monsters"))?;

        rows.iter().map(row_to_monster).collect()
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"))
            .bind(id.value())
            .fetch_optional(self.connection.pool())
            .await
            .map_err(db_error("get_item"))?;

        row.as_ref().map(|row| row_to_item(row, "id")).transpose()
    }

    async fn list_items(&self) -> Result<Vec<Item>, RepoError> {
        let rows = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items"))
            .fetch_all(self.connection.pool())
            .await
            .map_err(db_error("list_items"))?;

        let mut items = rows
            .iter()
            .map(|row| row_to_item(row, "id"))
            .collect::<Result<Vec<_>, _>>()?;
        // Rarity has a rank, not an alphabetical order
        items.sort_by_key(|item| (item.item_type, item.rarity, item.id));
        Ok(items)
    }

    async fn get_floor(&self, floor_number: i32) -> Result<Option<DungeonFloor>, RepoError> {
        let row: Option<(i32, i32, i32)> = sqlx::query_as(
            "SELECT floor_number, width, height FROM dungeon_floors WHERE floor_number = ?",
        )
        .bind(floor_number)
        .fetch_optional(self.connection.pool())
        .await
        .map_err(db_error("get_floor"))?;

        Ok(row.map(|(floor_number, width, height)| DungeonFloor {
            floor_number,
            width,
            height,
        }))
    }
}

fn row_to_monster(row: &SqliteRow) -> Result<Monster, RepoError> {
    let get = db_error("decode_monster");
    let id: i64 = row.try_get("id").map_err(&get)?;

    Ok(Monster {
        id: MonsterId::new(id),
        name: row.try_get("name").map_err(&get)?,
        level: row.try_get("level").map_err(&get)?,
        hp: row.try_get("hp").map_err(&get)?,
        attack: row.try_get("attack").map_err(&get)?,
        defense: row.try_get("defense").map_err(&get)?,
        experience_reward: row.try_get("experience_reward").map_err(&get)?,
        gold_reward: row.try_get("gold_reward").map_err(&get)?,
    })
}

/// Decode an item from a row carrying the item columns; `id_column` names
/// the column holding the item id, which differs in joined queries.
pub(super) fn row_to_item(row: &SqliteRow, id_column: &str) -> Result<Item, RepoError> {
    let get = db_error("decode_item");
    let id: i64 = row.try_get(id_column).map_err(&get)?;
    let item_type: String = row.try_get("item_type").map_err(&get)?;
    let rarity: String = row.try_get("rarity").map_err(&get)?;

    Ok(Item {
        id: ItemId::new(id),
        name: row.try_get("name").map_err(&get)?,
        item_type: ItemType::parse(&item_type)
            .ok_or_else(|| RepoError::serialization(format!("unknown item type '{item_type}'")))?,
        rarity: Rarity::parse(&rarity)
            .ok_or_else(|| RepoError::serialization(format!("unknown rarity '{rarity}'")))?,
        attack_bonus: row.try_get("attack_bonus").map_err(&get)?,
        defense_bonus: row.try_get("defense_bonus").map_err(&get)?,
        hp_restore: row.try_get("hp_restore").map_err(&get)?,
        mp_restore: row.try_get("mp_restore").map_err(&get)?,
    })
}
