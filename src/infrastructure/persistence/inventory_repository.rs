//! Inventory repository implementation for SQLite

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::catalog_repository::row_to_item;
use super::connection::{db_error, parse_id, SqliteConnection};
use crate::application::ports::outbound::{InventoryRepositoryPort, RepoError};
use crate::domain::entities::{InventoryEntry, InventoryItem};
use crate::domain::value_objects::{CharacterId, InventoryEntryId, ItemId};

const JOINED_SELECT: &str = "SELECT inv.id AS entry_id, inv.character_id, inv.item_id, inv.quantity, inv.equipped,
            i.name, i.item_type, i.rarity, i.attack_bonus, i.defense_bonus, i.hp_restore, i.mp_restore
     FROM inventory inv
     JOIN items i ON i.id = inv.item_id";

pub struct SqliteInventoryRepository {
    connection: SqliteConnection,
}

impl SqliteInventoryRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl InventoryRepositoryPort for SqliteInventoryRepository {
    async fn list(&self, character_id: CharacterId) -> Result<Vec<InventoryItem>, RepoError> {
        let rows = sqlx::query(&format!(
            "{JOINED_SELECT} WHERE inv.character_id = ? ORDER BY inv.rowid"
        ))
        .bind(character_id.to_string())
        .fetch_all(self.connection.pool())
        .await
        .map_err(db_error("list_inventory"))?;

        rows.iter().map(row_to_inventory_item).collect()
    }

    async fn get_entry(
        &self,
        entry_id: InventoryEntryId,
        character_id: CharacterId,
    ) -> Result<Option<InventoryItem>, RepoError> {
        let row = sqlx::query(&format!(
            "{JOINED_SELECT} WHERE inv.id = ? AND inv.character_id = ?"
        ))
        .bind(entry_id.to_string())
        .bind(character_id.to_string())
        .fetch_optional(self.connection.pool())
        .await
        .map_err(db_error("get_inventory_entry"))?;

        row.as_ref().map(row_to_inventory_item).transpose()
    }

    async fn add_item(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<InventoryEntry, RepoError> {
        let fresh = InventoryEntry::new(character_id, item_id, quantity);
        let mut tx = self
            .connection
            .pool()
            .begin()
            .await
            .map_err(db_error("add_item"))?;

        sqlx::query(
            "INSERT INTO inventory (id, character_id, item_id, quantity, equipped)
             VALUES (?, ?, ?, ?, 0)
             ON CONFLICT (character_id, item_id)
             DO UPDATE SET quantity = quantity + excluded.quantity",
        )
        .bind(fresh.id.to_string())
        .bind(character_id.to_string())
        .bind(item_id.value())
        .bind(quantity)
        .execute(&mut *tx)
        .await
        .map_err(db_error("add_item"))?;

        let row = sqlx::query(
            "SELECT id AS entry_id, character_id, item_id, quantity, equipped
             FROM inventory WHERE character_id = ? AND item_id = ?",
        )
        .bind(character_id.to_string())
        .bind(item_id.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("add_item"))?;

        tx.commit().await.map_err(db_error("add_item"))?;

        let entry = row_to_entry(&row)?;
        tracing::debug!(
            "Added {} x item {} for character {} (now {})",
            quantity,
            item_id,
            character_id,
            entry.quantity
        );
        Ok(entry)
    }

    async fn consume_one(&self, entry_id: InventoryEntryId) -> Result<i32, RepoError> {
        let mut tx = self
            .connection
            .pool()
            .begin()
            .await
            .map_err(db_error("consume_item"))?;

        let quantity: Option<(i32,)> = sqlx::query_as("SELECT quantity FROM inventory WHERE id = ?")
            .bind(entry_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("consume_item"))?;

        let Some((quantity,)) = quantity else {
            return Ok(0);
        };

        let remaining = (quantity - 1).max(0);
        if remaining == 0 {
            sqlx::query("DELETE FROM inventory WHERE id = ?")
                .bind(entry_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(db_error("consume_item"))?;
        } else {
            sqlx::query("UPDATE inventory SET quantity = ? WHERE id = ?")
                .bind(remaining)
                .bind(entry_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(db_error("consume_item"))?;
        }

        tx.commit().await.map_err(db_error("consume_item"))?;
        Ok(remaining)
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<InventoryEntry, RepoError> {
    let get = db_error("decode_inventory_entry");
    let id: String = row.try_get("entry_id").map_err(&get)?;
    let character_id: String = row.try_get("character_id").map_err(&get)?;
    let item_id: i64 = row.try_get("item_id").map_err(&get)?;

    Ok(InventoryEntry {
        id: parse_id(&id)?,
        character_id: parse_id(&character_id)?,
        item_id: ItemId::new(item_id),
        quantity: row.try_get("quantity").map_err(&get)?,
        equipped: row.try_get("equipped").map_err(&get)?,
    })
}

fn row_to_inventory_item(row: &SqliteRow) -> Result<InventoryItem, RepoError> {
    Ok(InventoryItem {
        entry: row_to_entry(row)?,
        item: row_to_item(row, "item_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Item;
    use crate::infrastructure::persistence::connection::test_connection;

    #[tokio::test]
    async fn test_looting_the_same_item_stacks() {
        let repo = SqliteInventoryRepository::new(test_connection().await);
        let character_id = CharacterId::new();

        let first = repo
            .add_item(character_id, Item::CHEST_LOOT, 1)
            .await
            .expect("add");
        let second = repo
            .add_item(character_id, Item::CHEST_LOOT, 2)
            .await
            .expect("add");

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 3);
        let items = repo.list(character_id).await.expect("list");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.name, "Health Potion");
    }

    #[tokio::test]
    async fn test_consume_decrements_then_removes() {
        let repo = SqliteInventoryRepository::new(test_connection().await);
        let character_id = CharacterId::new();
        let entry = repo
            .add_item(character_id, ItemId::new(7), 2)
            .await
            .expect("add");

        assert_eq!(repo.consume_one(entry.id).await.expect("consume"), 1);
        assert_eq!(repo.consume_one(entry.id).await.expect("consume"), 0);
        assert!(repo.list(character_id).await.expect("list").is_empty());
        assert_eq!(repo.consume_one(entry.id).await.expect("consume"), 0);
    }

    #[tokio::test]
    async fn test_entries_are_scoped_to_their_character() {
        let repo = SqliteInventoryRepository::new(test_connection().await);
        let owner = CharacterId::new();
        let entry = repo.add_item(owner, ItemId::new(6), 1).await.expect("add");

        let own = repo.get_entry(entry.id, owner).await.expect("get");
        let foreign = repo.get_entry(entry.id, CharacterId::new()).await.expect("get");

        assert_eq!(own.map(|i| i.item.hp_restore), Some(50));
        assert!(foreign.is_none());
    }
}
