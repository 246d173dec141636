//! Inventory Service - listing and consuming items

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::application::errors::{GameError, GameResult};
use crate::application::ports::outbound::{CharacterRepositoryPort, InventoryRepositoryPort};
use crate::application::services::character_service::{load_owned, lock_owned};
use crate::domain::entities::InventoryItem;
use crate::domain::services::StatUpdates;
use crate::domain::value_objects::{CharacterId, InventoryEntryId, PlayerId};
use crate::infrastructure::session::SessionManager;

/// Result of using an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUseResult {
    pub success: bool,
    /// New HP/MP; empty when the item restores nothing
    pub updates: StatUpdates,
    /// Units left on the entry after use
    pub remaining: i32,
}

#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Every inventory entry of a character with its item
    async fn inventory(&self, owner: &PlayerId, id: CharacterId) -> GameResult<Vec<InventoryItem>>;

    /// Consume one unit of an inventory entry
    async fn use_item(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        entry_id: InventoryEntryId,
    ) -> GameResult<ItemUseResult>;
}

pub struct InventoryServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    inventory: Arc<dyn InventoryRepositoryPort>,
    sessions: Arc<SessionManager>,
}

impl InventoryServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        inventory: Arc<dyn InventoryRepositoryPort>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            characters,
            inventory,
            sessions,
        }
    }
}

#[async_trait]
impl InventoryService for InventoryServiceImpl {
    #[instrument(skip(self))]
    async fn inventory(&self, owner: &PlayerId, id: CharacterId) -> GameResult<Vec<InventoryItem>> {
        let character = load_owned(self.characters.as_ref(), owner, id).await?;
        let items = self.inventory.list(character.id).await?;
        debug!(count = items.len(), "Listed inventory");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn use_item(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        entry_id: InventoryEntryId,
    ) -> GameResult<ItemUseResult> {
        let (_session, mut character) =
            lock_owned(self.characters.as_ref(), &self.sessions, owner, id).await?;

        let InventoryItem { entry, item } = self
            .inventory
            .get_entry(entry_id, character.id)
            .await?
            .ok_or_else(|| GameError::not_found("Inventory entry", entry_id))?;

        let mut updates = StatUpdates::default();
        if item.hp_restore > 0 {
            character.restore_hp(item.hp_restore);
            updates.hp = Some(character.hp);
        }
        if item.mp_restore > 0 {
            character.restore_mp(item.mp_restore);
            updates.mp = Some(character.mp);
        }

        if !item.restores() {
            debug!(item = %item.name, "Item has no effect, not consumed");
            return Ok(ItemUseResult {
                success: true,
                updates,
                remaining: entry.quantity,
            });
        }

        self.characters.save(&character).await?;
        let remaining = self.inventory.consume_one(entry.id).await?;

        info!(character_id = %id, item = %item.name, remaining, "Used item");
        Ok(ItemUseResult {
            success: true,
            updates,
            remaining,
        })
    }
}
