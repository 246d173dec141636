//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.

use async_trait::async_trait;

use super::RepoError;
use crate::domain::entities::{
    Character, CombatLog, DungeonFloor, ExplorationRecord, InventoryEntry, InventoryItem, Item,
    Monster, TileOverrides,
};
use crate::domain::value_objects::{CharacterId, InventoryEntryId, ItemId, MonsterId, PlayerId};

// =============================================================================
// Character Repository Port
// =============================================================================

/// Repository port for player characters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    /// Create a new character
    async fn create(&self, character: &Character) -> Result<(), RepoError>;

    /// Get a character by ID, only if `owner` owns it
    async fn get(&self, id: CharacterId, owner: &PlayerId)
        -> Result<Option<Character>, RepoError>;

    /// List a player's characters, newest first
    async fn list_by_owner(&self, owner: &PlayerId) -> Result<Vec<Character>, RepoError>;

    /// Overwrite every mutable field of an existing character
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
}

// =============================================================================
// Catalog Repository Port
// =============================================================================

/// Read-only reference data: monsters, items and floor dimensions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepositoryPort: Send + Sync {
    async fn get_monster(&self, id: MonsterId) -> Result<Option<Monster>, RepoError>;

    /// All monster templates ordered by level
    async fn list_monsters(&self) -> Result<Vec<Monster>, RepoError>;

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepoError>;

    /// All items ordered by type, then rarity
    async fn list_items(&self) -> Result<Vec<Item>, RepoError>;

    async fn get_floor(&self, floor_number: i32) -> Result<Option<DungeonFloor>, RepoError>;
}

// =============================================================================
// Inventory Repository Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepositoryPort: Send + Sync {
    /// Every entry of a character joined with its item
    async fn list(&self, character_id: CharacterId) -> Result<Vec<InventoryItem>, RepoError>;

    /// Get one entry, only if it belongs to `character_id`
    async fn get_entry(
        &self,
        entry_id: InventoryEntryId,
        character_id: CharacterId,
    ) -> Result<Option<InventoryItem>, RepoError>;

    /// Add `quantity` of an item, stacking onto an existing entry when present
    async fn add_item(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<InventoryEntry, RepoError>;

    /// Remove one unit, deleting the entry at quantity 1. Returns the remaining quantity.
    async fn consume_one(&self, entry_id: InventoryEntryId) -> Result<i32, RepoError>;
}

// =============================================================================
// Exploration Repository Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExplorationRepositoryPort: Send + Sync {
    async fn get(
        &self,
        character_id: CharacterId,
        floor_number: i32,
    ) -> Result<Option<ExplorationRecord>, RepoError>;

    /// Upsert the record for its (character, floor)
    async fn save(&self, record: &ExplorationRecord) -> Result<(), RepoError>;

    /// All records of a character ordered by floor
    async fn list(&self, character_id: CharacterId) -> Result<Vec<ExplorationRecord>, RepoError>;
}

// =============================================================================
// Tile Override Repository Port
// =============================================================================

/// Looted chests and defeated monsters, per character and floor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TileOverrideRepositoryPort: Send + Sync {
    async fn get(
        &self,
        character_id: CharacterId,
        floor_number: i32,
    ) -> Result<Option<TileOverrides>, RepoError>;

    async fn save(&self, overrides: &TileOverrides) -> Result<(), RepoError>;
}

// =============================================================================
// Combat Log Repository Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CombatLogRepositoryPort: Send + Sync {
    async fn append(&self, log: &CombatLog) -> Result<(), RepoError>;

    /// The most recent logs of a character, newest first
    async fn list_recent(
        &self,
        character_id: CharacterId,
        limit: u32,
    ) -> Result<Vec<CombatLog>, RepoError>;
}
