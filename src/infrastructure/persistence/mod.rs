//! SQLite persistence adapters
//!
//! This module implements the outbound repository ports on top of a single
//! SQLite pool. The tile grid itself is never stored; only exploration,
//! tile overrides and the records derived from play are.

mod catalog_repository;
mod character_repository;
mod combat_log_repository;
mod connection;
mod exploration_repository;
mod inventory_repository;

pub use catalog_repository::SqliteCatalogRepository;
pub use character_repository::SqliteCharacterRepository;
pub use combat_log_repository::SqliteCombatLogRepository;
pub use connection::SqliteConnection;
pub use exploration_repository::{SqliteExplorationRepository, SqliteTileOverrideRepository};
pub use inventory_repository::SqliteInventoryRepository;

use anyhow::Result;

/// Combined repository providing access to all domain repositories
#[derive(Clone)]
pub struct SqliteRepository {
    connection: SqliteConnection,
}

impl SqliteRepository {
    /// Connect, create the schema and optionally seed the catalog
    pub async fn new(url: &str, seed_catalog: bool) -> Result<Self> {
        let connection = SqliteConnection::new(url).await?;
        connection.initialize_schema().await?;
        if seed_catalog {
            connection.seed_catalog().await?;
        }
        Ok(Self { connection })
    }

    pub fn characters(&self) -> SqliteCharacterRepository {
        SqliteCharacterRepository::new(self.connection.clone())
    }

    pub fn catalog(&self) -> SqliteCatalogRepository {
        SqliteCatalogRepository::new(self.connection.clone())
    }

    pub fn inventory(&self) -> SqliteInventoryRepository {
        SqliteInventoryRepository::new(self.connection.clone())
    }

    pub fn exploration(&self) -> SqliteExplorationRepository {
        SqliteExplorationRepository::new(self.connection.clone())
    }

    pub fn tile_overrides(&self) -> SqliteTileOverrideRepository {
        SqliteTileOverrideRepository::new(self.connection.clone())
    }

    pub fn combat_logs(&self) -> SqliteCombatLogRepository {
        SqliteCombatLogRepository::new(self.connection.clone())
    }
}
