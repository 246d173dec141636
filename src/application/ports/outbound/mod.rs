//! Outbound ports - Interfaces that the application requires from external systems

mod error;
mod random_port;
mod repository_port;

pub use error::RepoError;
#[cfg(test)]
pub use random_port::FixedRandomPort;
pub use random_port::RandomPort;
#[cfg(test)]
pub use repository_port::{
    MockCatalogRepositoryPort, MockCharacterRepositoryPort, MockCombatLogRepositoryPort,
    MockExplorationRepositoryPort, MockInventoryRepositoryPort, MockTileOverrideRepositoryPort,
};
pub use repository_port::{
    CatalogRepositoryPort, CharacterRepositoryPort, CombatLogRepositoryPort,
    ExplorationRepositoryPort, InventoryRepositoryPort, TileOverrideRepositoryPort,
};
