//! Gameplay services wired to the SQLite repositories

use std::sync::Arc;

use crate::application::ports::outbound::{
    CatalogRepositoryPort, CharacterRepositoryPort, CombatLogRepositoryPort,
    ExplorationRepositoryPort, InventoryRepositoryPort, RandomPort, TileOverrideRepositoryPort,
};
use crate::application::services::{
    AbilityService, AbilityServiceImpl, CombatService, CombatServiceImpl, DungeonService,
    DungeonServiceImpl, InventoryService, InventoryServiceImpl,
};
use crate::infrastructure::config::GameSettings;
use crate::infrastructure::persistence::SqliteRepository;
use crate::infrastructure::session::SessionManager;

/// Services for moving through the dungeon and fighting in it
///
/// Every service shares the same session manager so that one character's
/// requests serialize across all of them.
pub struct GameServices {
    pub dungeon_service: Arc<dyn DungeonService>,
    pub combat_service: Arc<dyn CombatService>,
    pub ability_service: Arc<dyn AbilityService>,
    pub inventory_service: Arc<dyn InventoryService>,
}

impl GameServices {
    pub fn new(
        repository: &SqliteRepository,
        sessions: Arc<SessionManager>,
        rng: Arc<dyn RandomPort>,
        settings: &GameSettings,
    ) -> Self {
        let characters: Arc<dyn CharacterRepositoryPort> = Arc::new(repository.characters());
        let catalog: Arc<dyn CatalogRepositoryPort> = Arc::new(repository.catalog());
        let inventory: Arc<dyn InventoryRepositoryPort> = Arc::new(repository.inventory());
        let exploration: Arc<dyn ExplorationRepositoryPort> = Arc::new(repository.exploration());
        let overrides: Arc<dyn TileOverrideRepositoryPort> = Arc::new(repository.tile_overrides());
        let logs: Arc<dyn CombatLogRepositoryPort> = Arc::new(repository.combat_logs());

        Self {
            dungeon_service: Arc::new(DungeonServiceImpl::new(
                Arc::clone(&characters),
                Arc::clone(&catalog),
                exploration,
                Arc::clone(&overrides),
                Arc::clone(&inventory),
                Arc::clone(&sessions),
                Arc::clone(&rng),
            )),
            combat_service: Arc::new(CombatServiceImpl::new(
                Arc::clone(&characters),
                Arc::clone(&catalog),
                Arc::clone(&overrides),
                Arc::clone(&logs),
                Arc::clone(&sessions),
                rng,
                settings.combat_log_limit,
            )),
            ability_service: Arc::new(AbilityServiceImpl::new(
                Arc::clone(&characters),
                catalog,
                overrides,
                logs,
                Arc::clone(&sessions),
            )),
            inventory_service: Arc::new(InventoryServiceImpl::new(characters, inventory, sessions)),
        }
    }
}
