//! Application services - Use case implementations
//!
//! Each service follows hexagonal architecture principles, accepting
//! repository ports and returning domain entities. Operations that change a
//! character hold that character's session lock from load to save.

pub mod ability_service;
pub mod character_service;
pub mod combat_service;
pub mod dungeon_service;
pub mod inventory_service;

pub use ability_service::{AbilityResult, AbilityService, AbilityServiceImpl};
pub use character_service::{CharacterService, CharacterServiceImpl, CreateCharacterRequest};
pub use combat_service::{CombatResult, CombatService, CombatServiceImpl};
pub use dungeon_service::{
    DungeonService, DungeonServiceImpl, FloorView, InteractionOutcome, InteractionResult,
    MoveResult,
};
pub use inventory_service::{InventoryService, InventoryServiceImpl, ItemUseResult};
