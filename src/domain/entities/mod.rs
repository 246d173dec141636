//! Domain entities - Core game objects

mod character;
mod combat_log;
mod dungeon;
mod encounter;
mod exploration;
mod item;
mod monster;

pub use character::Character;
pub use combat_log::{CombatLog, CombatLogOutcome};
pub use dungeon::{DungeonFloor, FloorLayout, Tile, TileGrid, TileKind};
pub use encounter::Encounter;
pub use exploration::{ExplorationRecord, TileFlag, TileOverrides};
pub use item::{InventoryEntry, InventoryItem, Item, ItemType, Rarity};
pub use monster::Monster;
