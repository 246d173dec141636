//! Exploration progress and persisted tile flags

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{TileGrid, TileKind};
use crate::domain::value_objects::{CharacterId, Position};

/// The set of tiles a character has visited on one floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationRecord {
    pub character_id: CharacterId,
    pub floor_number: i32,
    /// Canonical `"x,y"` keys
    pub explored_tiles: BTreeSet<String>,
    pub updated_at: DateTime<Utc>,
}

impl ExplorationRecord {
    pub fn new(character_id: CharacterId, floor_number: i32) -> Self {
        Self {
            character_id,
            floor_number,
            explored_tiles: BTreeSet::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn has_visited(&self, position: Position) -> bool {
        self.explored_tiles.contains(&position.key())
    }
}

/// A flag that outlives floor regeneration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileFlag {
    Looted,
    Defeated,
}

impl TileFlag {
    /// Set the flag on `kind` if it is the matching variant
    pub fn apply(self, kind: &mut TileKind) {
        match (kind, self) {
            (TileKind::Chest { looted }, TileFlag::Looted) => *looted = true,
            (TileKind::Monster { defeated, .. }, TileFlag::Defeated) => *defeated = true,
            _ => {}
        }
    }
}

/// Sparse per-floor overrides, merged onto each freshly generated grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileOverrides {
    pub character_id: CharacterId,
    pub floor_number: i32,
    pub flags: BTreeMap<String, TileFlag>,
}

impl TileOverrides {
    pub fn new(character_id: CharacterId, floor_number: i32) -> Self {
        Self {
            character_id,
            floor_number,
            flags: BTreeMap::new(),
        }
    }

    pub fn mark(&mut self, position: Position, flag: TileFlag) {
        self.flags.insert(position.key(), flag);
    }

    /// Set the flags on matching tiles of `grid`.
    ///
    /// A flag only lands on a tile of the matching variant: `looted` on a
    /// chest, `defeated` on a monster. Anything else at that coordinate is
    /// left untouched.
    pub fn apply_to(&self, grid: &mut TileGrid) {
        for (key, flag) in &self.flags {
            let Some(position) = Position::from_key(key) else {
                continue;
            };
            let Some(tile) = grid.get_mut(position) else {
                continue;
            };
            flag.apply(&mut tile.kind);
        }
    }
}
