//! Grid coordinates and their canonical string key

use serde::{Deserialize, Serialize};

/// A cell coordinate on a dungeon floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Spawn point every floor guarantees to be walkable
    pub const SPAWN: Position = Position { x: 5, y: 5 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Canonical `"x,y"` key used by exploration records and tile overrides
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parse a canonical `"x,y"` key
    pub fn from_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        Some(Self {
            x: x.trim().parse().ok()?,
            y: y.trim().parse().ok()?,
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
