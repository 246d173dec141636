//! Dungeon floors and their tile grids

use crate::domain::value_objects::{MonsterId, Position};

/// Floor reference data: the dimensions of one dungeon level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DungeonFloor {
    pub floor_number: i32,
    pub width: i32,
    pub height: i32,
}

/// What occupies a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Wall,
    Floor,
    StairsUp,
    StairsDown,
    Chest { looted: bool },
    Monster { monster_id: MonsterId, defeated: bool },
}

impl TileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::StairsUp => "stairs_up",
            Self::StairsDown => "stairs_down",
            Self::Chest { .. } => "chest",
            Self::Monster { .. } => "monster",
        }
    }

    pub fn is_walkable(&self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub position: Position,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(x: i32, y: i32, kind: TileKind) -> Self {
        Self {
            position: Position::new(x, y),
            kind,
        }
    }
}

/// A generated floor layout, stored row-major as `rows[y][x]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    rows: Vec<Vec<Tile>>,
}

impl TileGrid {
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len() as i32).unwrap_or(0);
        Self {
            width,
            height,
            rows,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }

    pub fn get(&self, position: Position) -> Option<&Tile> {
        if !self.contains(position) {
            return None;
        }
        self.rows
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut Tile> {
        if !self.contains(position) {
            return None;
        }
        self.rows
            .get_mut(position.y as usize)
            .and_then(|row| row.get_mut(position.x as usize))
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }
}

/// A floor definition together with one generated grid instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorLayout {
    pub floor: DungeonFloor,
    pub grid: TileGrid,
}
