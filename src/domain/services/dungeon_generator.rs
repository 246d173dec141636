//! Dungeon floor generation
//!
//! Every interior cell runs a fixed cascade of independent Bernoulli trials,
//! each against a fresh draw, and takes the first one that succeeds. The
//! cascade is not a normalized weighted choice: a floor tile is what remains
//! after every earlier trial failed, so tile statistics depend on the exact
//! order below.

use crate::domain::entities::{Tile, TileGrid, TileKind};
use crate::domain::services::RandomSource;
use crate::domain::value_objects::{MonsterId, Position};

/// Monster templates a generated floor draws from
pub const DEFAULT_MONSTER_POOL: [MonsterId; 3] =
    [MonsterId::new(1), MonsterId::new(2), MonsterId::new(3)];

/// Per-trial probabilities of the generation cascade, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileOdds {
    pub wall: f64,
    pub stairs_up: f64,
    pub stairs_down: f64,
    pub chest: f64,
    pub monster: f64,
}

impl Default for TileOdds {
    fn default() -> Self {
        Self {
            wall: 0.10,
            stairs_up: 0.05,
            stairs_down: 0.05,
            chest: 0.03,
            monster: 0.08,
        }
    }
}

/// Generates tile grids for dungeon floors
pub struct DungeonGenerator<'a, R: RandomSource + ?Sized> {
    rng: &'a R,
    odds: TileOdds,
    monster_pool: &'a [MonsterId],
}

impl<'a, R: RandomSource + ?Sized> DungeonGenerator<'a, R> {
    pub fn new(rng: &'a R) -> Self {
        Self {
            rng,
            odds: TileOdds::default(),
            monster_pool: &DEFAULT_MONSTER_POOL,
        }
    }

    /// Generate a `height` x `width` grid for `floor_number`.
    ///
    /// Border cells are walls and (5,5) is always floor. The spawn overwrite
    /// is skipped when the grid is too small to contain it.
    pub fn generate(&self, width: i32, height: i32, floor_number: i32) -> TileGrid {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| Tile::new(x, y, self.classify(x, y, width, height, floor_number)))
                    .collect()
            })
            .collect();

        let mut grid = TileGrid::from_rows(rows);
        if let Some(spawn) = grid.get_mut(Position::SPAWN) {
            spawn.kind = TileKind::Floor;
        }
        grid
    }

    fn classify(&self, x: i32, y: i32, width: i32, height: i32, floor_number: i32) -> TileKind {
        if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
            return TileKind::Wall;
        }

        if self.trial(self.odds.wall) {
            return TileKind::Wall;
        }
        // The draw is consumed on floor 1 too; only the outcome is gated.
        if self.trial(self.odds.stairs_up) && floor_number > 1 {
            return TileKind::StairsUp;
        }
        if self.trial(self.odds.stairs_down) {
            return TileKind::StairsDown;
        }
        if self.trial(self.odds.chest) {
            return TileKind::Chest { looted: false };
        }
        if self.trial(self.odds.monster) {
            if let Some(monster_id) = self.pick_monster() {
                return TileKind::Monster {
                    monster_id,
                    defeated: false,
                };
            }
        }
        TileKind::Floor
    }

    fn trial(&self, probability: f64) -> bool {
        self.rng.random_f64() < probability
    }

    fn pick_monster(&self) -> Option<MonsterId> {
        if self.monster_pool.is_empty() {
            return None;
        }
        let last = self.monster_pool.len() as i32 - 1;
        let index = self.rng.random_range(0, last) as usize;
        self.monster_pool.get(index).copied()
    }
}

/// Generate a floor with the default odds and monster pool
pub fn generate_floor<R: RandomSource + ?Sized>(
    rng: &R,
    width: i32,
    height: i32,
    floor_number: i32,
) -> TileGrid {
    DungeonGenerator::new(rng).generate(width, height, floor_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::FixedRandomPort;
    use crate::domain::services::random_source::MockRandomSource;
    use crate::infrastructure::random::ThreadRngAdapter;

    fn assert_border_and_spawn(grid: &TileGrid) {
        for tile in grid.rows().iter().flatten() {
            let Position { x, y } = tile.position;
            if x == 0 || y == 0 || x == grid.width() - 1 || y == grid.height() - 1 {
                assert_eq!(tile.kind, TileKind::Wall, "border tile at {}", tile.position);
            }
        }
        assert_eq!(grid.get(Position::SPAWN).map(|t| t.kind), Some(TileKind::Floor));
    }

    #[test]
    fn test_border_is_wall_and_spawn_is_floor_for_random_draws() {
        let rng = ThreadRngAdapter::new();
        for floor in 1..=5 {
            let grid = generate_floor(&rng, 20, 15, floor);
            assert_eq!(grid.width(), 20);
            assert_eq!(grid.height(), 15);
            assert_border_and_spawn(&grid);
        }
    }

    #[test]
    fn test_zero_draws_make_every_interior_tile_a_wall_except_spawn() {
        let rng = FixedRandomPort::constant(0);
        let grid = generate_floor(&rng, 10, 8, 3);

        assert_border_and_spawn(&grid);
        let floors = grid.rows().iter().flatten().filter(|t| t.kind == TileKind::Floor).count();
        assert_eq!(floors, 1);
    }

    #[test]
    fn test_high_draws_fall_through_to_floor() {
        let rng = FixedRandomPort::constant(50);
        let grid = generate_floor(&rng, 8, 8, 2);

        let mut interior = grid
            .rows().iter().flatten()
            .filter(|t| t.position.x > 0 && t.position.y > 0 && t.position.x < 7 && t.position.y < 7);
        assert!(interior.all(|t| t.kind == TileKind::Floor));
    }

    #[test]
    fn test_stairs_up_needs_floor_above_one() {
        // wall trial fails (0.50), stairs-up trial succeeds (0.00)
        let on_first = FixedRandomPort::new(vec![50, 0]);
        let grid = DungeonGenerator::new(&on_first).generate(3, 3, 1);
        // stairs-up draw is consumed, next trials see 0.50 then 0.00: chest
        assert_eq!(
            grid.get(Position::new(1, 1)).map(|t| t.kind),
            Some(TileKind::Chest { looted: false })
        );

        let deeper = FixedRandomPort::new(vec![50, 0]);
        let grid = DungeonGenerator::new(&deeper).generate(3, 3, 2);
        assert_eq!(grid.get(Position::new(1, 1)).map(|t| t.kind), Some(TileKind::StairsUp));
    }

    #[test]
    fn test_cascade_order_reaches_monster() {
        let mut rng = MockRandomSource::new();
        let mut draws = vec![0.99, 0.99, 0.99, 0.99, 0.01].into_iter();
        rng.expect_random_f64()
            .times(5)
            .returning(move || draws.next().unwrap_or(0.99));
        rng.expect_random_range()
            .withf(|min, max| *min == 0 && *max == 2)
            .times(1)
            .returning(|_, _| 2);

        let grid = DungeonGenerator::new(&rng).generate(3, 3, 4);
        assert_eq!(
            grid.get(Position::new(1, 1)).map(|t| t.kind),
            Some(TileKind::Monster {
                monster_id: MonsterId::new(3),
                defeated: false
            })
        );
    }

    #[test]
    fn test_small_grid_skips_spawn_overwrite() {
        let rng = FixedRandomPort::constant(0);
        let grid = generate_floor(&rng, 4, 4, 1);
        assert!(grid.get(Position::SPAWN).is_none());
        assert!(grid.rows().iter().flatten().all(|t| t.kind == TileKind::Wall));
    }
}
