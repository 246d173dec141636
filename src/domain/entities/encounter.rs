//! Encounter entity - an ongoing fight owned by the server

use crate::domain::entities::Monster;
use crate::domain::value_objects::{EncounterId, MonsterId, Position};

/// A fight between a character and the monster on one tile.
///
/// Monster HP lives here rather than with the client. `round` counts the
/// attack rounds resolved so far; an attack must name the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encounter {
    pub id: EncounterId,
    pub monster_id: MonsterId,
    pub floor_number: i32,
    pub position: Position,
    pub monster_hp: i32,
    pub monster_max_hp: i32,
    pub round: u32,
}

impl Encounter {
    /// Start a fight against a fresh copy of `monster`
    pub fn start(monster: &Monster, floor_number: i32, position: Position) -> Self {
        Self {
            id: EncounterId::new(),
            monster_id: monster.id,
            floor_number,
            position,
            monster_hp: monster.hp,
            monster_max_hp: monster.hp,
            round: 0,
        }
    }

    /// Record a resolved attack round
    pub fn advance(&mut self, monster_hp: i32) {
        self.monster_hp = monster_hp.clamp(0, self.monster_max_hp);
        self.round += 1;
    }

    /// Damage dealt outside an attack round, such as an ability
    pub fn wound(&mut self, damage: i32) -> i32 {
        self.monster_hp = (self.monster_hp - damage.max(0)).max(0);
        self.monster_hp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slime() -> Monster {
        Monster {
            id: MonsterId::new(2),
            name: "Slime".to_string(),
            level: 1,
            hp: 15,
            attack: 4,
            defense: 1,
            experience_reward: 10,
            gold_reward: 3,
        }
    }

    #[test]
    fn test_encounter_starts_at_template_hp() {
        let encounter = Encounter::start(&slime(), 1, Position::new(3, 2));
        assert_eq!(encounter.monster_hp, 15);
        assert_eq!(encounter.monster_max_hp, 15);
        assert_eq!(encounter.round, 0);
    }

    #[test]
    fn test_advance_and_wound() {
        let mut encounter = Encounter::start(&slime(), 1, Position::new(3, 2));
        encounter.advance(9);
        assert_eq!((encounter.monster_hp, encounter.round), (9, 1));

        assert_eq!(encounter.wound(20), 0);
        assert_eq!(encounter.round, 1);
    }
}
