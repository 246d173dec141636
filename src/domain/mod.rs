//! Domain layer - Core game rules with no I/O
//!
//! This layer contains:
//! - Entities: Character, Monster, Item, dungeon tiles, exploration records
//! - Value Objects: identifiers, classes, abilities, status effects
//! - Domain Services: floor generation, combat, abilities, progression

pub mod entities;
pub mod services;
pub mod value_objects;
