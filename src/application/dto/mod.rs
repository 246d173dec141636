//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP adapter can serialize and
//! deserialize without shaping the domain model around JSON.

pub mod character;
pub mod dungeon;
pub mod game;

pub use character::*;
pub use dungeon::*;
pub use game::*;
