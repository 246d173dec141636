//! Exploration tracking - which tiles a character has visited on a floor

use chrono::Utc;

use crate::domain::entities::ExplorationRecord;
use crate::domain::value_objects::{CharacterId, Position};

/// Record a visit to `position`.
///
/// Idempotent: visiting a tile already in the record returns it unchanged,
/// timestamp included.
pub fn mark_visited(mut record: ExplorationRecord, position: Position) -> ExplorationRecord {
    if record.has_visited(position) {
        return record;
    }
    record.explored_tiles.insert(position.key());
    record.updated_at = Utc::now();
    record
}

/// Mark a visit on an existing record, or start a fresh one for the floor
pub fn merge_or_create(
    existing: Option<ExplorationRecord>,
    character_id: CharacterId,
    floor_number: i32,
    position: Position,
) -> ExplorationRecord {
    let record =
        existing.unwrap_or_else(|| ExplorationRecord::new(character_id, floor_number));
    mark_visited(record, position)
}
