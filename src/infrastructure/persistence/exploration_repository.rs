//! Exploration and tile override repositories
//!
//! Both are keyed by (character, floor) and store their payload as a JSON column.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::connection::{db_error, parse_id, SqliteConnection};
use crate::application::ports::outbound::{
    ExplorationRepositoryPort, RepoError, TileOverrideRepositoryPort,
};
use crate::domain::entities::{ExplorationRecord, TileFlag, TileOverrides};
use crate::domain::value_objects::CharacterId;

pub struct SqliteExplorationRepository {
    connection: SqliteConnection,
}

impl SqliteExplorationRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }
}

type ExplorationRow = (String, i32, String, DateTime<Utc>);

fn row_to_record(
    (character_id, floor_number, tiles_json, updated_at): ExplorationRow,
) -> Result<ExplorationRecord, RepoError> {
    let explored_tiles: BTreeSet<String> =
        serde_json::from_str(&tiles_json).map_err(RepoError::serialization)?;
    Ok(ExplorationRecord {
        character_id: parse_id(&character_id)?,
        floor_number,
        explored_tiles,
        updated_at,
    })
}

#[async_trait]
impl ExplorationRepositoryPort for SqliteExplorationRepository {
    async fn get(
        &self,
        character_id: CharacterId,
        floor_number: i32,
    ) -> Result<Option<ExplorationRecord>, RepoError> {
        let row: Option<ExplorationRow> = sqlx::query_as(
            "SELECT character_id, floor_number, explored_tiles, updated_at
             FROM exploration WHERE character_id = ? AND floor_number = ?",
        )
        .bind(character_id.to_string())
        .bind(floor_number)
        .fetch_optional(self.connection.pool())
        .await
        .map_err(db_error("get_exploration"))?;

        row.map(row_to_record).transpose()
    }

    async fn save(&self, record: &ExplorationRecord) -> Result<(), RepoError> {
        let tiles_json =
            serde_json::to_string(&record.explored_tiles).map_err(RepoError::serialization)?;

        sqlx::query(
            "INSERT INTO exploration (character_id, floor_number, explored_tiles, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (character_id, floor_number)
             DO UPDATE SET explored_tiles = excluded.explored_tiles, updated_at = excluded.updated_at",
        )
        .bind(record.character_id.to_string())
        .bind(record.floor_number)
        .bind(tiles_json)
        .bind(record.updated_at)
        .execute(self.connection.pool())
        .await
        .map_err(db_error("save_exploration"))?;

        tracing::debug!(
            "Saved exploration for character {} floor {} ({} tiles)",
            record.character_id,
            record.floor_number,
            record.explored_tiles.len()
        );
        Ok(())
    }

    async fn list(&self, character_id: CharacterId) -> Result<Vec<ExplorationRecord>, RepoError> {
        let rows: Vec<ExplorationRow> = sqlx::query_as(
            "SELECT character_id, floor_number, explored_tiles, updated_at
             FROM exploration WHERE character_id = ? ORDER BY floor_number",
        )
        .bind(character_id.to_string())
        .fetch_all(self.connection.pool())
        .await
        .map_err(db_error("list_exploration"))?;

        rows.into_iter().map(row_to_record).collect()
    }
}

pub struct SqliteTileOverrideRepository {
    connection: SqliteConnection,
}

impl SqliteTileOverrideRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TileOverrideRepositoryPort for SqliteTileOverrideRepository {
    async fn get(
        &self,
        character_id: CharacterId,
        floor_number: i32,
    ) -> Result<Option<TileOverrides>, RepoError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT flags FROM tile_overrides WHERE character_id = ? AND floor_number = ?",
        )
        .bind(character_id.to_string())
        .bind(floor_number)
        .fetch_optional(self.connection.pool())
        .await
        .map_err(db_error("get_tile_overrides"))?;

        let Some((flags_json,)) = row else {
            return Ok(None);
        };
        let flags: BTreeMap<String, TileFlag> =
            serde_json::from_str(&flags_json).map_err(RepoError::serialization)?;

        Ok(Some(TileOverrides {
            character_id,
            floor_number,
            flags,
        }))
    }

    async fn save(&self, overrides: &TileOverrides) -> Result<(), RepoError> {
        let flags_json =
            serde_json::to_string(&overrides.flags).map_err(RepoError::serialization)?;

        sqlx::query(
            "INSERT INTO tile_overrides (character_id, floor_number, flags)
             VALUES (?, ?, ?)
             ON CONFLICT (character_id, floor_number)
             DO UPDATE SET flags = excluded.flags",
        )
        .bind(overrides.character_id.to_string())
        .bind(overrides.floor_number)
        .bind(flags_json)
        .execute(self.connection.pool())
        .await
        .map_err(db_error("save_tile_overrides"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::exploration_tracker::mark_visited;
    use crate::domain::value_objects::Position;
    use crate::infrastructure::persistence::connection::test_connection;

    #[tokio::test]
    async fn test_exploration_upserts_per_floor() {
        let repo = SqliteExplorationRepository::new(test_connection().await);
        let character_id = CharacterId::new();

        let record = mark_visited(ExplorationRecord::new(character_id, 2), Position::new(5, 5));
        repo.save(&record).await.expect("save");
        let record = mark_visited(record, Position::new(6, 5));
        repo.save(&record).await.expect("save again");
        repo.save(&ExplorationRecord::new(character_id, 1))
            .await
            .expect("save floor 1");

        let loaded = repo.get(character_id, 2).await.expect("get").expect("present");
        assert_eq!(loaded.explored_tiles.len(), 2);
        assert!(loaded.has_visited(Position::new(6, 5)));

        let floors: Vec<i32> = repo
            .list(character_id)
            .await
            .expect("list")
            .iter()
            .map(|r| r.floor_number)
            .collect();
        assert_eq!(floors, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_missing_exploration_is_none() {
        let repo = SqliteExplorationRepository::new(test_connection().await);
        assert!(repo.get(CharacterId::new(), 1).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_tile_overrides_round_trip() {
        let repo = SqliteTileOverrideRepository::new(test_connection().await);
        let character_id = CharacterId::new();
        let mut overrides = TileOverrides::new(character_id, 3);
        overrides.mark(Position::new(4, 7), TileFlag::Looted);
        overrides.mark(Position::new(9, 2), TileFlag::Defeated);

        repo.save(&overrides).await.expect("save");

        assert_eq!(repo.get(character_id, 3).await.expect("get"), Some(overrides));
        assert!(repo.get(character_id, 4).await.expect("get").is_none());
    }
}
