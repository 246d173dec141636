//! Combat log repository implementation for SQLite

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::connection::{db_error, parse_id, SqliteConnection};
use crate::application::ports::outbound::{CombatLogRepositoryPort, RepoError};
use crate::domain::entities::{CombatLog, CombatLogOutcome};
use crate::domain::value_objects::{CharacterId, MonsterId};

pub struct SqliteCombatLogRepository {
    connection: SqliteConnection,
}

impl SqliteCombatLogRepository {
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }
}

type CombatLogRow = (String, String, i64, i32, i32, String, i32, i32, DateTime<Utc>);

fn row_to_log(
    (id, character_id, monster_id, dealt, received, outcome, experience, gold, created_at): CombatLogRow,
) -> Result<CombatLog, RepoError> {
    Ok(CombatLog {
        id: parse_id(&id)?,
        character_id: parse_id(&character_id)?,
        monster_id: MonsterId::new(monster_id),
        damage_dealt: dealt,
        damage_received: received,
        outcome: CombatLogOutcome::parse(&outcome)
            .ok_or_else(|| RepoError::serialization(format!("unknown outcome '{outcome}'")))?,
        experience_gained: experience,
        gold_gained: gold,
        created_at,
    })
}

#[async_trait]
impl CombatLogRepositoryPort for SqliteCombatLogRepository {
    async fn append(&self, log: &CombatLog) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO combat_logs
                (id, character_id, monster_id, damage_dealt, damage_received, outcome,
                 experience_gained, gold_gained, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(log.id.to_string())
        .bind(log.character_id.to_string())
        .bind(log.monster_id.value())
        .bind(log.damage_dealt)
        .bind(log.damage_received)
        .bind(log.outcome.as_str())
        .bind(log.experience_gained)
        .bind(log.gold_gained)
        .bind(log.created_at)
        .execute(self.connection.pool())
        .await
        .map_err(db_error("append_combat_log"))?;

        tracing::debug!(
            "Logged {} against monster {} for character {}",
            log.outcome.as_str(),
            log.monster_id,
            log.character_id
        );
        Ok(())
    }

    async fn list_recent(
        &self,
        character_id: CharacterId,
        limit: u32,
    ) -> Result<Vec<CombatLog>, RepoError> {
        let rows: Vec<CombatLogRow> = sqlx::query_as(
            "SELECT id, character_id, monster_id, damage_dealt, damage_received, outcome,
                    experience_gained, gold_gained, created_at
             FROM combat_logs
             WHERE character_id = ?
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?",
        )
        .bind(character_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(self.connection.pool())
        .await
        .map_err(db_error("list_combat_logs"))?;

        rows.into_iter().map(row_to_log).collect()
    }
}
