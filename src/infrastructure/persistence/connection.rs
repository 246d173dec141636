//! SQLite connection management

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::application::ports::outbound::RepoError;

/// Wrapper around a SQLite pool shared by every repository
#[derive(Clone)]
pub struct SqliteConnection {
    pool: SqlitePool,
}

impl SqliteConnection {
    /// Open a pool for `url`, creating the database file if needed
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {url}"))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if url.contains(":memory:") {
            // An in-memory database lives and dies with its single connection
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite")?;

        tracing::info!("Connected to SQLite at {}", url);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes
    pub async fn initialize_schema(&self) -> Result<()> {
        let statements = [
            r#"CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                class TEXT NOT NULL,
                level INTEGER NOT NULL,
                experience INTEGER NOT NULL,
                gold INTEGER NOT NULL,
                hp INTEGER NOT NULL,
                max_hp INTEGER NOT NULL,
                mp INTEGER NOT NULL,
                max_mp INTEGER NOT NULL,
                strength INTEGER NOT NULL,
                defense INTEGER NOT NULL,
                magic INTEGER NOT NULL,
                agility INTEGER NOT NULL,
                position_x INTEGER NOT NULL,
                position_y INTEGER NOT NULL,
                current_floor INTEGER NOT NULL,
                status_effects TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )"#,
            "CREATE INDEX IF NOT EXISTS idx_characters_owner ON characters (owner_id)",
            r#"CREATE TABLE IF NOT EXISTS monsters (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                level INTEGER NOT NULL,
                hp INTEGER NOT NULL,
                attack INTEGER NOT NULL,
                defense INTEGER NOT NULL,
                experience_reward INTEGER NOT NULL,
                gold_reward INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                item_type TEXT NOT NULL,
                rarity TEXT NOT NULL,
                attack_bonus INTEGER NOT NULL DEFAULT 0,
                defense_bonus INTEGER NOT NULL DEFAULT 0,
                hp_restore INTEGER NOT NULL DEFAULT 0,
                mp_restore INTEGER NOT NULL DEFAULT 0
            )"#,
            r#"CREATE TABLE IF NOT EXISTS dungeon_floors (
                floor_number INTEGER PRIMARY KEY,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL
            )"#,
            r#"CREATE TABLE IF NOT EXISTS inventory (
                id TEXT PRIMARY KEY,
                character_id TEXT NOT NULL,
                item_id INTEGER NOT NULL,
                quantity INTEGER NOT NULL,
                equipped INTEGER NOT NULL DEFAULT 0,
                UNIQUE (character_id, item_id)
            )"#,
            r#"CREATE TABLE IF NOT EXISTS exploration (
                character_id TEXT NOT NULL,
                floor_number INTEGER NOT NULL,
                explored_tiles TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (character_id, floor_number)
            )"#,
            r#"CREATE TABLE IF NOT EXISTS tile_overrides (
                character_id TEXT NOT NULL,
                floor_number INTEGER NOT NULL,
                flags TEXT NOT NULL,
                PRIMARY KEY (character_id, floor_number)
            )"#,
            r#"CREATE TABLE IF NOT EXISTS combat_logs (
                id TEXT PRIMARY KEY,
                character_id TEXT NOT NULL,
                monster_id INTEGER NOT NULL,
                damage_dealt INTEGER NOT NULL,
                damage_received INTEGER NOT NULL,
                outcome TEXT NOT NULL,
                experience_gained INTEGER NOT NULL,
                gold_gained INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )"#,
            "CREATE INDEX IF NOT EXISTS idx_combat_logs_character ON combat_logs (character_id, created_at)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to initialize schema")?;
        }

        tracing::info!("SQLite schema initialized");
        Ok(())
    }

    /// Insert the reference catalog: monsters, items and floor dimensions.
    /// Existing rows are left alone.
    pub async fn seed_catalog(&self) -> Result<()> {
        for (id, name, level, hp, attack, defense, experience, gold) in MONSTERS {
            sqlx::query(
                "INSERT OR IGNORE INTO monsters (id, name, level, hp, attack, defense, experience_reward, gold_reward)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(name)
            .bind(level)
            .bind(hp)
            .bind(attack)
            .bind(defense)
            .bind(experience)
            .bind(gold)
            .execute(&self.pool)
            .await
            .context("Failed to seed monsters")?;
        }

        for (id, name, item_type, rarity, attack, defense, hp, mp) in ITEMS {
            sqlx::query(
                "INSERT OR IGNORE INTO items (id, name, item_type, rarity, attack_bonus, defense_bonus, hp_restore, mp_restore)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(name)
            .bind(item_type)
            .bind(rarity)
            .bind(attack)
            .bind(defense)
            .bind(hp)
            .bind(mp)
            .execute(&self.pool)
            .await
            .context("Failed to seed items")?;
        }

        for floor_number in 1..=FLOOR_COUNT {
            sqlx::query(
                "INSERT OR IGNORE INTO dungeon_floors (floor_number, width, height) VALUES (?, ?, ?)",
            )
            .bind(floor_number)
            .bind(FLOOR_WIDTH)
            .bind(FLOOR_HEIGHT)
            .execute(&self.pool)
            .await
            .context("Failed to seed dungeon floors")?;
        }

        tracing::info!(
            monsters = MONSTERS.len(),
            items = ITEMS.len(),
            floors = FLOOR_COUNT,
            "Catalog seeded"
        );
        Ok(())
    }
}

const FLOOR_COUNT: i32 = 10;
const FLOOR_WIDTH: i32 = 20;
const FLOOR_HEIGHT: i32 = 15;

/// (id, name, level, hp, attack, defense, experience_reward, gold_reward)
const MONSTERS: [(i64, &str, i32, i32, i32, i32, i32, i32); 5] = [
    (1, "Goblin", 1, 30, 8, 3, 25, 10),
    (2, "Skeleton", 2, 45, 11, 5, 40, 18),
    (3, "Orc", 3, 70, 14, 7, 60, 30),
    (4, "Dark Knight", 5, 110, 20, 12, 120, 70),
    (5, "Dragon", 10, 300, 35, 20, 500, 300),
];

/// (id, name, type, rarity, attack_bonus, defense_bonus, hp_restore, mp_restore)
const ITEMS: [(i64, &str, &str, &str, i32, i32, i32, i32); 8] = [
    (1, "Rusty Sword", "weapon", "common", 3, 0, 0, 0),
    (2, "Leather Armor", "armor", "common", 0, 2, 0, 0),
    (3, "Steel Blade", "weapon", "uncommon", 7, 0, 0, 0),
    (4, "Chainmail", "armor", "uncommon", 0, 5, 0, 0),
    (5, "Ring of Vigor", "accessory", "rare", 2, 2, 0, 0),
    (6, "Health Potion", "consumable", "common", 0, 0, 50, 0),
    (7, "Mana Potion", "consumable", "common", 0, 0, 0, 30),
    (8, "Elixir", "consumable", "epic", 0, 0, 100, 100),
];

/// Map a sqlx error into a port error tagged with the failing operation
pub(super) fn db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> RepoError {
    move |e| RepoError::database(operation, e)
}

/// Parse a stored UUID column into one of the id newtypes
pub(super) fn parse_id<T: From<Uuid>>(value: &str) -> Result<T, RepoError> {
    Uuid::parse_str(value)
        .map(T::from)
        .map_err(|e| RepoError::serialization(format!("invalid id '{value}': {e}")))
}

#[cfg(test)]
pub(super) async fn test_connection() -> SqliteConnection {
    let connection = SqliteConnection::new("sqlite::memory:")
        .await
        .expect("in-memory database");
    connection.initialize_schema().await.expect("schema");
    connection.seed_catalog().await.expect("seed");
    connection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeding_twice_is_idempotent() {
        let connection = test_connection().await;
        connection.seed_catalog().await.expect("second seed");

        let (monsters,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM monsters")
            .fetch_one(connection.pool())
            .await
            .expect("count");
        let (floors,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dungeon_floors")
            .fetch_one(connection.pool())
            .await
            .expect("count");

        assert_eq!(monsters, MONSTERS.len() as i64);
        assert_eq!(floors, i64::from(FLOOR_COUNT));
    }

    #[tokio::test]
    async fn test_chest_loot_item_is_seeded() {
        let connection = test_connection().await;
        let (name, hp_restore): (String, i32) =
            sqlx::query_as("SELECT name, hp_restore FROM items WHERE id = 6")
                .fetch_one(connection.pool())
                .await
                .expect("potion");

        assert_eq!(name, "Health Potion");
        assert_eq!(hp_restore, 50);
    }
}
