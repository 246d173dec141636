//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::infrastructure::session::DEFAULT_MAX_SESSIONS;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,
    /// Seed monsters, items and floors at startup
    pub seed_catalog: bool,

    /// HTTP server port
    pub server_port: u16,

    pub game: GameSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://dungeon.db?mode=rwc".to_string()),
            seed_catalog: env::var("DUNGEON_SEED_CATALOG")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("DUNGEON_SEED_CATALOG must be true or false")?,

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            game: GameSettings::from_env(),
        })
    }
}

/// Tunable gameplay settings
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// How many combat logs the combat-log endpoint returns
    pub combat_log_limit: u32,
    /// Sessions unused for this long are dropped
    pub session_idle_minutes: u64,
    /// Most sessions held in memory at once
    pub max_sessions: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            combat_log_limit: 20,
            session_idle_minutes: 30,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl GameSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            combat_log_limit: env_or("DUNGEON_COMBAT_LOG_LIMIT", defaults.combat_log_limit),
            session_idle_minutes: env_or("DUNGEON_SESSION_IDLE_MINUTES", defaults.session_idle_minutes),
            max_sessions: env_or("DUNGEON_MAX_SESSIONS", defaults.max_sessions),
        }
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes * 60)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
