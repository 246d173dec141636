//! Shared application state

mod game_services;

pub use game_services::GameServices;

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::RandomPort;
use crate::application::services::{CharacterService, CharacterServiceImpl};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteRepository;
use crate::infrastructure::random::ThreadRngAdapter;
use crate::infrastructure::session::SessionManager;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub sessions: Arc<SessionManager>,
    pub character_service: Arc<dyn CharacterService>,
    pub game: GameServices,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        Self::with_random(config, Arc::new(ThreadRngAdapter::new())).await
    }

    /// Build the state with a specific random source
    pub async fn with_random(config: AppConfig, rng: Arc<dyn RandomPort>) -> Result<Self> {
        let repository = SqliteRepository::new(&config.database_url, config.seed_catalog).await?;
        let sessions = Arc::new(SessionManager::with_capacity(config.game.max_sessions));

        let character_service = Arc::new(CharacterServiceImpl::new(Arc::new(repository.characters())));
        let game = GameServices::new(&repository, Arc::clone(&sessions), rng, &config.game);

        Ok(Self {
            config,
            sessions,
            character_service,
            game,
        })
    }
}
