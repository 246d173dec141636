//! HTTP REST API routes

mod auth;
mod character_routes;
mod dungeon_routes;
mod game_routes;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::errors::GameError;
use crate::domain::value_objects::CharacterId;
use crate::infrastructure::state::AppState;

pub use auth::PlayerAuth;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Character routes
        .route(
            "/api/characters",
            get(character_routes::list_characters).post(character_routes::create_character),
        )
        .route("/api/characters/{id}", get(character_routes::get_character))
        .route(
            "/api/characters/{id}/inventory",
            get(character_routes::get_inventory),
        )
        .route(
            "/api/characters/{id}/combat-log",
            get(character_routes::get_combat_log),
        )
        // Character-scoped dungeon routes
        .route("/api/characters/{id}/floor", get(dungeon_routes::enter_floor))
        .route("/api/characters/{id}/move", post(dungeon_routes::move_character))
        .route("/api/characters/{id}/interact", post(dungeon_routes::interact))
        // Dungeon routes
        .route("/api/dungeon/floor/{floor}", get(dungeon_routes::get_floor))
        .route(
            "/api/dungeon/progress/{character_id}",
            get(dungeon_routes::get_progress),
        )
        .route("/api/dungeon/explore", post(dungeon_routes::explore))
        .route("/api/dungeon/monsters", get(dungeon_routes::list_monsters))
        .route("/api/dungeon/items", get(dungeon_routes::list_items))
        // Game routes
        .route("/api/game/combat", post(game_routes::combat))
        .route("/api/game/special-ability", post(game_routes::special_ability))
        .route("/api/game/use-item", post(game_routes::use_item))
}

/// Map an application error onto an HTTP status and message
pub(crate) fn error_response(error: GameError) -> (StatusCode, String) {
    match error {
        GameError::NotFound { .. } => (StatusCode::NOT_FOUND, error.to_string()),
        GameError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
        GameError::Persistence(e) => {
            tracing::error!("Persistence failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

pub(crate) fn parse_character_id(id: &str) -> Result<CharacterId, (StatusCode, String)> {
    Uuid::parse_str(id)
        .map(CharacterId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid character ID".to_string()))
}

#[cfg(test)]
mod tests;
