//! Character API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{error_response, parse_character_id, PlayerAuth};
use crate::application::dto::{
    CharacterResponseDto, CombatLogResponseDto, CreateCharacterRequestDto,
    InventoryItemResponseDto,
};
use crate::infrastructure::state::AppState;

/// List the player's characters, newest first
pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
) -> Result<Json<Vec<CharacterResponseDto>>, (StatusCode, String)> {
    let characters = state
        .character_service
        .list_characters(&player)
        .await
        .map_err(error_response)?;

    Ok(Json(characters.into_iter().map(CharacterResponseDto::from).collect()))
}

/// Create a character
pub async fn create_character(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Json(req): Json<CreateCharacterRequestDto>,
) -> Result<(StatusCode, Json<CharacterResponseDto>), (StatusCode, String)> {
    let character = state
        .character_service
        .create_character(&player, req.into())
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(CharacterResponseDto::from(character)),
    ))
}

/// Get a character by ID
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Path(id): Path<String>,
) -> Result<Json<CharacterResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;

    let character = state
        .character_service
        .get_character(&player, id)
        .await
        .map_err(error_response)?;

    Ok(Json(CharacterResponseDto::from(character)))
}

pub async fn get_inventory(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Path(id): Path<String>,
) -> Result<Json<Vec<InventoryItemResponseDto>>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;

    let items = state
        .game
        .inventory_service
        .inventory(&player, id)
        .await
        .map_err(error_response)?;

    Ok(Json(items.into_iter().map(InventoryItemResponseDto::from).collect()))
}

/// Most recent fights of a character
pub async fn get_combat_log(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Path(id): Path<String>,
) -> Result<Json<Vec<CombatLogResponseDto>>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;

    let logs = state
        .game
        .combat_service
        .combat_log(&player, id)
        .await
        .map_err(error_response)?;

    Ok(Json(logs.into_iter().map(CombatLogResponseDto::from).collect()))
}
