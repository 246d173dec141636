//! Dungeon API routes - floors, movement, exploration and the catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{error_response, parse_character_id, PlayerAuth};
use crate::application::dto::{
    ExplorationResponseDto, ExploreRequestDto, FloorResponseDto, FloorViewResponseDto,
    InteractResponseDto, ItemResponseDto, MonsterResponseDto, MoveRequestDto, MoveResponseDto,
};
use crate::domain::value_objects::Position;
use crate::infrastructure::state::AppState;

/// Enter the character's current floor, restoring what they already explored
pub async fn enter_floor(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Path(id): Path<String>,
) -> Result<Json<FloorViewResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;

    let view = state
        .game
        .dungeon_service
        .enter_floor(&player, id)
        .await
        .map_err(error_response)?;

    Ok(Json(FloorViewResponseDto::from(view)))
}

pub async fn move_character(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Path(id): Path<String>,
    Json(req): Json<MoveRequestDto>,
) -> Result<Json<MoveResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;

    let result = state
        .game
        .dungeon_service
        .move_character(&player, id, req.dx, req.dy)
        .await
        .map_err(error_response)?;

    Ok(Json(MoveResponseDto::from(result)))
}

/// Open a chest or take the stairs under the character
pub async fn interact(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Path(id): Path<String>,
) -> Result<Json<InteractResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&id)?;

    let result = state
        .game
        .dungeon_service
        .interact(&player, id)
        .await
        .map_err(error_response)?;

    Ok(Json(InteractResponseDto::from(result)))
}

/// Generate a floor without any character state
pub async fn get_floor(
    State(state): State<Arc<AppState>>,
    Path(floor): Path<i32>,
) -> Result<Json<FloorResponseDto>, (StatusCode, String)> {
    let layout = state
        .game
        .dungeon_service
        .generate(floor)
        .await
        .map_err(error_response)?;

    Ok(Json(FloorResponseDto::from(&layout)))
}

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Path(character_id): Path<String>,
) -> Result<Json<Vec<ExplorationResponseDto>>, (StatusCode, String)> {
    let id = parse_character_id(&character_id)?;

    let records = state
        .game
        .dungeon_service
        .progress(&player, id)
        .await
        .map_err(error_response)?;

    Ok(Json(records.into_iter().map(ExplorationResponseDto::from).collect()))
}

/// Mark a tile explored
pub async fn explore(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Json(req): Json<ExploreRequestDto>,
) -> Result<Json<ExplorationResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&req.character_id)?;

    let record = state
        .game
        .dungeon_service
        .explore(&player, id, req.floor_number, Position::new(req.x, req.y))
        .await
        .map_err(error_response)?;

    Ok(Json(ExplorationResponseDto::from(record)))
}

pub async fn list_monsters(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonsterResponseDto>>, (StatusCode, String)> {
    let monsters = state
        .game
        .dungeon_service
        .list_monsters()
        .await
        .map_err(error_response)?;

    Ok(Json(monsters.into_iter().map(MonsterResponseDto::from).collect()))
}

pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ItemResponseDto>>, (StatusCode, String)> {
    let items = state
        .game
        .dungeon_service
        .list_items()
        .await
        .map_err(error_response)?;

    Ok(Json(items.into_iter().map(ItemResponseDto::from).collect()))
}
