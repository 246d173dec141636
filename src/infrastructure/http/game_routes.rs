//! Game API routes - combat, abilities and items

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use super::{error_response, parse_character_id, PlayerAuth};
use crate::application::dto::{
    AbilityRequestDto, AbilityResponseDto, CombatRequestDto, CombatResponseDto,
    UseItemRequestDto, UseItemResponseDto,
};
use crate::domain::services::CombatAction;
use crate::domain::value_objects::InventoryEntryId;
use crate::infrastructure::state::AppState;

/// Attack the encounter's monster or flee from it
pub async fn combat(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Json(req): Json<CombatRequestDto>,
) -> Result<Json<CombatResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&req.character_id)?;
    let action = CombatAction::parse(&req.action).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Unknown combat action: {}", req.action),
        )
    })?;

    let result = state
        .game
        .combat_service
        .act(&player, id, action, req.round)
        .await
        .map_err(error_response)?;

    Ok(Json(CombatResponseDto::from(result)))
}

/// Use a class ability
pub async fn special_ability(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Json(req): Json<AbilityRequestDto>,
) -> Result<Json<AbilityResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&req.character_id)?;

    let result = state
        .game
        .ability_service
        .use_ability(&player, id, &req.ability_type)
        .await
        .map_err(error_response)?;

    Ok(Json(AbilityResponseDto::from(result)))
}

/// Consume one unit of an inventory entry
pub async fn use_item(
    State(state): State<Arc<AppState>>,
    PlayerAuth(player): PlayerAuth,
    Json(req): Json<UseItemRequestDto>,
) -> Result<Json<UseItemResponseDto>, (StatusCode, String)> {
    let id = parse_character_id(&req.character_id)?;
    let entry_id = Uuid::parse_str(&req.inventory_id)
        .map(InventoryEntryId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid inventory ID".to_string()))?;

    let result = state
        .game
        .inventory_service
        .use_item(&player, id, entry_id)
        .await
        .map_err(error_response)?;

    Ok(Json(UseItemResponseDto::from(result)))
}
