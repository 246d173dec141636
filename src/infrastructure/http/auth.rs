//! Player identification for HTTP routes
//!
//! The player id is issued by an external auth collaborator and arrives in
//! the `x-player-id` header.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::domain::value_objects::PlayerId;

pub const PLAYER_HEADER: &str = "x-player-id";

/// Extractor for the requesting player
///
/// Rejects with 401 Unauthorized when the header is missing or blank.
#[derive(Debug, Clone)]
pub struct PlayerAuth(pub PlayerId);

impl<S> FromRequestParts<S> for PlayerAuth
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(PLAYER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| PlayerAuth(PlayerId::new(v)))
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    format!("Missing {PLAYER_HEADER} header"),
                )
            })
    }
}
