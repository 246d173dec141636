//! Application errors returned by the game services

use crate::application::ports::outbound::RepoError;

/// Errors that can occur while running a game operation.
///
/// Ability rejections are not errors: they come back as unsuccessful
/// outcomes.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The entity does not exist, or is not owned by the requesting player
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed or out-of-state request
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] RepoError),
}

impl GameError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

pub type GameResult<T> = Result<T, GameError>;
