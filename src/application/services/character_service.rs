//! Character Service - Application service for character management
//!
//! Creates characters from a class template, lists and loads them. Every
//! lookup is scoped to the requesting player.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, instrument};

use crate::application::errors::{GameError, GameResult};
use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::domain::entities::Character;
use crate::domain::value_objects::{CharacterClass, CharacterId, PlayerId, UnknownClass};
use crate::infrastructure::session::{PlayerSession, SessionManager};

/// Longest accepted character name, in characters
pub const MAX_NAME_LENGTH: usize = 32;

/// Request to create a new character
#[derive(Debug, Clone)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub class: String,
}

/// Load a character owned by `owner`, or fail with `NotFound`
pub(crate) async fn load_owned(
    characters: &dyn CharacterRepositoryPort,
    owner: &PlayerId,
    id: CharacterId,
) -> GameResult<Character> {
    characters
        .get(id, owner)
        .await?
        .ok_or_else(|| GameError::not_found("Character", id))
}

/// Lock the session of a character owned by `owner`
///
/// Ownership is checked before any session exists for `id`. The character
/// is read again once the lock is held, so the caller sees what the previous
/// request for it saved.
pub(crate) async fn lock_owned(
    characters: &dyn CharacterRepositoryPort,
    sessions: &SessionManager,
    owner: &PlayerId,
    id: CharacterId,
) -> GameResult<(OwnedMutexGuard<PlayerSession>, Character)> {
    load_owned(characters, owner, id).await?;
    let session = sessions.session(id).await.lock_owned().await;
    let character = load_owned(characters, owner, id).await?;
    Ok((session, character))
}

/// Reject actions from a character at 0 HP
pub(crate) fn ensure_can_act(character: &Character) -> GameResult<()> {
    if character.is_incapacitated() {
        return Err(GameError::invalid(format!(
            "{} is incapacitated and cannot act",
            character.name
        )));
    }
    Ok(())
}

/// Character service trait defining the application use cases
#[async_trait]
pub trait CharacterService: Send + Sync {
    /// Create a level 1 character for `owner`
    async fn create_character(
        &self,
        owner: &PlayerId,
        request: CreateCharacterRequest,
    ) -> GameResult<Character>;

    /// Get one of the player's characters
    async fn get_character(&self, owner: &PlayerId, id: CharacterId) -> GameResult<Character>;

    /// List the player's characters, newest first
    async fn list_characters(&self, owner: &PlayerId) -> GameResult<Vec<Character>>;
}

/// Default implementation of CharacterService backed by a character repository
pub struct CharacterServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
}

impl CharacterServiceImpl {
    pub fn new(characters: Arc<dyn CharacterRepositoryPort>) -> Self {
        Self { characters }
    }

    fn validate_name(name: &str) -> GameResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::invalid("Character name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(GameError::invalid(format!(
                "Character name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(name.to_string())
    }
}

#[async_trait]
impl CharacterService for CharacterServiceImpl {
    #[instrument(skip(self, request), fields(owner = %owner, name = %request.name))]
    async fn create_character(
        &self,
        owner: &PlayerId,
        request: CreateCharacterRequest,
    ) -> GameResult<Character> {
        let name = Self::validate_name(&request.name)?;
        let class: CharacterClass = request
            .class
            .parse()
            .map_err(|e: UnknownClass| GameError::invalid(e.to_string()))?;

        let character = Character::new(owner.clone(), name, class);
        self.characters.create(&character).await?;

        info!(character_id = %character.id, class = %class, "Created character");
        Ok(character)
    }

    #[instrument(skip(self))]
    async fn get_character(&self, owner: &PlayerId, id: CharacterId) -> GameResult<Character> {
        debug!(character_id = %id, "Fetching character");
        load_owned(self.characters.as_ref(), owner, id).await
    }

    #[instrument(skip(self))]
    async fn list_characters(&self, owner: &PlayerId) -> GameResult<Vec<Character>> {
        let characters = self.characters.list_by_owner(owner).await?;
        debug!(count = characters.len(), "Listed characters");
        Ok(characters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{MockCharacterRepositoryPort, RepoError};

    fn request(name: &str, class: &str) -> CreateCharacterRequest {
        CreateCharacterRequest {
            name: name.to_string(),
            class: class.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_character_uses_class_template() {
        let mut repo = MockCharacterRepositoryPort::new();
        repo.expect_create()
            .withf(|c| c.name == "Morgana" && c.class == CharacterClass::Mage)
            .times(1)
            .returning(|_| Ok(()));
        let service = CharacterServiceImpl::new(Arc::new(repo));

        let character = service
            .create_character(&PlayerId::new("p1"), request("  Morgana ", "Mage"))
            .await
            .expect("character created");

        assert_eq!(character.owner, PlayerId::new("p1"));
        assert_eq!((character.hp, character.max_hp), (70, 70));
        assert_eq!((character.mp, character.max_mp), (120, 120));
        assert_eq!(character.magic, 16);
        assert_eq!(character.current_floor, 1);
        assert_eq!((character.position.x, character.position.y), (5, 5));
        assert_eq!((character.level, character.experience, character.gold), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_create_character_rejects_bad_input() {
        let mut repo = MockCharacterRepositoryPort::new();
        repo.expect_create().never();
        let service = CharacterServiceImpl::new(Arc::new(repo));
        let owner = PlayerId::new("p1");

        for bad in [request("   ", "rogue"), request(&"x".repeat(33), "rogue"), request("Vex", "bard")] {
            let result = service.create_character(&owner, bad).await;
            assert!(matches!(result, Err(GameError::InvalidRequest(_))));
        }
    }

    #[tokio::test]
    async fn test_name_at_length_limit_is_accepted() {
        let mut repo = MockCharacterRepositoryPort::new();
        repo.expect_create().times(1).returning(|_| Ok(()));
        let service = CharacterServiceImpl::new(Arc::new(repo));
        let result = service
            .create_character(&PlayerId::new("p1"), request(&"x".repeat(32), "rogue"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_character_of_another_player_is_not_found() {
        let mut repo = MockCharacterRepositoryPort::new();
        repo.expect_get().returning(|_, _| Ok(None));
        let service = CharacterServiceImpl::new(Arc::new(repo));

        let result = service
            .get_character(&PlayerId::new("intruder"), CharacterId::new())
            .await;

        assert!(matches!(result, Err(GameError::NotFound { entity: "Character", .. })));
    }

    #[tokio::test]
    async fn test_store_failures_surface_as_persistence_errors() {
        let mut repo = MockCharacterRepositoryPort::new();
        repo.expect_list_by_owner()
            .returning(|_| Err(RepoError::database("list_by_owner", "disk full")));
        let service = CharacterServiceImpl::new(Arc::new(repo));

        let result = service.list_characters(&PlayerId::new("p1")).await;

        assert!(matches!(result, Err(GameError::Persistence(_))));
    }
}
