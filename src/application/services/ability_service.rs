//! Ability Service - class abilities, in and out of combat
//!
//! Damage from an ability lands on the active encounter's monster. A killing
//! blow wins the fight the same way a basic attack does, with no retaliation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::application::errors::{GameError, GameResult};
use crate::application::ports::outbound::{
    CatalogRepositoryPort, CharacterRepositoryPort, CombatLogRepositoryPort,
    TileOverrideRepositoryPort,
};
use crate::application::services::character_service::{ensure_can_act, lock_owned};
use crate::application::services::combat_service::VictoryRecorder;
use crate::domain::entities::{Character, CombatLog, Encounter};
use crate::domain::services::{apply_victory, resolve_ability_by_name, AbilityOutcome, VictoryRewards};
use crate::domain::value_objects::{CharacterId, PlayerId};
use crate::infrastructure::session::SessionManager;

/// Result of using an ability
#[derive(Debug, Clone)]
pub struct AbilityResult {
    pub outcome: AbilityOutcome,
    pub character: Character,
    /// The encounter after the ability; `None` when there is none or it just ended
    pub encounter: Option<Encounter>,
    /// Rewards, when the ability finished off the monster
    pub victory: Option<VictoryRewards>,
}

#[async_trait]
pub trait AbilityService: Send + Sync {
    /// Use the ability named `ability`
    async fn use_ability(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        ability: &str,
    ) -> GameResult<AbilityResult>;
}

pub struct AbilityServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    catalog: Arc<dyn CatalogRepositoryPort>,
    overrides: Arc<dyn TileOverrideRepositoryPort>,
    logs: Arc<dyn CombatLogRepositoryPort>,
    sessions: Arc<SessionManager>,
}

impl AbilityServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        catalog: Arc<dyn CatalogRepositoryPort>,
        overrides: Arc<dyn TileOverrideRepositoryPort>,
        logs: Arc<dyn CombatLogRepositoryPort>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            characters,
            catalog,
            overrides,
            logs,
            sessions,
        }
    }
}

#[async_trait]
impl AbilityService for AbilityServiceImpl {
    #[instrument(skip(self))]
    async fn use_ability(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        ability: &str,
    ) -> GameResult<AbilityResult> {
        let (mut session, mut character) =
            lock_owned(self.characters.as_ref(), &self.sessions, owner, id).await?;
        ensure_can_act(&character)?;

        let outcome = resolve_ability_by_name(&mut character, ability);
        if !outcome.success {
            debug!(character_id = %id, reason = %outcome.message, "Ability rejected");
            return Ok(AbilityResult {
                outcome,
                character,
                encounter: session.encounter.clone(),
                victory: None,
            });
        }

        let mut encounter = session.encounter.clone();
        let mut victory = None;

        let killed = match (outcome.damage, encounter.as_mut()) {
            (Some(damage), Some(fight)) => fight.wound(damage) == 0,
            _ => false,
        };

        match encounter.take() {
            Some(fight) if killed => {
                let monster = self
                    .catalog
                    .get_monster(fight.monster_id)
                    .await?
                    .ok_or_else(|| GameError::not_found("Monster", fight.monster_id))?;
                let rewards =
                    apply_victory(&mut character, monster.experience_reward, monster.gold_reward);
                let log = CombatLog::victory(
                    character.id,
                    monster.id,
                    outcome.damage.unwrap_or_default(),
                    0,
                    rewards.experience_gained,
                    rewards.gold_gained,
                );
                VictoryRecorder {
                    characters: self.characters.as_ref(),
                    overrides: self.overrides.as_ref(),
                    logs: self.logs.as_ref(),
                }
                .record(&mut session, &character, &fight, log)
                .await?;

                info!(character_id = %id, monster = %monster.name, "Ability finished the fight");
                victory = Some(rewards);
            }
            remaining => {
                self.characters.save(&character).await?;
                session.encounter = remaining.clone();
                encounter = remaining;
            }
        }

        info!(character_id = %id, ability = ability, "Ability used");
        Ok(AbilityResult {
            outcome,
            character,
            encounter,
            victory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{
        MockCatalogRepositoryPort, MockCharacterRepositoryPort, MockCombatLogRepositoryPort,
        MockTileOverrideRepositoryPort,
    };
    use crate::domain::entities::{CombatLogOutcome, Monster, TileFlag};
    use crate::domain::value_objects::{CharacterClass, MonsterId, Position};

    fn owner() -> PlayerId {
        PlayerId::new("p1")
    }

    fn ogre(hp: i32) -> Monster {
        Monster {
            id: MonsterId::new(3),
            name: "Ogre".to_string(),
            level: 3,
            hp,
            attack: 14,
            defense: 6,
            experience_reward: 60,
            gold_reward: 25,
        }
    }

    fn service(
        characters: MockCharacterRepositoryPort,
        catalog: MockCatalogRepositoryPort,
        overrides: MockTileOverrideRepositoryPort,
        logs: MockCombatLogRepositoryPort,
    ) -> (AbilityServiceImpl, Arc<SessionManager>) {
        let sessions = Arc::new(SessionManager::default());
        let service = AbilityServiceImpl::new(
            Arc::new(characters),
            Arc::new(catalog),
            Arc::new(overrides),
            Arc::new(logs),
            Arc::clone(&sessions),
        );
        (service, sessions)
    }

    fn stored(character: &Character) -> MockCharacterRepositoryPort {
        let mut characters = MockCharacterRepositoryPort::new();
        let copy = character.clone();
        characters
            .expect_get()
            .returning(move |_, _| Ok(Some(copy.clone())));
        characters
    }

    #[tokio::test]
    async fn test_rejected_ability_changes_nothing() {
        let mage = Character::new(owner(), "Morgana", CharacterClass::Mage);
        let mut characters = stored(&mage);
        characters.expect_save().never();
        let (service, _) = service(
            characters,
            MockCatalogRepositoryPort::new(),
            MockTileOverrideRepositoryPort::new(),
            MockCombatLogRepositoryPort::new(),
        );

        let result = service
            .use_ability(&owner(), mage.id, "backstab")
            .await
            .expect("outcome");

        assert!(!result.outcome.success);
        assert_eq!(result.character.mp, mage.mp);
    }

    #[tokio::test]
    async fn test_damage_wounds_encounter_monster() {
        let warrior = Character::new(owner(), "Brom", CharacterClass::Warrior);
        let mut characters = stored(&warrior);
        characters
            .expect_save()
            .withf(|c| c.mp == 40 - 15)
            .times(1)
            .returning(|_| Ok(()));
        let (service, sessions) = service(
            characters,
            MockCatalogRepositoryPort::new(),
            MockTileOverrideRepositoryPort::new(),
            MockCombatLogRepositoryPort::new(),
        );
        let encounter = Encounter::start(&ogre(80), 1, Position::new(4, 4));
        sessions.session(warrior.id).await.lock().await.encounter = Some(encounter);

        let result = service
            .use_ability(&owner(), warrior.id, "charge")
            .await
            .expect("charge");

        assert_eq!(result.outcome.damage, Some(30));
        let encounter = result.encounter.expect("fight goes on");
        assert_eq!((encounter.monster_hp, encounter.round), (50, 0));
        let handle = sessions.session(warrior.id).await;
        assert_eq!(handle.lock().await.encounter.as_ref().map(|e| e.monster_hp), Some(50));
    }

    #[tokio::test]
    async fn test_killing_blow_resolves_victory() {
        let warrior = Character::new(owner(), "Brom", CharacterClass::Warrior);
        let mut characters = stored(&warrior);
        characters
            .expect_save()
            .withf(|c| c.experience == 60 && c.gold == 25)
            .times(1)
            .returning(|_| Ok(()));
        let mut catalog = MockCatalogRepositoryPort::new();
        catalog.expect_get_monster().returning(|_| Ok(Some(ogre(20))));
        let mut overrides = MockTileOverrideRepositoryPort::new();
        overrides.expect_get().returning(|_, _| Ok(None));
        overrides
            .expect_save()
            .withf(|o| o.flags.get("4,4") == Some(&TileFlag::Defeated))
            .times(1)
            .returning(|_| Ok(()));
        let mut logs = MockCombatLogRepositoryPort::new();
        logs.expect_append()
            .withf(|log| {
                log.outcome == CombatLogOutcome::Victory
                    && log.damage_dealt == 30
                    && log.damage_received == 0
            })
            .times(1)
            .returning(|_| Ok(()));
        let (service, sessions) = service(characters, catalog, overrides, logs);
        let encounter = Encounter::start(&ogre(20), 1, Position::new(4, 4));
        sessions.session(warrior.id).await.lock().await.encounter = Some(encounter);

        let result = service
            .use_ability(&owner(), warrior.id, "charge")
            .await
            .expect("charge");

        assert!(result.encounter.is_none());
        let rewards = result.victory.expect("victory");
        assert_eq!((rewards.experience_gained, rewards.gold_gained), (60, 25));
        let handle = sessions.session(warrior.id).await;
        assert!(handle.lock().await.encounter.is_none());
    }

    #[tokio::test]
    async fn test_heal_outside_combat_persists() {
        let mut cleric = Character::new(owner(), "Ilsa", CharacterClass::Cleric);
        cleric.magic = 10;
        cleric.max_hp = 100;
        cleric.hp = 40;
        let mut characters = stored(&cleric);
        characters
            .expect_save()
            .withf(|c| c.hp == 80 && c.mp == 70)
            .times(1)
            .returning(|_| Ok(()));
        let (service, _) = service(
            characters,
            MockCatalogRepositoryPort::new(),
            MockTileOverrideRepositoryPort::new(),
            MockCombatLogRepositoryPort::new(),
        );

        let result = service
            .use_ability(&owner(), cleric.id, "divine_light")
            .await
            .expect("divine light");

        assert_eq!(result.outcome.heal_amount, Some(40));
        assert_eq!(result.character.hp, 80);
    }

    #[tokio::test]
    async fn test_incapacitated_character_cannot_use_abilities() {
        let mut cleric = Character::new(owner(), "Ilsa", CharacterClass::Cleric);
        cleric.hp = 0;
        let (service, _) = service(
            stored(&cleric),
            MockCatalogRepositoryPort::new(),
            MockTileOverrideRepositoryPort::new(),
            MockCombatLogRepositoryPort::new(),
        );

        let result = service.use_ability(&owner(), cleric.id, "divine_light").await;

        assert!(matches!(result, Err(GameError::InvalidRequest(_))));
    }
}
