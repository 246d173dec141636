//! Combat Service - attack and flee against the server-owned encounter
//!
//! The encounter in the character's session is the only source of monster
//! HP. Each attack names the round it answers; anything else is stale.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::application::errors::{GameError, GameResult};
use crate::application::ports::outbound::{
    CatalogRepositoryPort, CharacterRepositoryPort, CombatLogRepositoryPort, RandomPort,
    TileOverrideRepositoryPort,
};
use crate::application::services::character_service::{ensure_can_act, load_owned, lock_owned};
use crate::domain::entities::{Character, CombatLog, Encounter, Monster, TileFlag, TileOverrides};
use crate::domain::services::{
    resolve_attack, resolve_flee, CombatAction, CombatOutcome, FleeOutcome,
};
use crate::domain::value_objects::{CharacterId, PlayerId};
use crate::infrastructure::session::{PlayerSession, SessionManager};

/// Result of a combat request
#[derive(Debug, Clone, PartialEq)]
pub enum CombatResult {
    Round {
        outcome: CombatOutcome,
        monster: Monster,
        /// The encounter after the round; `None` once it has ended
        encounter: Option<Encounter>,
    },
    Fled(FleeOutcome),
}

/// Persists everything a won fight leaves behind.
///
/// Shared by basic attacks and damaging abilities.
pub(crate) struct VictoryRecorder<'a> {
    pub characters: &'a dyn CharacterRepositoryPort,
    pub overrides: &'a dyn TileOverrideRepositoryPort,
    pub logs: &'a dyn CombatLogRepositoryPort,
}

impl VictoryRecorder<'_> {
    /// Save the character, log the fight and mark the monster tile defeated.
    ///
    /// The session is only touched after every write succeeded.
    pub async fn record(
        &self,
        session: &mut PlayerSession,
        character: &Character,
        encounter: &Encounter,
        log: CombatLog,
    ) -> GameResult<()> {
        self.characters.save(character).await?;
        self.logs.append(&log).await?;

        let mut overrides = self
            .overrides
            .get(character.id, encounter.floor_number)
            .await?
            .unwrap_or_else(|| TileOverrides::new(character.id, encounter.floor_number));
        overrides.mark(encounter.position, TileFlag::Defeated);
        self.overrides.save(&overrides).await?;

        session.mark_tile(encounter.floor_number, encounter.position, TileFlag::Defeated);
        session.encounter = None;
        Ok(())
    }
}

/// Combat service trait defining the application use cases
#[async_trait]
pub trait CombatService: Send + Sync {
    /// Attack or flee. `round` is required for attacks and must match the
    /// encounter's round counter.
    async fn act(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        action: CombatAction,
        round: Option<u32>,
    ) -> GameResult<CombatResult>;

    /// The character's most recent fights, newest first
    async fn combat_log(&self, owner: &PlayerId, id: CharacterId) -> GameResult<Vec<CombatLog>>;
}

/// Default implementation of CombatService
pub struct CombatServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    catalog: Arc<dyn CatalogRepositoryPort>,
    overrides: Arc<dyn TileOverrideRepositoryPort>,
    logs: Arc<dyn CombatLogRepositoryPort>,
    sessions: Arc<SessionManager>,
    rng: Arc<dyn RandomPort>,
    combat_log_limit: u32,
}

impl CombatServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        catalog: Arc<dyn CatalogRepositoryPort>,
        overrides: Arc<dyn TileOverrideRepositoryPort>,
        logs: Arc<dyn CombatLogRepositoryPort>,
        sessions: Arc<SessionManager>,
        rng: Arc<dyn RandomPort>,
        combat_log_limit: u32,
    ) -> Self {
        Self {
            characters,
            catalog,
            overrides,
            logs,
            sessions,
            rng,
            combat_log_limit,
        }
    }

    fn victory_recorder(&self) -> VictoryRecorder<'_> {
        VictoryRecorder {
            characters: self.characters.as_ref(),
            overrides: self.overrides.as_ref(),
            logs: self.logs.as_ref(),
        }
    }

    async fn attack(
        &self,
        session: &mut PlayerSession,
        mut character: Character,
        round: Option<u32>,
    ) -> GameResult<CombatResult> {
        ensure_can_act(&character)?;
        let round = round.ok_or_else(|| GameError::invalid("An attack must name its round"))?;
        let mut encounter = session
            .encounter
            .clone()
            .ok_or_else(|| GameError::invalid("No active encounter"))?;
        if encounter.round != round {
            warn!(
                character_id = %character.id,
                expected = encounter.round,
                received = round,
                "Rejected stale attack"
            );
            return Err(GameError::invalid(format!(
                "Stale round {}: the encounter is at round {}",
                round, encounter.round
            )));
        }

        let monster = self
            .catalog
            .get_monster(encounter.monster_id)
            .await?
            .ok_or_else(|| GameError::not_found("Monster", encounter.monster_id))?;

        let outcome = resolve_attack(&mut character, &monster, encounter.monster_hp, self.rng.as_ref());

        if outcome.victory {
            let log = CombatLog::victory(
                character.id,
                monster.id,
                outcome.damage_dealt,
                outcome.damage_received,
                outcome.experience_gained,
                outcome.gold_gained,
            );
            self.victory_recorder()
                .record(session, &character, &encounter, log)
                .await?;
            info!(
                character_id = %character.id,
                monster = %monster.name,
                experience = outcome.experience_gained,
                level_up = outcome.level_up,
                "Victory"
            );
            return Ok(CombatResult::Round {
                outcome,
                monster,
                encounter: None,
            });
        }

        self.characters.save(&character).await?;

        if outcome.defeat {
            let log = CombatLog::defeat(
                character.id,
                monster.id,
                outcome.damage_dealt,
                outcome.damage_received,
            );
            self.logs.append(&log).await?;
            session.encounter = None;
            info!(character_id = %character.id, monster = %monster.name, "Defeat");
            return Ok(CombatResult::Round {
                outcome,
                monster,
                encounter: None,
            });
        }

        encounter.advance(outcome.monster_hp);
        session.encounter = Some(encounter.clone());
        Ok(CombatResult::Round {
            outcome,
            monster,
            encounter: Some(encounter),
        })
    }
}

#[async_trait]
impl CombatService for CombatServiceImpl {
    #[instrument(skip(self))]
    async fn act(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        action: CombatAction,
        round: Option<u32>,
    ) -> GameResult<CombatResult> {
        let (mut session, character) =
            lock_owned(self.characters.as_ref(), &self.sessions, owner, id).await?;

        match action {
            CombatAction::Attack => self.attack(&mut session, character, round).await,
            CombatAction::Flee => {
                if session.encounter.take().is_some() {
                    info!(character_id = %id, "Fled from encounter");
                }
                Ok(CombatResult::Fled(resolve_flee()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn combat_log(&self, owner: &PlayerId, id: CharacterId) -> GameResult<Vec<CombatLog>> {
        let character = load_owned(self.characters.as_ref(), owner, id).await?;
        Ok(self
            .logs
            .list_recent(character.id, self.combat_log_limit)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{
        FixedRandomPort, MockCatalogRepositoryPort, MockCharacterRepositoryPort,
        MockCombatLogRepositoryPort, MockTileOverrideRepositoryPort,
    };
    use crate::domain::entities::{CombatLogOutcome, DungeonFloor, FloorLayout, Tile, TileGrid, TileKind};
    use crate::domain::value_objects::{CharacterClass, MonsterId, Position};

    struct Mocks {
        characters: MockCharacterRepositoryPort,
        catalog: MockCatalogRepositoryPort,
        overrides: MockTileOverrideRepositoryPort,
        logs: MockCombatLogRepositoryPort,
    }

    impl Mocks {
        fn new(character: &Character, monster: Monster) -> Self {
            let mut characters = MockCharacterRepositoryPort::new();
            let stored = character.clone();
            characters
                .expect_get()
                .returning(move |_, _| Ok(Some(stored.clone())));
            let mut catalog = MockCatalogRepositoryPort::new();
            catalog
                .expect_get_monster()
                .returning(move |_| Ok(Some(monster.clone())));
            Self {
                characters,
                catalog,
                overrides: MockTileOverrideRepositoryPort::new(),
                logs: MockCombatLogRepositoryPort::new(),
            }
        }

        fn build(self, rng: FixedRandomPort) -> (CombatServiceImpl, Arc<SessionManager>) {
            let sessions = Arc::new(SessionManager::default());
            let service = CombatServiceImpl::new(
                Arc::new(self.characters),
                Arc::new(self.catalog),
                Arc::new(self.overrides),
                Arc::new(self.logs),
                Arc::clone(&sessions),
                Arc::new(rng),
                20,
            );
            (service, sessions)
        }
    }

    fn owner() -> PlayerId {
        PlayerId::new("p1")
    }

    fn hero() -> Character {
        let mut character = Character::new(owner(), "Brom", CharacterClass::Warrior);
        character.strength = 10;
        character.defense = 5;
        character.max_hp = 50;
        character.hp = 50;
        character
    }

    fn goblin(hp: i32) -> Monster {
        Monster {
            id: MonsterId::new(1),
            name: "Goblin".to_string(),
            level: 1,
            hp,
            attack: 8,
            defense: 3,
            experience_reward: 25,
            gold_reward: 10,
        }
    }

    fn monster_floor() -> FloorLayout {
        let rows = vec![(0..3)
            .map(|x| {
                Tile::new(
                    x,
                    0,
                    TileKind::Monster {
                        monster_id: MonsterId::new(1),
                        defeated: false,
                    },
                )
            })
            .collect()];
        FloorLayout {
            floor: DungeonFloor {
                floor_number: 1,
                width: 3,
                height: 1,
            },
            grid: TileGrid::from_rows(rows),
        }
    }

    async fn start_fight(sessions: &SessionManager, id: CharacterId, monster: &Monster) -> Encounter {
        let encounter = Encounter::start(monster, 1, Position::new(1, 0));
        let handle = sessions.session(id).await;
        let mut session = handle.lock().await;
        session.floor = Some(monster_floor());
        session.encounter = Some(encounter.clone());
        encounter
    }

    #[tokio::test]
    async fn test_attack_round_advances_encounter() {
        let character = hero();
        let mut mocks = Mocks::new(&character, goblin(20));
        mocks
            .characters
            .expect_save()
            .withf(|c| c.hp == 47)
            .times(1)
            .returning(|_| Ok(()));
        let (service, sessions) = mocks.build(FixedRandomPort::constant(0));
        start_fight(&sessions, character.id, &goblin(20)).await;

        let result = service
            .act(&owner(), character.id, CombatAction::Attack, Some(0))
            .await
            .expect("round resolves");

        let CombatResult::Round { outcome, encounter, .. } = result else {
            panic!("expected a combat round");
        };
        assert_eq!((outcome.damage_dealt, outcome.damage_received), (7, 3));
        assert_eq!((outcome.monster_hp, outcome.character_hp), (13, 47));
        assert!(!outcome.victory && !outcome.defeat);
        let encounter = encounter.expect("fight continues");
        assert_eq!((encounter.monster_hp, encounter.round), (13, 1));
    }

    #[tokio::test]
    async fn test_stale_round_is_rejected() {
        let character = hero();
        let mut mocks = Mocks::new(&character, goblin(100));
        mocks.characters.expect_save().times(1).returning(|_| Ok(()));
        let (service, sessions) = mocks.build(FixedRandomPort::constant(0));
        start_fight(&sessions, character.id, &goblin(100)).await;

        service
            .act(&owner(), character.id, CombatAction::Attack, Some(0))
            .await
            .expect("first round");
        let replay = service
            .act(&owner(), character.id, CombatAction::Attack, Some(0))
            .await;
        let missing = service
            .act(&owner(), character.id, CombatAction::Attack, None)
            .await;

        assert!(matches!(replay, Err(GameError::InvalidRequest(_))));
        assert!(matches!(missing, Err(GameError::InvalidRequest(_))));
        let handle = sessions.session(character.id).await;
        assert_eq!(handle.lock().await.encounter.as_ref().map(|e| e.round), Some(1));
    }

    #[tokio::test]
    async fn test_victory_persists_rewards_log_and_defeated_tile() {
        let character = hero();
        let mut mocks = Mocks::new(&character, goblin(5));
        mocks
            .characters
            .expect_save()
            .withf(|c| c.experience == 25 && c.gold == 10)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .logs
            .expect_append()
            .withf(|log| {
                log.outcome == CombatLogOutcome::Victory
                    && log.damage_dealt == 7
                    && log.experience_gained == 25
            })
            .times(1)
            .returning(|_| Ok(()));
        mocks.overrides.expect_get().returning(|_, _| Ok(None));
        mocks
            .overrides
            .expect_save()
            .withf(|o| o.flags.get("1,0") == Some(&TileFlag::Defeated))
            .times(1)
            .returning(|_| Ok(()));
        let (service, sessions) = mocks.build(FixedRandomPort::constant(0));
        start_fight(&sessions, character.id, &goblin(5)).await;

        let result = service
            .act(&owner(), character.id, CombatAction::Attack, Some(0))
            .await
            .expect("victory");

        let CombatResult::Round { outcome, encounter, .. } = result else {
            panic!("expected a combat round");
        };
        assert!(outcome.victory);
        assert_eq!(outcome.monster_hp, 0);
        assert!(encounter.is_none());

        let handle = sessions.session(character.id).await;
        let session = handle.lock().await;
        assert!(session.encounter.is_none());
        let tile = session
            .active_floor(1)
            .and_then(|l| l.grid.get(Position::new(1, 0)))
            .map(|t| t.kind);
        assert_eq!(
            tile,
            Some(TileKind::Monster {
                monster_id: MonsterId::new(1),
                defeated: true
            })
        );
    }

    #[tokio::test]
    async fn test_defeat_logs_and_ends_encounter() {
        let mut character = hero();
        character.hp = 2;
        let mut mocks = Mocks::new(&character, goblin(100));
        mocks
            .characters
            .expect_save()
            .withf(|c| c.hp == 0)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .logs
            .expect_append()
            .withf(|log| log.outcome == CombatLogOutcome::Defeat && log.gold_gained == 0)
            .times(1)
            .returning(|_| Ok(()));
        mocks.overrides.expect_save().never();
        let (service, sessions) = mocks.build(FixedRandomPort::constant(0));
        start_fight(&sessions, character.id, &goblin(100)).await;

        let result = service
            .act(&owner(), character.id, CombatAction::Attack, Some(0))
            .await
            .expect("defeat");

        assert!(matches!(result, CombatResult::Round { outcome, .. } if outcome.defeat));
        let handle = sessions.session(character.id).await;
        assert!(handle.lock().await.encounter.is_none());
    }

    #[tokio::test]
    async fn test_incapacitated_character_cannot_attack() {
        let mut character = hero();
        character.hp = 0;
        let mut mocks = Mocks::new(&character, goblin(20));
        mocks.characters.expect_save().never();
        let (service, sessions) = mocks.build(FixedRandomPort::constant(0));
        start_fight(&sessions, character.id, &goblin(20)).await;

        let result = service
            .act(&owner(), character.id, CombatAction::Attack, Some(0))
            .await;

        assert!(matches!(result, Err(GameError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_flee_ends_encounter_without_writes() {
        let character = hero();
        let mut mocks = Mocks::new(&character, goblin(20));
        mocks.characters.expect_save().never();
        mocks.logs.expect_append().never();
        let (service, sessions) = mocks.build(FixedRandomPort::constant(0));
        start_fight(&sessions, character.id, &goblin(20)).await;

        let result = service
            .act(&owner(), character.id, CombatAction::Flee, None)
            .await
            .expect("flee");

        assert_eq!(result, CombatResult::Fled(FleeOutcome { fled: true }));
        let handle = sessions.session(character.id).await;
        assert!(handle.lock().await.encounter.is_none());
    }

    #[tokio::test]
    async fn test_attack_without_encounter_is_rejected() {
        let character = hero();
        let (service, _) = Mocks::new(&character, goblin(20)).build(FixedRandomPort::constant(0));

        let result = service
            .act(&owner(), character.id, CombatAction::Attack, Some(0))
            .await;

        assert!(matches!(result, Err(GameError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_combat_log_uses_configured_limit() {
        let character = hero();
        let mut mocks = Mocks::new(&character, goblin(20));
        mocks
            .logs
            .expect_list_recent()
            .withf(|_, limit| *limit == 20)
            .times(1)
            .returning(|_, _| Ok(vec![]));
        let (service, _) = mocks.build(FixedRandomPort::constant(0));

        let logs = service.combat_log(&owner(), character.id).await.expect("logs");

        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_characters_leave_no_session() {
        let mut characters = MockCharacterRepositoryPort::new();
        characters.expect_get().returning(|_, _| Ok(None));
        let mocks = Mocks {
            characters,
            catalog: MockCatalogRepositoryPort::new(),
            overrides: MockTileOverrideRepositoryPort::new(),
            logs: MockCombatLogRepositoryPort::new(),
        };
        let (service, sessions) = mocks.build(FixedRandomPort::constant(0));

        for _ in 0..100 {
            let result = service
                .act(&owner(), CharacterId::new(), CombatAction::Flee, None)
                .await;
            assert!(matches!(result, Err(GameError::NotFound { .. })));
        }

        assert_eq!(sessions.len().await, 0);
    }
}
