//! Dungeon Service - floors, movement and tile interaction
//!
//! Floors are regenerated from the catalog's dimensions and then patched
//! with the character's persisted tile overrides. The resulting layout is
//! kept in the character's session as its active floor.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::application::errors::{GameError, GameResult};
use crate::application::ports::outbound::{
    CatalogRepositoryPort, CharacterRepositoryPort, ExplorationRepositoryPort,
    InventoryRepositoryPort, RandomPort, TileOverrideRepositoryPort,
};
use crate::application::services::character_service::{ensure_can_act, load_owned, lock_owned};
use crate::domain::entities::{
    Character, Encounter, ExplorationRecord, FloorLayout, Item, Monster, Tile, TileFlag, TileKind,
    TileOverrides,
};
use crate::domain::services::{generate_floor, merge_or_create};
use crate::domain::value_objects::{CharacterId, PlayerId, Position};
use crate::infrastructure::session::{PlayerSession, SessionManager};

/// Units of loot found in a chest
pub const CHEST_LOOT_QUANTITY: i32 = 1;

/// The active floor as seen by its character
#[derive(Debug, Clone)]
pub struct FloorView {
    pub layout: FloorLayout,
    pub explored: Option<ExplorationRecord>,
    pub encounter: Option<Encounter>,
}

/// Result of a single step
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub character: Character,
    pub tile: Tile,
    /// Set when the step started a fight
    pub encounter: Option<(Encounter, Monster)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    Looted { item: Item, quantity: i32 },
    Descended,
    Ascended,
    Nothing,
}

impl InteractionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Looted { .. } => "looted",
            Self::Descended => "descended",
            Self::Ascended => "ascended",
            Self::Nothing => "nothing",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionResult {
    pub outcome: InteractionOutcome,
    pub character: Character,
    /// The new active floor after taking stairs
    pub floor: Option<FloorLayout>,
}

/// Dungeon service trait defining the application use cases
#[async_trait]
pub trait DungeonService: Send + Sync {
    /// Generate the character's current floor and make it the active floor
    async fn enter_floor(&self, owner: &PlayerId, id: CharacterId) -> GameResult<FloorView>;

    /// Step one tile in a cardinal direction
    async fn move_character(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        dx: i32,
        dy: i32,
    ) -> GameResult<MoveResult>;

    /// Open the chest or take the stairs the character stands on
    async fn interact(&self, owner: &PlayerId, id: CharacterId) -> GameResult<InteractionResult>;

    /// Generate a floor with no character state applied
    async fn generate(&self, floor_number: i32) -> GameResult<FloorLayout>;

    /// Exploration records of a character, ordered by floor
    async fn progress(&self, owner: &PlayerId, id: CharacterId)
        -> GameResult<Vec<ExplorationRecord>>;

    /// Mark one tile explored
    async fn explore(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        floor_number: i32,
        position: Position,
    ) -> GameResult<ExplorationRecord>;

    async fn list_monsters(&self) -> GameResult<Vec<Monster>>;

    async fn list_items(&self) -> GameResult<Vec<Item>>;
}

/// Default implementation of DungeonService
pub struct DungeonServiceImpl {
    characters: Arc<dyn CharacterRepositoryPort>,
    catalog: Arc<dyn CatalogRepositoryPort>,
    exploration: Arc<dyn ExplorationRepositoryPort>,
    overrides: Arc<dyn TileOverrideRepositoryPort>,
    inventory: Arc<dyn InventoryRepositoryPort>,
    sessions: Arc<SessionManager>,
    rng: Arc<dyn RandomPort>,
}

impl DungeonServiceImpl {
    pub fn new(
        characters: Arc<dyn CharacterRepositoryPort>,
        catalog: Arc<dyn CatalogRepositoryPort>,
        exploration: Arc<dyn ExplorationRepositoryPort>,
        overrides: Arc<dyn TileOverrideRepositoryPort>,
        inventory: Arc<dyn InventoryRepositoryPort>,
        sessions: Arc<SessionManager>,
        rng: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            characters,
            catalog,
            exploration,
            overrides,
            inventory,
            sessions,
            rng,
        }
    }

    /// Generate `floor_number` and merge the character's overrides into it
    async fn load_floor(&self, character_id: CharacterId, floor_number: i32) -> GameResult<FloorLayout> {
        let mut layout = self.generate(floor_number).await?;
        if let Some(overrides) = self.overrides.get(character_id, floor_number).await? {
            overrides.apply_to(&mut layout.grid);
        }
        Ok(layout)
    }

    /// The session's active floor, regenerated when missing or stale
    async fn active_floor<'s>(
        &self,
        session: &'s mut PlayerSession,
        character: &Character,
    ) -> GameResult<&'s FloorLayout> {
        if session.active_floor(character.current_floor).is_none() {
            debug!(floor = character.current_floor, "Loading active floor");
            let layout = self.load_floor(character.id, character.current_floor).await?;
            session.floor = Some(layout);
        }
        session
            .floor
            .as_ref()
            .ok_or_else(|| GameError::not_found("Floor", character.current_floor))
    }

    async fn mark_override(&self, character: &Character, position: Position, flag: TileFlag) -> GameResult<()> {
        let mut overrides = self
            .overrides
            .get(character.id, character.current_floor)
            .await?
            .unwrap_or_else(|| TileOverrides::new(character.id, character.current_floor));
        overrides.mark(position, flag);
        self.overrides.save(&overrides).await?;
        Ok(())
    }

    /// Move the character to another floor and make it the active one
    async fn change_floor(
        &self,
        session: &mut PlayerSession,
        character: &mut Character,
        floor_number: i32,
    ) -> GameResult<FloorLayout> {
        if self.catalog.get_floor(floor_number).await?.is_none() {
            return Err(GameError::invalid(format!("There is no floor {}", floor_number)));
        }
        let layout = self.load_floor(character.id, floor_number).await?;

        character.change_floor(floor_number);
        self.characters.save(character).await?;

        session.floor = Some(layout.clone());
        Ok(layout)
    }
}

#[async_trait]
impl DungeonService for DungeonServiceImpl {
    #[instrument(skip(self))]
    async fn enter_floor(&self, owner: &PlayerId, id: CharacterId) -> GameResult<FloorView> {
        let (mut session, character) =
            lock_owned(self.characters.as_ref(), &self.sessions, owner, id).await?;

        // an open fight keeps its floor so the monster tile stays where it is
        let layout = if session.encounter.is_some() {
            self.active_floor(&mut session, &character).await?.clone()
        } else {
            let layout = self.load_floor(character.id, character.current_floor).await?;
            session.floor = Some(layout.clone());
            layout
        };
        let explored = self.exploration.get(character.id, character.current_floor).await?;

        info!(character_id = %id, floor = character.current_floor, "Entered floor");
        Ok(FloorView {
            layout,
            explored,
            encounter: session.encounter.clone(),
        })
    }

    #[instrument(skip(self))]
    async fn move_character(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        dx: i32,
        dy: i32,
    ) -> GameResult<MoveResult> {
        if dx.abs() + dy.abs() != 1 {
            return Err(GameError::invalid("Moves are exactly one tile up, down, left or right"));
        }

        let (mut session, mut character) =
            lock_owned(self.characters.as_ref(), &self.sessions, owner, id).await?;
        ensure_can_act(&character)?;
        if session.encounter.is_some() {
            return Err(GameError::invalid("Cannot move during an encounter"));
        }

        let target = character.position.offset(dx, dy);
        let tile = {
            let layout = self.active_floor(&mut session, &character).await?;
            *layout
                .grid
                .get(target)
                .ok_or_else(|| GameError::invalid(format!("{} is outside the floor", target)))?
        };
        if !tile.kind.is_walkable() {
            return Err(GameError::invalid(format!("{} is a wall", target)));
        }

        let monster = match tile.kind {
            TileKind::Monster {
                monster_id,
                defeated: false,
            } => Some(
                self.catalog
                    .get_monster(monster_id)
                    .await?
                    .ok_or_else(|| GameError::not_found("Monster", monster_id))?,
            ),
            _ => None,
        };

        character.position = target;
        self.characters.save(&character).await?;

        let existing = self.exploration.get(character.id, character.current_floor).await?;
        let record = merge_or_create(existing, character.id, character.current_floor, target);
        self.exploration.save(&record).await?;

        let encounter = monster.map(|monster| {
            let encounter = Encounter::start(&monster, character.current_floor, target);
            info!(
                character_id = %id,
                monster = %monster.name,
                encounter_id = %encounter.id,
                "Encounter started"
            );
            session.encounter = Some(encounter.clone());
            (encounter, monster)
        });

        debug!(character_id = %id, position = %target, tile = tile.kind.as_str(), "Moved");
        Ok(MoveResult {
            character,
            tile,
            encounter,
        })
    }

    #[instrument(skip(self))]
    async fn interact(&self, owner: &PlayerId, id: CharacterId) -> GameResult<InteractionResult> {
        let (mut session, mut character) =
            lock_owned(self.characters.as_ref(), &self.sessions, owner, id).await?;
        if session.encounter.is_some() {
            return Err(GameError::invalid("Cannot interact during an encounter"));
        }

        let kind = {
            let layout = self.active_floor(&mut session, &character).await?;
            layout.grid.get(character.position).map(|tile| tile.kind)
        };

        let (outcome, floor) = match kind {
            Some(TileKind::Chest { looted: false }) => {
                let item = self
                    .catalog
                    .get_item(Item::CHEST_LOOT)
                    .await?
                    .ok_or_else(|| GameError::not_found("Item", Item::CHEST_LOOT))?;
                self.inventory
                    .add_item(character.id, item.id, CHEST_LOOT_QUANTITY)
                    .await?;
                self.mark_override(&character, character.position, TileFlag::Looted)
                    .await?;
                session.mark_tile(character.current_floor, character.position, TileFlag::Looted);

                info!(character_id = %id, item = %item.name, "Looted chest");
                (
                    InteractionOutcome::Looted {
                        item,
                        quantity: CHEST_LOOT_QUANTITY,
                    },
                    None,
                )
            }
            Some(TileKind::StairsDown) => {
                let next = character.current_floor + 1;
                let layout = self.change_floor(&mut session, &mut character, next).await?;
                info!(character_id = %id, floor = next, "Descended");
                (InteractionOutcome::Descended, Some(layout))
            }
            Some(TileKind::StairsUp) if character.current_floor > 1 => {
                let previous = character.current_floor - 1;
                let layout = self
                    .change_floor(&mut session, &mut character, previous)
                    .await?;
                info!(character_id = %id, floor = previous, "Ascended");
                (InteractionOutcome::Ascended, Some(layout))
            }
            _ => (InteractionOutcome::Nothing, None),
        };

        Ok(InteractionResult {
            outcome,
            character,
            floor,
        })
    }

    #[instrument(skip(self))]
    async fn generate(&self, floor_number: i32) -> GameResult<FloorLayout> {
        let floor = self
            .catalog
            .get_floor(floor_number)
            .await?
            .ok_or_else(|| GameError::not_found("Floor", floor_number))?;
        let grid = generate_floor(self.rng.as_ref(), floor.width, floor.height, floor_number);
        Ok(FloorLayout { floor, grid })
    }

    #[instrument(skip(self))]
    async fn progress(
        &self,
        owner: &PlayerId,
        id: CharacterId,
    ) -> GameResult<Vec<ExplorationRecord>> {
        let character = load_owned(self.characters.as_ref(), owner, id).await?;
        Ok(self.exploration.list(character.id).await?)
    }

    #[instrument(skip(self))]
    async fn explore(
        &self,
        owner: &PlayerId,
        id: CharacterId,
        floor_number: i32,
        position: Position,
    ) -> GameResult<ExplorationRecord> {
        let (_session, character) =
            lock_owned(self.characters.as_ref(), &self.sessions, owner, id).await?;

        let floor = self
            .catalog
            .get_floor(floor_number)
            .await?
            .ok_or_else(|| GameError::not_found("Floor", floor_number))?;
        if position.x < 0 || position.y < 0 || position.x >= floor.width || position.y >= floor.height {
            warn!(character_id = %id, position = %position, "Explore outside floor bounds");
            return Err(GameError::invalid(format!(
                "{} is outside floor {}",
                position, floor_number
            )));
        }

        let existing = self.exploration.get(character.id, floor_number).await?;
        let record = merge_or_create(existing, character.id, floor_number, position);
        self.exploration.save(&record).await?;
        Ok(record)
    }

    async fn list_monsters(&self) -> GameResult<Vec<Monster>> {
        Ok(self.catalog.list_monsters().await?)
    }

    async fn list_items(&self) -> GameResult<Vec<Item>> {
        Ok(self.catalog.list_items().await?)
    }
}
