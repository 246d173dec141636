//! Session management for characters in play
//!
//! Each character gets one in-process session holding its active floor and
//! its current encounter. A session sits behind its own mutex: services lock
//! it for the whole read-modify-write of an operation, so requests for the
//! same character run one at a time while different characters proceed in
//! parallel.
//!
//! Sessions are not persisted. After a restart, or once an idle session is
//! evicted, floors are regenerated on demand and open encounters are gone.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{Encounter, FloorLayout, TileFlag};
use crate::domain::value_objects::{CharacterId, Position};

/// Per-character state that lives only while the server runs
#[derive(Debug, Default)]
pub struct PlayerSession {
    /// The floor layout the character is walking on
    pub floor: Option<FloorLayout>,
    /// The fight in progress, if any
    pub encounter: Option<Encounter>,
}

impl PlayerSession {
    /// The active floor, if it matches `floor_number`
    pub fn active_floor(&self, floor_number: i32) -> Option<&FloorLayout> {
        self.floor
            .as_ref()
            .filter(|layout| layout.floor.floor_number == floor_number)
    }

    /// Set a tile flag on the active floor so it holds without a reload
    pub fn mark_tile(&mut self, floor_number: i32, position: Position, flag: TileFlag) {
        let Some(layout) = self
            .floor
            .as_mut()
            .filter(|layout| layout.floor.floor_number == floor_number)
        else {
            return;
        };
        if let Some(tile) = layout.grid.get_mut(position) {
            flag.apply(&mut tile.kind);
        }
    }
}

/// Shared handle to one character's session
pub type SessionHandle = Arc<Mutex<PlayerSession>>;

/// Default cap on the number of sessions held at once
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_used: Instant,
}

impl SessionEntry {
    /// Nobody outside the registry holds the handle
    fn is_idle(&self) -> bool {
        Arc::strong_count(&self.handle) == 1
    }
}

/// Registry of character sessions
///
/// Sessions unused for a while are dropped by [`SessionManager::evict_idle`].
/// When the registry is full, the least recently used idle session makes room
/// for a new one.
#[derive(Debug)]
pub struct SessionManager {
    sessions: Mutex<HashMap<CharacterId, SessionEntry>>,
    max_sessions: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionManager {
    /// Create a session manager holding at most `max_sessions` idle sessions
    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Get the session of a character, creating an empty one on first use
    ///
    /// Callers check that the character exists before asking for its session.
    pub async fn session(&self, character_id: CharacterId) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        if let Some(entry) = sessions.get_mut(&character_id) {
            entry.last_used = now;
            return Arc::clone(&entry.handle);
        }

        if sessions.len() >= self.max_sessions {
            Self::evict_least_recent(&mut sessions);
        }

        let handle = SessionHandle::default();
        sessions.insert(
            character_id,
            SessionEntry {
                handle: Arc::clone(&handle),
                last_used: now,
            },
        );
        handle
    }

    fn evict_least_recent(sessions: &mut HashMap<CharacterId, SessionEntry>) {
        let oldest = sessions
            .iter()
            .filter(|(_, entry)| entry.is_idle())
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| *id);

        match oldest {
            Some(id) => {
                sessions.remove(&id);
                debug!(character_id = %id, "Evicted least recently used session");
            }
            None => warn!(count = sessions.len(), "Session limit reached with every session in use"),
        }
    }

    /// Drop sessions nobody has used for `max_idle`, returning how many went
    ///
    /// A session whose lock is held or awaited is kept.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle() || entry.last_used.elapsed() < max_idle);
        before - sessions.len()
    }

    /// Number of characters with a session
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
