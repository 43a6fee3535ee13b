//! Document stores: the sole owners of authoritative game documents.
//!
//! Seats never touch an [`AuthoritativeGameDocument`]. They submit updaters
//! through [`DocumentStore::update`] and read per-seat projections from
//! [`DocumentStore::projection_stream`].

pub mod memory;
pub mod redis_backend;
pub mod remote;

use std::fmt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ulid::Ulid;

use crate::domain::document::{seat_of, AuthoritativeGameDocument, PlayerInfo};
use crate::domain::player_view::ProjectedGameDocument;
use crate::domain::seats::{Seat, SEATS};
use crate::errors::{DomainError, StoreError};

pub use memory::InMemoryDocumentStore;
pub use redis_backend::RedisBackend;
pub use remote::{DocumentBackend, MemoryBackend, RemoteDocumentStore, RetryPolicy, VersionedSnapshot};

/// Opaque game identifier, `game-{ulid}` for generated ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn generate() -> Self {
        Self(format!("game-{}", Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Fresh ids tried by [`DocumentStore::create`] before giving up.
pub const CREATE_ATTEMPTS: u32 = 3;

/// Monotonic per-game write counter. A freshly inserted game is at revision 0.
pub type Revision = u64;

/// A move applied inside [`DocumentStore::update`]. It may run more than once
/// when an optimistic store retries, so it must be a pure function of the
/// document it is given.
pub type DocumentUpdater<'a> =
    &'a (dyn Fn(&mut AuthoritativeGameDocument) -> Result<(), DomainError> + Send + Sync);

/// Stream of projections for one seat, newest state last.
pub type ProjectionStream = BoxStream<'static, ProjectedGameDocument>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new game under a freshly generated id, drawing another id if
    /// the first is already taken.
    async fn create(&self, doc: AuthoritativeGameDocument) -> Result<GameId, StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let game_id = GameId::generate();
            if self.insert_if_absent(&game_id, doc.clone()).await? {
                return Ok(game_id);
            }
            warn!(game_id = %game_id, attempt, "Generated game id already taken");
            if attempt >= CREATE_ATTEMPTS {
                return Err(StoreError::Conflict {
                    game_id: game_id.to_string(),
                    attempts: attempt,
                });
            }
        }
    }

    /// Store `doc` unless the id is taken. Returns whether it was inserted.
    async fn insert_if_absent(
        &self,
        game_id: &GameId,
        doc: AuthoritativeGameDocument,
    ) -> Result<bool, StoreError>;

    async fn roster(&self, game_id: &GameId) -> Result<[PlayerInfo; SEATS], StoreError>;

    /// Current projection for `seat` followed by one per published change.
    /// Consumers that fall behind may skip intermediate states.
    async fn projection_stream(
        &self,
        game_id: &GameId,
        seat: Seat,
    ) -> Result<ProjectionStream, StoreError>;

    /// Projection stream for the seat the roster gives `player_id`.
    async fn get(&self, game_id: &GameId, player_id: &str) -> Result<ProjectionStream, StoreError> {
        let players = self.roster(game_id).await?;
        let seat = seat_of(&players, player_id).ok_or_else(|| StoreError::player_not_found(player_id))?;
        self.projection_stream(game_id, seat).await
    }

    /// Read, apply `updater`, persist, republish. On error nothing is written.
    async fn update(&self, game_id: &GameId, updater: DocumentUpdater<'_>) -> Result<Revision, StoreError>;

    /// Server-side read of the ground truth, for replay checks and tooling.
    async fn load_authoritative(
        &self,
        game_id: &GameId,
    ) -> Result<(Revision, AuthoritativeGameDocument), StoreError>;
}

/// Serialize a document the way stores keep it at rest.
pub fn encode_snapshot(doc: &AuthoritativeGameDocument) -> Result<String, StoreError> {
    Ok(serde_json::to_string(doc)?)
}

pub fn decode_snapshot(snapshot: &str) -> Result<AuthoritativeGameDocument, StoreError> {
    Ok(serde_json::from_str(snapshot)?)
}
