//! In-process document store.
//!
//! Each game lives in its own slot: a `tokio` mutex serializes updates per
//! game while different games proceed in parallel, and a `watch` channel
//! publishes the latest document to projection streams without ever blocking
//! the writer. Documents are kept as JSON snapshots at rest, like a remote
//! backend would keep them.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use super::{
    decode_snapshot, encode_snapshot, DocumentStore, DocumentUpdater, GameId, ProjectionStream,
    Revision,
};
use crate::domain::document::{AuthoritativeGameDocument, PlayerInfo};
use crate::domain::player_view::project;
use crate::domain::seats::{require_seat, Seat, SEATS};
use crate::errors::StoreError;

struct StoredGame {
    revision: Revision,
    snapshot: String,
}

struct GameSlot {
    stored: Mutex<StoredGame>,
    published: watch::Sender<Arc<AuthoritativeGameDocument>>,
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    games: DashMap<GameId, Arc<GameSlot>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn slot(&self, game_id: &GameId) -> Result<Arc<GameSlot>, StoreError> {
        self.games
            .get(game_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| StoreError::game_not_found(game_id, false))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_if_absent(
        &self,
        game_id: &GameId,
        doc: AuthoritativeGameDocument,
    ) -> Result<bool, StoreError> {
        let snapshot = encode_snapshot(&doc)?;
        match self.games.entry(game_id.clone()) {
            Entry::Occupied(_) => {
                debug!(game_id = %game_id, "Game already exists, not inserting");
                Ok(false)
            }
            Entry::Vacant(vacant) => {
                let (published, _) = watch::channel(Arc::new(doc));
                vacant.insert(Arc::new(GameSlot {
                    stored: Mutex::new(StoredGame {
                        revision: 0,
                        snapshot,
                    }),
                    published,
                }));
                debug!(game_id = %game_id, "Inserted game");
                Ok(true)
            }
        }
    }

    async fn roster(&self, game_id: &GameId) -> Result<[PlayerInfo; SEATS], StoreError> {
        let slot = self.slot(game_id)?;
        let players = slot.published.borrow().players.clone();
        Ok(players)
    }

    async fn projection_stream(
        &self,
        game_id: &GameId,
        seat: Seat,
    ) -> Result<ProjectionStream, StoreError> {
        require_seat(seat)?;
        let slot = self.slot(game_id)?;
        let stream = WatchStream::new(slot.published.subscribe())
            .filter_map(move |doc| project(&doc, seat).ok());
        Ok(Box::pin(stream))
    }

    async fn update(
        &self,
        game_id: &GameId,
        updater: DocumentUpdater<'_>,
    ) -> Result<Revision, StoreError> {
        let slot = self.slot(game_id)?;
        let mut stored = slot.stored.lock().await;

        let mut doc = decode_snapshot(&stored.snapshot)?;
        updater(&mut doc)?;

        let violations = doc.invariant_violations();
        if !violations.is_empty() {
            warn!(game_id = %game_id, ?violations, "Update left the document inconsistent");
        }

        stored.snapshot = encode_snapshot(&doc)?;
        stored.revision += 1;
        let revision = stored.revision;
        slot.published.send_replace(Arc::new(doc));

        debug!(game_id = %game_id, revision, "Updated game");
        Ok(revision)
    }

    async fn load_authoritative(
        &self,
        game_id: &GameId,
    ) -> Result<(Revision, AuthoritativeGameDocument), StoreError> {
        let slot = self.slot(game_id)?;
        let stored = slot.stored.lock().await;
        Ok((stored.revision, decode_snapshot(&stored.snapshot)?))
    }
}
