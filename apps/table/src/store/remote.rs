//! Optimistic document store over a shared backend.
//!
//! Backends only need revisioned reads, an atomic compare-and-swap, and a
//! change feed. Concurrent writers from independent processes are serialized
//! by retrying the read-modify-write until the swap lands on the revision it
//! read.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use super::{
    decode_snapshot, encode_snapshot, DocumentStore, DocumentUpdater, GameId, ProjectionStream,
    Revision,
};
use crate::domain::document::{AuthoritativeGameDocument, PlayerInfo};
use crate::domain::player_view::{project, ProjectedGameDocument};
use crate::domain::seats::{require_seat, Seat, SEATS};
use crate::errors::StoreError;

/// A serialized document and the revision it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedSnapshot {
    pub revision: Revision,
    pub snapshot: String,
}

#[async_trait]
pub trait DocumentBackend: Send + Sync + 'static {
    async fn load(&self, game_id: &GameId) -> Result<Option<VersionedSnapshot>, StoreError>;

    /// Write `snapshot` at revision 0 unless the game exists.
    async fn insert_if_absent(&self, game_id: &GameId, snapshot: String) -> Result<bool, StoreError>;

    /// Write `snapshot` at `expected + 1` only if the stored revision is still
    /// `expected`. Returns whether the write happened.
    async fn compare_and_swap(
        &self,
        game_id: &GameId,
        expected: Revision,
        snapshot: String,
    ) -> Result<bool, StoreError>;

    /// Change notifications for one game. `None` means notifications were
    /// dropped and the consumer should reload.
    async fn watch(&self, game_id: &GameId) -> Result<BoxStream<'static, Option<Revision>>, StoreError>;
}

/// Bounded exponential backoff for lost compare-and-swap races.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay_ms: 5,
            max_delay_ms: 200,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        let base = self.initial_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        // Up to 20% jitter so racing writers fall out of step.
        let jitter = (rand::random::<f64>() * 0.2 * base as f64) as u64;
        Duration::from_millis(base + jitter)
    }
}

pub struct RemoteDocumentStore<B: DocumentBackend> {
    backend: Arc<B>,
    retry: RetryPolicy,
}

impl<B: DocumentBackend> RemoteDocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_retry(backend, RetryPolicy::default())
    }

    pub fn with_retry(backend: B, retry: RetryPolicy) -> Self {
        Self {
            backend: Arc::new(backend),
            retry,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn load_existing(&self, game_id: &GameId) -> Result<VersionedSnapshot, StoreError> {
        load_existing(self.backend.as_ref(), game_id).await
    }
}

// A missing document may be a replication artefact on a remote backend, so
// it is reported as retryable.
async fn load_existing<B: DocumentBackend>(
    backend: &B,
    game_id: &GameId,
) -> Result<VersionedSnapshot, StoreError> {
    backend
        .load(game_id)
        .await?
        .ok_or_else(|| StoreError::game_not_found(game_id, true))
}

async fn load_projection<B: DocumentBackend>(
    backend: &B,
    game_id: &GameId,
    seat: Seat,
) -> Result<ProjectedGameDocument, StoreError> {
    let current = load_existing(backend, game_id).await?;
    let doc = decode_snapshot(&current.snapshot)?;
    Ok(project(&doc, seat)?)
}

#[async_trait]
impl<B: DocumentBackend> DocumentStore for RemoteDocumentStore<B> {
    async fn insert_if_absent(
        &self,
        game_id: &GameId,
        doc: AuthoritativeGameDocument,
    ) -> Result<bool, StoreError> {
        let inserted = self
            .backend
            .insert_if_absent(game_id, encode_snapshot(&doc)?)
            .await?;
        debug!(game_id = %game_id, inserted, "Insert-if-absent");
        Ok(inserted)
    }

    async fn roster(&self, game_id: &GameId) -> Result<[PlayerInfo; SEATS], StoreError> {
        let current = self.load_existing(game_id).await?;
        Ok(decode_snapshot(&current.snapshot)?.players)
    }

    async fn projection_stream(
        &self,
        game_id: &GameId,
        seat: Seat,
    ) -> Result<ProjectionStream, StoreError> {
        require_seat(seat)?;
        // Subscribe before the first read so no change can slip in between.
        let changes = self.backend.watch(game_id).await?;
        let initial = load_projection(self.backend.as_ref(), game_id, seat).await?;

        let backend = Arc::clone(&self.backend);
        let game_id = game_id.clone();
        let updates = changes.filter_map(move |_| {
            let backend = Arc::clone(&backend);
            let game_id = game_id.clone();
            async move {
                match load_projection(backend.as_ref(), &game_id, seat).await {
                    Ok(view) => Some(view),
                    Err(err) => {
                        warn!(game_id = %game_id, seat, error = %err, "Dropped projection refresh");
                        None
                    }
                }
            }
        });

        Ok(stream::iter([initial]).chain(updates).boxed())
    }

    async fn update(
        &self,
        game_id: &GameId,
        updater: DocumentUpdater<'_>,
    ) -> Result<Revision, StoreError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let current = self.load_existing(game_id).await?;
            let mut doc = decode_snapshot(&current.snapshot)?;
            updater(&mut doc)?;

            let violations = doc.invariant_violations();
            if !violations.is_empty() {
                warn!(game_id = %game_id, ?violations, "Update left the document inconsistent");
            }

            let swapped = self
                .backend
                .compare_and_swap(game_id, current.revision, encode_snapshot(&doc)?)
                .await?;
            if swapped {
                let revision = current.revision + 1;
                debug!(game_id = %game_id, revision, attempt, "Updated game");
                return Ok(revision);
            }

            if attempt >= self.retry.max_attempts {
                warn!(game_id = %game_id, attempt, "Giving up after repeated revision conflicts");
                return Err(StoreError::Conflict {
                    game_id: game_id.to_string(),
                    attempts: attempt,
                });
            }

            let delay = self.retry.delay(attempt);
            debug!(
                game_id = %game_id,
                attempt,
                expected_revision = current.revision,
                retry_delay_ms = delay.as_millis() as u64,
                "Revision moved underneath update, retrying"
            );
            sleep(delay).await;
        }
    }

    async fn load_authoritative(
        &self,
        game_id: &GameId,
    ) -> Result<(Revision, AuthoritativeGameDocument), StoreError> {
        let current = self.load_existing(game_id).await?;
        Ok((current.revision, decode_snapshot(&current.snapshot)?))
    }
}

const CHANGE_FEED_CAPACITY: usize = 64;

/// In-process backend honouring the full backend contract. The reference
/// against which other backends are tested.
#[derive(Default)]
pub struct MemoryBackend {
    snapshots: DashMap<GameId, VersionedSnapshot>,
    feeds: DashMap<GameId, broadcast::Sender<Revision>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce `revision` to current watchers. A feed nobody listens to any
    /// more is dropped.
    fn publish(&self, game_id: &GameId, revision: Revision) {
        let Some(feed) = self.feeds.get(game_id).map(|entry| entry.value().clone()) else {
            return;
        };
        if feed.send(revision).is_err() {
            self.feeds
                .remove_if(game_id, |_, feed| feed.receiver_count() == 0);
        }
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn load(&self, game_id: &GameId) -> Result<Option<VersionedSnapshot>, StoreError> {
        Ok(self.snapshots.get(game_id).map(|entry| entry.value().clone()))
    }

    async fn insert_if_absent(&self, game_id: &GameId, snapshot: String) -> Result<bool, StoreError> {
        match self.snapshots.entry(game_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(VersionedSnapshot {
                    revision: 0,
                    snapshot,
                });
                Ok(true)
            }
        }
    }

    async fn compare_and_swap(
        &self,
        game_id: &GameId,
        expected: Revision,
        snapshot: String,
    ) -> Result<bool, StoreError> {
        let revision = {
            let Some(mut entry) = self.snapshots.get_mut(game_id) else {
                return Err(StoreError::game_not_found(game_id, true));
            };
            if entry.revision != expected {
                return Ok(false);
            }
            entry.revision = expected + 1;
            entry.snapshot = snapshot;
            entry.revision
        };
        self.publish(game_id, revision);
        Ok(true)
    }

    async fn watch(&self, game_id: &GameId) -> Result<BoxStream<'static, Option<Revision>>, StoreError> {
        // Subscribe under the entry lock so a concurrent prune cannot drop the feed.
        let receiver = self
            .feeds
            .entry(game_id.clone())
            .or_insert_with(|| broadcast::channel(CHANGE_FEED_CAPACITY).0)
            .subscribe();
        Ok(BroadcastStream::new(receiver).map(|change| change.ok()).boxed())
    }
}
