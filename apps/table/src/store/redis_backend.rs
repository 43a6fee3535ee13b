//! Redis backend for [`super::RemoteDocumentStore`].
//!
//! Each game is a hash `table:game:{id}` with fields `rev` and `doc`. Inserts
//! and compare-and-swap run as Lua scripts so they are atomic on the server;
//! a successful swap publishes the new revision on `table:game:{id}:changes`.

use std::error::Error as StdError;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use once_cell::sync::Lazy;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError, Script};
use tracing::{debug, info, warn};

use super::remote::{DocumentBackend, VersionedSnapshot};
use super::{GameId, Revision};
use crate::errors::StoreError;

const INSERT_IF_ABSENT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], 'rev', 0, 'doc', ARGV[1])
return 1
";

const COMPARE_AND_SWAP: &str = r"
local rev = redis.call('HGET', KEYS[1], 'rev')
if not rev then
    return -1
end
if tonumber(rev) ~= tonumber(ARGV[1]) then
    return 0
end
local next_rev = tonumber(rev) + 1
redis.call('HSET', KEYS[1], 'rev', next_rev, 'doc', ARGV[2])
redis.call('PUBLISH', KEYS[2], next_rev)
return 1
";

static INSERT_SCRIPT: Lazy<Script> = Lazy::new(|| Script::new(INSERT_IF_ABSENT));
static CAS_SCRIPT: Lazy<Script> = Lazy::new(|| Script::new(COMPARE_AND_SWAP));

pub struct RedisBackend {
    client: Client,
    connection: ConnectionManager,
}

impl RedisBackend {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)
            .map_err(|err| StoreError::unavailable(format!("Invalid REDIS_URL: {err}"), false, err))?;
        let connection = ConnectionManager::new(client.clone())
            .await
            .map_err(|err| redis_unavailable("Unable to initialize Redis connection manager", err))?;
        info!("Connected document store to Redis");

        Ok(Self {
            client,
            connection,
        })
    }
}

fn document_key(game_id: &GameId) -> String {
    format!("table:game:{game_id}")
}

fn changes_channel(game_id: &GameId) -> String {
    format!("table:game:{game_id}:changes")
}

fn redis_unavailable(detail: &str, err: RedisError) -> StoreError {
    let transient = is_transient(&err);
    StoreError::unavailable(format!("{detail}: {err}"), transient, err)
}

/// Connection-level failures are worth retrying; auth and protocol errors are not.
fn is_transient(err: &RedisError) -> bool {
    let message = err.to_string().to_lowercase();

    if message.contains("authentication")
        || message.contains("noauth")
        || message.contains("wrongpass")
        || message.contains("noscript")
        || message.contains("unsupported")
    {
        return false;
    }

    if message.contains("connection refused")
        || message.contains("connection reset")
        || message.contains("broken pipe")
        || message.contains("timed out")
        || message.contains("timeout")
        || message.contains("io error")
        || message.contains("loading")
        || message.contains("tryagain")
    {
        return true;
    }

    if let Some(io_err) = StdError::source(err).and_then(|s| s.downcast_ref::<std::io::Error>()) {
        return matches!(
            io_err.kind(),
            std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::TimedOut
                | std::io::ErrorKind::Interrupted
        );
    }

    false
}

#[async_trait]
impl DocumentBackend for RedisBackend {
    async fn load(&self, game_id: &GameId) -> Result<Option<VersionedSnapshot>, StoreError> {
        let mut connection = self.connection.clone();
        let (revision, snapshot): (Option<Revision>, Option<String>) = redis::cmd("HMGET")
            .arg(document_key(game_id))
            .arg("rev")
            .arg("doc")
            .query_async(&mut connection)
            .await
            .map_err(|err| redis_unavailable("Failed to load game from Redis", err))?;

        Ok(match (revision, snapshot) {
            (Some(revision), Some(snapshot)) => Some(VersionedSnapshot { revision, snapshot }),
            _ => None,
        })
    }

    async fn insert_if_absent(&self, game_id: &GameId, snapshot: String) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let inserted: i64 = INSERT_SCRIPT
            .key(document_key(game_id))
            .arg(snapshot)
            .invoke_async(&mut connection)
            .await
            .map_err(|err| redis_unavailable("Failed to insert game into Redis", err))?;
        Ok(inserted == 1)
    }

    async fn compare_and_swap(
        &self,
        game_id: &GameId,
        expected: Revision,
        snapshot: String,
    ) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let outcome: i64 = CAS_SCRIPT
            .key(document_key(game_id))
            .key(changes_channel(game_id))
            .arg(expected)
            .arg(snapshot)
            .invoke_async(&mut connection)
            .await
            .map_err(|err| redis_unavailable("Failed to update game in Redis", err))?;

        match outcome {
            1 => Ok(true),
            0 => {
                debug!(game_id = %game_id, expected, "Redis revision moved");
                Ok(false)
            }
            _ => Err(StoreError::game_not_found(game_id, true)),
        }
    }

    async fn watch(&self, game_id: &GameId) -> Result<BoxStream<'static, Option<Revision>>, StoreError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|err| redis_unavailable("Failed to create Redis pubsub", err))?;
        let channel = changes_channel(game_id);
        pubsub
            .subscribe(&channel)
            .await
            .map_err(|err| redis_unavailable("Failed to subscribe to game changes", err))?;
        debug!(channel = %channel, "Subscribed to game changes");

        let stream = pubsub.into_on_message().map(move |msg| match msg.get_payload::<Revision>() {
            Ok(revision) => Some(revision),
            Err(err) => {
                warn!(error = %err, "Unreadable change notification, reloading anyway");
                None
            }
        });
        Ok(stream.boxed())
    }
}
