#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod services;
pub mod store;
pub mod telemetry;

// Re-exports for public API
pub use config::{ConfigError, StoreKind, TableConfig};
pub use domain::{
    create_authoritative, project, AuthoritativeGameDocument, Command, IllegalMove, LogEntry,
    PlayerInfo, ProjectedGameDocument, Seat, Tile, TileIndex, TilePlacement, TilePosition, Wind,
};
pub use errors::{DomainError, StoreError};
pub use services::{open_table, MoveOutcome, TableSession};
pub use store::{
    DocumentStore, GameId, InMemoryDocumentStore, MemoryBackend, RedisBackend,
    RemoteDocumentStore, Revision,
};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    table_test_support::logging::init();
}
