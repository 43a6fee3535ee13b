//! Domain layer: pure table logic types and helpers.

pub mod deck;
pub mod document;
pub mod ledger;
pub mod moves;
pub mod player_view;
pub mod random;
pub mod replay;
pub mod seats;
pub mod seed_derivation;
pub mod tiles_logic;
pub mod tiles_parsing;
pub mod tiles_serde;
pub mod tiles_types;
pub mod validators;
pub mod wall;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_moves;
#[cfg(test)]
mod tests_props_replay;
#[cfg(test)]
mod tests_validators;

// Re-exports for ergonomics
pub use deck::{fingerprint, shuffled_deck, verify_fingerprint, DeckFingerprint, DECK_SIZE};
pub use document::{
    check_invariants, create_authoritative, AuthoritativeGameDocument, AuthoritativeTileRecord,
    InvariantViolation, PlayerInfo, SeenBy, TilePlacement, TilePosition,
};
pub use ledger::LogEntry;
pub use moves::{apply, CallType, Command};
pub use player_view::{project, project_for_player, ProjectedGameDocument, ProjectedTileRecord};
pub use random::RandomSource;
pub use replay::replay;
pub use seats::{Seat, SEATS};
pub use tiles_types::{Dragon, Tile, TileKind, Wind};
pub use validators::{validate, IllegalMove};
pub use wall::{TileIndex, WallGeometry, DEAD_WALL_SIZE, WALL_SIZE};
