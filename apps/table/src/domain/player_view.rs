//! Per-seat view of a game: what one seat is entitled to know.
//!
//! A [`ProjectedGameDocument`] is a pure function of the authoritative
//! document and the viewing seat. Tile values are kept only where the seat is
//! in `seen_by`; everything else is replaced with `None`. The shuffle seed is
//! never carried because it would reconstruct the whole deck.

use serde::{Deserialize, Serialize};

use super::deck::DeckFingerprint;
use super::document::{seat_of, AuthoritativeGameDocument, PlayerInfo, TilePlacement};
use super::ledger::LogEntry;
use super::seats::{require_seat, Seat, SEATS};
use super::tiles_types::{Tile, Wind};
use super::wall::TileIndex;
use crate::errors::domain::DomainError;

/// A tile as one seat sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedTileRecord {
    #[serde(flatten)]
    pub placement: TilePlacement,
    /// `None` when the viewer has not seen this tile.
    pub tile: Option<Tile>,
    /// Every seat has seen the tile.
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedGameDocument {
    /// Seat this view was projected for.
    pub seat: Seat,
    pub players: [PlayerInfo; SEATS],
    pub prevalent_wind: Wind,
    pub deck_integrity: DeckFingerprint,
    pub tiles: Vec<ProjectedTileRecord>,
    pub ledger: Vec<LogEntry>,
}

impl ProjectedGameDocument {
    pub fn tile(&self, index: TileIndex) -> Option<&ProjectedTileRecord> {
        self.tiles.get(index)
    }

    /// Tiles whose value this seat knows, with their index.
    pub fn known_tiles(&self) -> impl Iterator<Item = (TileIndex, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(i, record)| record.tile.map(|tile| (i, tile)))
    }
}

/// Project `doc` for `seat`. Total for every seat in `0..=3`.
pub fn project(
    doc: &AuthoritativeGameDocument,
    seat: Seat,
) -> Result<ProjectedGameDocument, DomainError> {
    require_seat(seat)?;
    let tiles = doc
        .tiles
        .iter()
        .map(|record| ProjectedTileRecord {
            placement: record.placement,
            tile: record.seen_by.contains(seat).then_some(record.tile),
            public: record.seen_by.is_public(),
        })
        .collect();

    Ok(ProjectedGameDocument {
        seat,
        players: doc.players.clone(),
        prevalent_wind: doc.prevalent_wind,
        deck_integrity: doc.deck_integrity.clone(),
        tiles,
        ledger: doc.ledger.clone(),
    })
}

/// Project for the seat the roster assigns to `player_id`, if any.
pub fn project_for_player(
    doc: &AuthoritativeGameDocument,
    player_id: &str,
) -> Option<ProjectedGameDocument> {
    let seat = seat_of(&doc.players, player_id)?;
    project(doc, seat).ok()
}
