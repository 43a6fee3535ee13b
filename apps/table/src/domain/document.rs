//! The authoritative game document: ground truth owned by the store.
//!
//! Nothing in this module may be handed to a seat directly. Seats only ever
//! receive [`crate::domain::player_view::ProjectedGameDocument`]s derived from
//! it.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::deck::{fingerprint, shuffle, unshuffled_deck, DeckFingerprint, DECK_SIZE};
use super::ledger::LogEntry;
use super::random::RandomSource;
use super::seats::{Seat, ALL_SEATS, SEATS};
use super::tiles_types::{Tile, Wind};
use super::wall::{wall_seat, wall_slot, TileIndex};
use crate::errors::domain::{ArgumentKind, DomainError};

/// Where a tile sits on the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilePosition {
    Wall,
    Hand,
    Discards,
    Palm,
    Melds,
}

/// Physical placement of a tile. `index` is unique only within
/// (`position`, `seat`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    pub position: TilePosition,
    pub seat: Seat,
    pub index: usize,
    pub rotated: bool,
    pub flipped: bool,
}

impl TilePlacement {
    pub const fn new(position: TilePosition, seat: Seat, index: usize) -> Self {
        Self {
            position,
            seat,
            index,
            rotated: false,
            flipped: false,
        }
    }

    /// Initial wall placement of the tile at deck position `tile`.
    pub fn in_wall(tile: TileIndex) -> Self {
        Self::new(TilePosition::Wall, wall_seat(tile), wall_slot(tile))
    }
}

/// Set of seats that have legitimately observed a tile.
///
/// Stored as a bitmask; serialized as a sorted list of seats.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Seat>", try_from = "Vec<Seat>")]
pub struct SeenBy(u8);

impl SeenBy {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b1111)
    }

    pub fn contains(self, seat: Seat) -> bool {
        usize::from(seat) < SEATS && self.0 & (1 << seat) != 0
    }

    /// Returns the set with `seat` added. Sets only ever grow.
    pub fn with(self, seat: Seat) -> Self {
        if usize::from(seat) < SEATS {
            Self(self.0 | (1 << seat))
        } else {
            self
        }
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Every seat has seen the tile.
    pub fn is_public(self) -> bool {
        self.len() == SEATS
    }

    pub fn is_superset_of(self, other: SeenBy) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn seats(self) -> impl Iterator<Item = Seat> {
        ALL_SEATS.into_iter().filter(move |&s| self.contains(s))
    }
}

impl From<SeenBy> for Vec<Seat> {
    fn from(seen: SeenBy) -> Self {
        seen.seats().collect()
    }
}

impl TryFrom<Vec<Seat>> for SeenBy {
    type Error = DomainError;

    fn try_from(seats: Vec<Seat>) -> Result<Self, Self::Error> {
        seats.into_iter().try_fold(SeenBy::empty(), |acc, seat| {
            if usize::from(seat) < SEATS {
                Ok(acc.with(seat))
            } else {
                Err(DomainError::invalid(
                    ArgumentKind::Seat,
                    format!("seen_by seat {seat} is outside 0..=3"),
                ))
            }
        })
    }
}

/// Ground-truth record of one physical tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritativeTileRecord {
    #[serde(flatten)]
    pub placement: TilePlacement,
    pub tile: Tile,
    pub seen_by: SeenBy,
}

/// Seat roster entry; immutable for the life of a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub id: String,
    pub avatar_url: String,
    pub seat_wind: Wind,
    pub points: i32,
}

/// The state of a game that must never be seen by a client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritativeGameDocument {
    pub players: [PlayerInfo; SEATS],
    pub prevalent_wind: Wind,
    pub seed: u32,
    pub deck_integrity: DeckFingerprint,
    pub tiles: Vec<AuthoritativeTileRecord>,
    pub ledger: Vec<LogEntry>,
}

/// Build a fresh game: resolve the seed, shuffle, fingerprint, and stack every
/// tile in the wall face down.
pub fn create_authoritative(
    players: [PlayerInfo; SEATS],
    seed: Option<u32>,
) -> Result<AuthoritativeGameDocument, DomainError> {
    validate_roster(&players)?;

    let (mut rng, seed) = match seed {
        Some(seed) => (RandomSource::new(seed), seed),
        None => RandomSource::from_entropy(),
    };
    let deck = shuffle(&unshuffled_deck(), &mut rng);
    let deck_integrity = fingerprint(&deck);

    let tiles = deck
        .into_iter()
        .enumerate()
        .map(|(index, tile)| AuthoritativeTileRecord {
            placement: TilePlacement::in_wall(index),
            tile,
            seen_by: SeenBy::empty(),
        })
        .collect();

    debug!(seed, deck_integrity = %deck_integrity, "Created authoritative game document");

    Ok(AuthoritativeGameDocument {
        players,
        prevalent_wind: Wind::East,
        seed,
        deck_integrity,
        tiles,
        ledger: Vec::new(),
    })
}

fn validate_roster(players: &[PlayerInfo; SEATS]) -> Result<(), DomainError> {
    let ids: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
    if ids.len() != SEATS {
        return Err(DomainError::invalid(
            ArgumentKind::Roster,
            "Player ids must be unique",
        ));
    }
    let winds: HashSet<Wind> = players.iter().map(|p| p.seat_wind).collect();
    if winds.len() != SEATS {
        return Err(DomainError::invalid(
            ArgumentKind::Roster,
            "Each seat must have a different wind",
        ));
    }
    Ok(())
}

impl AuthoritativeGameDocument {
    pub fn tile(&self, index: TileIndex) -> Result<&AuthoritativeTileRecord, DomainError> {
        self.tiles.get(index).ok_or_else(|| DomainError::tile_index(index))
    }

    pub fn tile_mut(
        &mut self,
        index: TileIndex,
    ) -> Result<&mut AuthoritativeTileRecord, DomainError> {
        self.tiles
            .get_mut(index)
            .ok_or_else(|| DomainError::tile_index(index))
    }

    pub fn seat_of(&self, player_id: &str) -> Option<Seat> {
        seat_of(&self.players, player_id)
    }

    pub fn next_free_index(&self, position: TilePosition, seat: Seat) -> usize {
        next_free_index(self.tiles.iter().map(|t| &t.placement), position, seat)
    }

    pub fn invariant_violations(&self) -> Vec<InvariantViolation> {
        check_invariants(self.tiles.iter().map(|t| &t.placement))
    }
}

/// Seat of the player with `player_id`, by roster order.
pub fn seat_of(players: &[PlayerInfo; SEATS], player_id: &str) -> Option<Seat> {
    players
        .iter()
        .position(|p| p.id == player_id)
        .map(|seat| seat as Seat)
}

/// Seat whose player holds `wind`.
pub fn seat_with_wind(players: &[PlayerInfo; SEATS], wind: Wind) -> Option<Seat> {
    players
        .iter()
        .position(|p| p.seat_wind == wind)
        .map(|seat| seat as Seat)
}

/// Smallest non-negative slot not already used by (`position`, `seat`).
pub fn next_free_index<'a, I>(placements: I, position: TilePosition, seat: Seat) -> usize
where
    I: IntoIterator<Item = &'a TilePlacement>,
{
    let used: HashSet<usize> = placements
        .into_iter()
        .filter(|p| p.position == position && p.seat == seat)
        .map(|p| p.index)
        .collect();
    (0..=used.len()).find(|i| !used.contains(i)).unwrap_or(used.len())
}

/// A broken structural invariant, reported by [`check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    TileCount(usize),
    DuplicateSlot {
        position: TilePosition,
        seat: Seat,
        index: usize,
        tiles: Vec<TileIndex>,
    },
}

/// Check the deck size and slot uniqueness outside the wall.
///
/// Diagnostic only; handlers stay total and never consult it.
pub fn check_invariants<'a, I>(placements: I) -> Vec<InvariantViolation>
where
    I: IntoIterator<Item = &'a TilePlacement>,
{
    let mut slots: BTreeMap<(TilePosition, Seat, usize), Vec<TileIndex>> = BTreeMap::new();
    let mut count = 0usize;
    for (tile, placement) in placements.into_iter().enumerate() {
        count += 1;
        if placement.position != TilePosition::Wall {
            slots
                .entry((placement.position, placement.seat, placement.index))
                .or_default()
                .push(tile);
        }
    }

    let mut violations = Vec::new();
    if count != DECK_SIZE {
        violations.push(InvariantViolation::TileCount(count));
    }
    violations.extend(
        slots
            .into_iter()
            .filter(|(_, tiles)| tiles.len() > 1)
            .map(|((position, seat, index), tiles)| InvariantViolation::DuplicateSlot {
                position,
                seat,
                index,
                tiles,
            }),
    );
    violations
}
