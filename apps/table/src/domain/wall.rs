//! Wall geometry.
//!
//! The deck is laid out as four walls of 17 stacks. Deck position `i` sits in
//! wall `i / 34`, slot `i % 34`; slots pair up into stacks `(2k, 2k + 1)` with
//! the odd slot on top. All arithmetic wraps modulo the deck size.

use super::deck::DECK_SIZE;
use super::document::{seat_with_wind, PlayerInfo};
use super::seats::{Seat, SEATS};
use super::tiles_types::Wind;
use crate::errors::domain::{ArgumentKind, DomainError};

/// Position of a physical tile in the authoritative tile list.
pub type TileIndex = usize;

/// Tiles in front of each seat.
pub const WALL_SIZE: usize = DECK_SIZE / SEATS;

/// Tiles set aside at the second split (seven stacks).
pub const DEAD_WALL_SIZE: usize = 14;

/// Tiles that can be drawn before the wall is exhausted.
pub const LIVE_WALL_SIZE: usize = DECK_SIZE - DEAD_WALL_SIZE;

/// Seat whose wall holds deck position `tile` before any move.
pub fn wall_seat(tile: TileIndex) -> Seat {
    ((tile / WALL_SIZE) % SEATS) as Seat
}

/// Slot within that wall.
pub fn wall_slot(tile: TileIndex) -> usize {
    tile % WALL_SIZE
}

/// Upper tile of the stack holding `tile`.
pub const fn top_of_stack(tile: TileIndex) -> TileIndex {
    tile | 1
}

/// Step `delta` tiles backwards around the wall.
pub const fn wrap_back(tile: TileIndex, delta: usize) -> TileIndex {
    (tile % DECK_SIZE + DECK_SIZE - delta % DECK_SIZE) % DECK_SIZE
}

/// Side of the table the dice point at, counting counter-clockwise from East.
pub fn dice_wind(total: u8) -> Wind {
    Wind::from_offset(usize::from(total).saturating_sub(1))
}

/// Where the wall breaks for a given roll.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WallGeometry {
    pub dice_total: u8,
    pub dice_wind: Wind,
    /// Seat that splits the wall and flips the first dora indicator.
    pub splitting_seat: Seat,
    /// Top tile of the first live stack.
    pub start_of_wall: TileIndex,
}

impl WallGeometry {
    pub fn new(players: &[PlayerInfo; SEATS], dice_total: u8) -> Result<Self, DomainError> {
        if !(2..=12).contains(&dice_total) {
            return Err(DomainError::invalid(
                ArgumentKind::DiceTotal,
                format!("dice total {dice_total} cannot come from two dice"),
            ));
        }
        let wind = dice_wind(dice_total);
        let splitting_seat = seat_with_wind(players, wind).ok_or_else(|| {
            DomainError::invalid(ArgumentKind::Roster, format!("no seat holds {wind:?}"))
        })?;
        let break_point = usize::from(splitting_seat) * WALL_SIZE + 2 * usize::from(dice_total);
        Ok(Self {
            dice_total,
            dice_wind: wind,
            splitting_seat,
            start_of_wall: (break_point + 1) % DECK_SIZE,
        })
    }

    /// Tile the first split must be made after.
    pub fn first_split(&self) -> TileIndex {
        wrap_back(self.start_of_wall, 2)
    }

    /// Tile the dead wall split must be made after, given the first split.
    pub fn dead_wall_split(first_split_after: TileIndex) -> TileIndex {
        wrap_back(first_split_after, DEAD_WALL_SIZE)
    }

    /// Tile flipped as the first dora indicator: top of the third dead-wall stack.
    pub fn dora_indicator(&self) -> TileIndex {
        wrap_back(self.start_of_wall, 6)
    }

    /// Live tiles in drawing order: top then bottom of each stack, moving away
    /// from the break.
    pub fn live_drawing_order(&self) -> impl Iterator<Item = TileIndex> {
        let first = self.start_of_wall ^ 1;
        (0..LIVE_WALL_SIZE).map(move |k| ((first + k) % DECK_SIZE) ^ 1)
    }

    /// First live tile still in the wall, or `None` once the live wall is drawn.
    pub fn next_drawable<F>(&self, still_in_wall: F) -> Option<TileIndex>
    where
        F: Fn(TileIndex) -> bool,
    {
        self.live_drawing_order().find(|&tile| still_in_wall(tile))
    }
}
