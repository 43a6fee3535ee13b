//! Advisory legality checks ("training wheels").
//!
//! Validators read only what the acting seat can see, a
//! [`ProjectedGameDocument`], and never mutate. A rejection is a value the
//! session reports back to the seat; it is not a fault.

use thiserror::Error;

use super::deck::DECK_SIZE;
use super::document::TilePosition;
use super::ledger::{dice_total, dice_values, wall_splits};
use super::moves::Command;
use super::player_view::ProjectedGameDocument;
use super::seats::{Seat, SEATS};
use super::tiles_types::Wind;
use super::wall::{TileIndex, WallGeometry};
use crate::errors::domain::{ArgumentKind, DomainError};

/// Tiles a seat holds when it is its turn to discard.
pub const TILES_BEFORE_DISCARD: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("Dice have already been rolled")]
    DiceAlreadyRolled,
    #[error("East should roll the dice")]
    OnlyEastRolls,
    #[error("Dice have not been rolled yet")]
    DiceNotRolled,
    #[error("Wall is already split")]
    WallAlreadySplit,
    #[error("{name} should be splitting the wall")]
    WrongSplitter { name: String },
    #[error("Not the correct place to split the wall. Count the number shown on the dice from the right side of your wall ({expected})")]
    WrongSplitPosition { expected: TileIndex },
    #[error("Not the correct place to split the wall. The dead wall should contain 14 tiles ({expected})")]
    WrongDeadWallSplit { expected: TileIndex },
    #[error("Please wait until the dice have been rolled and the wall has been split before taking tiles")]
    WallNotSplit,
    #[error("Wrong tile to take: {expected}")]
    WrongTileToTake { expected: TileIndex },
    #[error("The live wall is exhausted")]
    WallExhausted,
    #[error("{name} should be flipping the dora")]
    WrongFlipper { name: String },
    #[error("Wrong tile to flip")]
    WrongTileToFlip,
    #[error("Cannot discard a tile you don't have")]
    NotInHand,
    #[error("Not your turn to discard: you hold {held} tiles")]
    NotYourTurnToDiscard { held: usize },
    #[error("Cannot meld with training wheels on")]
    MeldingDisabled,
    #[error("Tiles can only be rearranged within your own hand and palm")]
    IllegalRearrangement,
    #[error("That slot is already taken")]
    SlotTaken,
    #[error("No tile with index {0}")]
    UnknownTile(TileIndex),
    #[error("No seat {0} at this table")]
    UnknownSeat(Seat),
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
    #[error(transparent)]
    Malformed(#[from] DomainError),
}

/// Check `command` for `seat` against what that seat can see.
pub fn validate(
    game: &ProjectedGameDocument,
    seat: Seat,
    command: &Command,
) -> Result<(), IllegalMove> {
    if usize::from(seat) >= SEATS {
        return Err(IllegalMove::UnknownSeat(seat));
    }
    if let Some(tile) = command.tile() {
        if tile >= game.tiles.len() {
            return Err(IllegalMove::UnknownTile(tile));
        }
    }

    match *command {
        Command::RollDice => validate_roll(game, seat),
        Command::SplitWall { tile } => validate_split(game, seat, tile),
        Command::TakeTile { tile } => validate_take(game, tile),
        Command::FlipTile { tile } => validate_flip(game, seat, tile),
        Command::Discard { tile } => validate_discard(game, seat, tile),
        Command::MoveTile { tile, placement } => {
            validate_rearrangement(game, seat, tile, placement.position, placement.seat, placement.index)
        }
        Command::MoveToMeld { .. } => Err(IllegalMove::MeldingDisabled),
        Command::MakeCall { .. }
        | Command::WarnPlayer { .. }
        | Command::ReturnTileToWall { .. }
        | Command::ReturnTileToPlayersDiscards { .. } => {
            Err(IllegalMove::NotImplemented(command.name()))
        }
    }
}

fn validate_roll(game: &ProjectedGameDocument, seat: Seat) -> Result<(), IllegalMove> {
    if dice_values(&game.ledger).is_some() {
        return Err(IllegalMove::DiceAlreadyRolled);
    }
    if game.players[usize::from(seat)].seat_wind != Wind::East {
        return Err(IllegalMove::OnlyEastRolls);
    }
    Ok(())
}

fn geometry(game: &ProjectedGameDocument) -> Result<WallGeometry, IllegalMove> {
    let [a, b] = dice_values(&game.ledger).ok_or(IllegalMove::DiceNotRolled)?;
    let total = dice_total(&game.ledger).ok_or_else(|| {
        DomainError::invalid(ArgumentKind::DiceTotal, format!("dice {a} and {b} overflow"))
    })?;
    Ok(WallGeometry::new(&game.players, total)?)
}

fn splitter_name(game: &ProjectedGameDocument, geometry: &WallGeometry) -> String {
    game.players[usize::from(geometry.splitting_seat)].name.clone()
}

fn validate_split(
    game: &ProjectedGameDocument,
    seat: Seat,
    tile: TileIndex,
) -> Result<(), IllegalMove> {
    let geometry = geometry(game)?;
    let splits = wall_splits(&game.ledger);
    if splits.len() >= 2 {
        return Err(IllegalMove::WallAlreadySplit);
    }
    if seat != geometry.splitting_seat {
        return Err(IllegalMove::WrongSplitter {
            name: splitter_name(game, &geometry),
        });
    }

    match splits.first() {
        None => {
            let expected = geometry.first_split();
            if tile != expected {
                return Err(IllegalMove::WrongSplitPosition { expected });
            }
        }
        Some(&first) => {
            let expected = WallGeometry::dead_wall_split(first);
            if tile != expected {
                return Err(IllegalMove::WrongDeadWallSplit { expected });
            }
        }
    }
    Ok(())
}

/// The tile the next draw must take, once the wall is split.
pub fn next_drawable(game: &ProjectedGameDocument) -> Result<TileIndex, IllegalMove> {
    if dice_values(&game.ledger).is_none() || wall_splits(&game.ledger).len() < 2 {
        return Err(IllegalMove::WallNotSplit);
    }
    geometry(game)?
        .next_drawable(|t| {
            game.tile(t)
                .is_some_and(|record| record.placement.position == TilePosition::Wall)
        })
        .ok_or(IllegalMove::WallExhausted)
}

fn validate_take(game: &ProjectedGameDocument, tile: TileIndex) -> Result<(), IllegalMove> {
    let expected = next_drawable(game)?;
    if tile != expected {
        return Err(IllegalMove::WrongTileToTake { expected });
    }
    Ok(())
}

fn validate_flip(
    game: &ProjectedGameDocument,
    seat: Seat,
    tile: TileIndex,
) -> Result<(), IllegalMove> {
    let geometry = geometry(game)?;
    if seat != geometry.splitting_seat {
        return Err(IllegalMove::WrongFlipper {
            name: splitter_name(game, &geometry),
        });
    }
    if tile != geometry.dora_indicator() {
        return Err(IllegalMove::WrongTileToFlip);
    }
    Ok(())
}

/// Tiles `seat` holds across hand, palm, and melds.
pub fn tiles_held(game: &ProjectedGameDocument, seat: Seat) -> usize {
    game.tiles
        .iter()
        .filter(|t| {
            t.placement.seat == seat
                && matches!(
                    t.placement.position,
                    TilePosition::Hand | TilePosition::Palm | TilePosition::Melds
                )
        })
        .count()
}

fn validate_discard(
    game: &ProjectedGameDocument,
    seat: Seat,
    tile: TileIndex,
) -> Result<(), IllegalMove> {
    let placement = game.tiles[tile].placement;
    if placement.position != TilePosition::Hand || placement.seat != seat {
        return Err(IllegalMove::NotInHand);
    }
    let held = tiles_held(game, seat);
    if held != TILES_BEFORE_DISCARD {
        return Err(IllegalMove::NotYourTurnToDiscard { held });
    }
    Ok(())
}

fn is_private_area(position: TilePosition) -> bool {
    matches!(position, TilePosition::Hand | TilePosition::Palm)
}

fn validate_rearrangement(
    game: &ProjectedGameDocument,
    seat: Seat,
    tile: TileIndex,
    position: TilePosition,
    target_seat: Seat,
    index: usize,
) -> Result<(), IllegalMove> {
    let source = game.tiles[tile].placement;
    if source.seat != seat || !is_private_area(source.position) {
        return Err(IllegalMove::IllegalRearrangement);
    }
    if target_seat != seat || !is_private_area(position) || index >= DECK_SIZE {
        return Err(IllegalMove::IllegalRearrangement);
    }
    let occupied = game.tiles.iter().enumerate().any(|(i, record)| {
        i != tile
            && record.placement.position == position
            && record.placement.seat == seat
            && record.placement.index == index
    });
    if occupied {
        return Err(IllegalMove::SlotTaken);
    }
    Ok(())
}
