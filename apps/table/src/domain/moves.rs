//! Move handlers: the only code that mutates an authoritative document.
//!
//! Every command is first turned into the [`LogEntry`] it will record, then
//! that entry is applied. Applying an entry is deterministic given the
//! document it is applied to, which is what makes [`super::replay`] work.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::document::{AuthoritativeGameDocument, SeenBy, TilePlacement, TilePosition};
use super::ledger::LogEntry;
use super::random::RandomSource;
use super::seats::{require_seat, Seat};
use super::seed_derivation::derive_dice_seed;
use super::wall::{top_of_stack, TileIndex};
use crate::errors::domain::{ArgumentKind, DomainError};

/// Calls a seat can announce. Only recorded as intent; call resolution is not
/// modelled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Chi,
    Pon,
    Kan,
    Riichi,
    Ron,
    Tsumo,
}

/// Everything a seat can ask the table to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "move", rename_all = "snake_case")]
pub enum Command {
    RollDice,
    SplitWall {
        tile: TileIndex,
    },
    MoveTile {
        tile: TileIndex,
        placement: TilePlacement,
    },
    TakeTile {
        tile: TileIndex,
    },
    FlipTile {
        tile: TileIndex,
    },
    Discard {
        tile: TileIndex,
    },
    MoveToMeld {
        tile: TileIndex,
    },
    MakeCall {
        call: CallType,
    },
    WarnPlayer {
        seat: Seat,
    },
    ReturnTileToWall {
        tile: TileIndex,
    },
    ReturnTileToPlayersDiscards {
        tile: TileIndex,
        seat: Seat,
    },
}

impl Command {
    /// Name used in log lines and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Command::RollDice => "roll_dice",
            Command::SplitWall { .. } => "split_wall",
            Command::MoveTile { .. } => "move_tile",
            Command::TakeTile { .. } => "take_tile",
            Command::FlipTile { .. } => "flip_tile",
            Command::Discard { .. } => "discard",
            Command::MoveToMeld { .. } => "move_to_meld",
            Command::MakeCall { .. } => "make_call",
            Command::WarnPlayer { .. } => "warn_player",
            Command::ReturnTileToWall { .. } => "return_tile_to_wall",
            Command::ReturnTileToPlayersDiscards { .. } => "return_tile_to_players_discards",
        }
    }

    /// Tile the command names, if any.
    pub fn tile(&self) -> Option<TileIndex> {
        match self {
            Command::SplitWall { tile }
            | Command::MoveTile { tile, .. }
            | Command::TakeTile { tile }
            | Command::FlipTile { tile }
            | Command::Discard { tile }
            | Command::MoveToMeld { tile }
            | Command::ReturnTileToWall { tile }
            | Command::ReturnTileToPlayersDiscards { tile, .. } => Some(*tile),
            Command::RollDice | Command::MakeCall { .. } | Command::WarnPlayer { .. } => None,
        }
    }
}

/// Run `command` for `seat` against `doc`, appending exactly one ledger entry
/// on success. On error the document is left untouched.
pub fn apply(
    doc: &mut AuthoritativeGameDocument,
    seat: Seat,
    command: &Command,
) -> Result<LogEntry, DomainError> {
    let entry = entry_for(doc, seat, command)?;
    apply_entry(doc, &entry)?;
    trace!(seat, command = command.name(), ledger_len = doc.ledger.len(), "Applied move");
    Ok(entry)
}

/// The ledger entry `command` would record. Dice values are drawn here.
pub fn entry_for(
    doc: &AuthoritativeGameDocument,
    seat: Seat,
    command: &Command,
) -> Result<LogEntry, DomainError> {
    require_seat(seat)?;
    if let Some(tile) = command.tile() {
        doc.tile(tile)?;
    }

    let entry = match *command {
        Command::RollDice => LogEntry::DiceRolled {
            seat,
            values: roll_dice(doc.seed, doc.ledger.len())?,
        },
        Command::SplitWall { tile } => LogEntry::WallSplit {
            seat,
            after_tile: top_of_stack(tile),
        },
        Command::MoveTile { tile, placement } => {
            require_seat(placement.seat)?;
            LogEntry::MovedTile {
                seat,
                tile_index: tile,
                placement,
            }
        }
        Command::TakeTile { tile } => LogEntry::TookTile {
            seat,
            tile_index: tile,
        },
        Command::FlipTile { tile } => LogEntry::FlippedTile {
            seat,
            tile_index: tile,
        },
        Command::Discard { tile } => LogEntry::DiscardedTile {
            seat,
            tile_index: tile,
        },
        Command::MoveToMeld { tile } => LogEntry::MeldedTile {
            seat,
            tile_index: tile,
        },
        Command::MakeCall { .. } => return Err(DomainError::NotImplemented("make_call")),
        Command::WarnPlayer { .. } => return Err(DomainError::NotImplemented("warn_player")),
        Command::ReturnTileToWall { .. } => {
            return Err(DomainError::NotImplemented("return_tile_to_wall"))
        }
        Command::ReturnTileToPlayersDiscards { .. } => {
            return Err(DomainError::NotImplemented("return_tile_to_players_discards"))
        }
    };
    Ok(entry)
}

/// Two dice from the generator derived for this ledger position.
fn roll_dice(game_seed: u32, ledger_position: usize) -> Result<[u8; 2], DomainError> {
    let mut rng = RandomSource::new(derive_dice_seed(game_seed, ledger_position));
    let first = rng.next(6)? as u8 + 1;
    let second = rng.next(6)? as u8 + 1;
    Ok([first, second])
}

/// Apply a recorded entry to the tiles and append it to the ledger.
///
/// Validation happens before any mutation, so a failed entry leaves the
/// document as it was.
pub fn apply_entry(doc: &mut AuthoritativeGameDocument, entry: &LogEntry) -> Result<(), DomainError> {
    if let Some(seat) = entry.seat() {
        require_seat(seat)?;
    }
    if let Some(tile) = entry.tile_index() {
        doc.tile(tile)?;
    }

    match *entry {
        LogEntry::DiceRolled { values, .. } => {
            if let Some(bad) = values.iter().find(|v| !(1..=6).contains(*v)) {
                return Err(DomainError::invalid(
                    ArgumentKind::DiceValue,
                    format!("die showing {bad} is outside 1..=6"),
                ));
            }
        }
        LogEntry::WallSplit { .. } | LogEntry::Unknown(_) => {}
        LogEntry::MovedTile {
            tile_index,
            placement,
            ..
        } => {
            require_seat(placement.seat)?;
            doc.tile_mut(tile_index)?.placement = placement;
        }
        LogEntry::TookTile { seat, tile_index } => {
            let index = doc.next_free_index(TilePosition::Hand, seat);
            let record = doc.tile_mut(tile_index)?;
            record.placement = TilePlacement::new(TilePosition::Hand, seat, index);
            record.seen_by = record.seen_by.with(seat);
        }
        LogEntry::FlippedTile { tile_index, .. } => {
            let record = doc.tile_mut(tile_index)?;
            record.placement.flipped = true;
            record.seen_by = SeenBy::all();
        }
        LogEntry::DiscardedTile { seat, tile_index } => {
            let index = doc.next_free_index(TilePosition::Discards, seat);
            let record = doc.tile_mut(tile_index)?;
            record.placement = TilePlacement::new(TilePosition::Discards, seat, index);
            record.seen_by = SeenBy::all();
        }
        LogEntry::MeldedTile { seat, tile_index } => {
            let index = doc.next_free_index(TilePosition::Melds, seat);
            let record = doc.tile_mut(tile_index)?;
            let from_discards = record.placement.position == TilePosition::Discards;
            record.placement = TilePlacement {
                rotated: from_discards,
                ..TilePlacement::new(TilePosition::Melds, seat, index)
            };
            record.seen_by = SeenBy::all();
        }
    }

    doc.ledger.push(entry.clone());
    Ok(())
}
