//! Append-only event ledger.
//!
//! A ledger entry's position is its identity: entries are never edited or
//! removed, and replaying them in order from the seeded deck reproduces the
//! document.
//!
//! Entries whose tag this build does not know are kept as raw JSON and
//! written back unchanged, so a document saved by an older writer keeps every
//! entry a newer one appended.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::TilePlacement;
use super::seats::Seat;
use super::wall::TileIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    DiceRolled {
        seat: Seat,
        values: [u8; 2],
    },
    WallSplit {
        seat: Seat,
        after_tile: TileIndex,
    },
    TookTile {
        seat: Seat,
        tile_index: TileIndex,
    },
    MovedTile {
        seat: Seat,
        tile_index: TileIndex,
        placement: TilePlacement,
    },
    FlippedTile {
        seat: Seat,
        tile_index: TileIndex,
    },
    DiscardedTile {
        seat: Seat,
        tile_index: TileIndex,
    },
    MeldedTile {
        seat: Seat,
        tile_index: TileIndex,
    },
    /// Entry written by a newer producer, verbatim. Replay skips it.
    #[serde(untagged)]
    Unknown(Value),
}

impl LogEntry {
    /// Acting seat, when the entry type is known.
    pub fn seat(&self) -> Option<Seat> {
        match self {
            LogEntry::DiceRolled { seat, .. }
            | LogEntry::WallSplit { seat, .. }
            | LogEntry::TookTile { seat, .. }
            | LogEntry::MovedTile { seat, .. }
            | LogEntry::FlippedTile { seat, .. }
            | LogEntry::DiscardedTile { seat, .. }
            | LogEntry::MeldedTile { seat, .. } => Some(*seat),
            LogEntry::Unknown(_) => None,
        }
    }

    /// Tile the entry moved or revealed, if any.
    pub fn tile_index(&self) -> Option<TileIndex> {
        match self {
            LogEntry::TookTile { tile_index, .. }
            | LogEntry::MovedTile { tile_index, .. }
            | LogEntry::FlippedTile { tile_index, .. }
            | LogEntry::DiscardedTile { tile_index, .. }
            | LogEntry::MeldedTile { tile_index, .. } => Some(*tile_index),
            LogEntry::DiceRolled { .. } | LogEntry::WallSplit { .. } | LogEntry::Unknown(_) => None,
        }
    }
}

/// Values of the first dice roll, if one has been logged.
pub fn dice_values(ledger: &[LogEntry]) -> Option<[u8; 2]> {
    ledger.iter().find_map(|entry| match entry {
        LogEntry::DiceRolled { values, .. } => Some(*values),
        _ => None,
    })
}

/// Sum of the first dice roll, if one has been logged and the sum fits.
pub fn dice_total(ledger: &[LogEntry]) -> Option<u8> {
    dice_values(ledger).and_then(|[a, b]| a.checked_add(b))
}

/// `after_tile` of every logged wall split, in ledger order.
pub fn wall_splits(ledger: &[LogEntry]) -> Vec<TileIndex> {
    ledger
        .iter()
        .filter_map(|entry| match entry {
            LogEntry::WallSplit { after_tile, .. } => Some(*after_tile),
            _ => None,
        })
        .collect()
}
