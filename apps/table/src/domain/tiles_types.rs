//! Core tile-related types: Tile, TileKind, Wind, Dragon

use crate::errors::domain::{ArgumentKind, DomainError};

/// Physical copies of each symbol in a deck.
pub const COPIES_PER_TILE: usize = 4;

/// Distinct tile symbols (3 suits x 9 ranks + 7 honors).
pub const DISTINCT_TILES: usize = 34;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TileKind {
    Man,
    Pin,
    Sou,
    Honor,
}

impl TileKind {
    pub const ALL: [TileKind; 4] = [TileKind::Man, TileKind::Pin, TileKind::Sou, TileKind::Honor];

    /// Highest rank for the kind (9 for suits, 7 for honors).
    pub const fn max_rank(self) -> u8 {
        match self {
            TileKind::Man | TileKind::Pin | TileKind::Sou => 9,
            TileKind::Honor => 7,
        }
    }

    pub const fn is_suit(self) -> bool {
        !matches!(self, TileKind::Honor)
    }
}

/// Seat and round winds. Honor ranks 1..=4.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Wind {
    East,
    South,
    West,
    North,
}

impl Wind {
    pub const ALL: [Wind; 4] = [Wind::East, Wind::South, Wind::West, Wind::North];

    /// Wind reached by counting `steps` seats counter-clockwise from East.
    pub const fn from_offset(steps: usize) -> Wind {
        Self::ALL[steps % 4]
    }

    pub const fn next(self) -> Wind {
        match self {
            Wind::East => Wind::South,
            Wind::South => Wind::West,
            Wind::West => Wind::North,
            Wind::North => Wind::East,
        }
    }

    pub const fn honor_rank(self) -> u8 {
        match self {
            Wind::East => 1,
            Wind::South => 2,
            Wind::West => 3,
            Wind::North => 4,
        }
    }
}

/// Dragons. Honor ranks 5..=7.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Dragon {
    Haku,
    Hatsu,
    Chun,
}

impl Dragon {
    pub const fn honor_rank(self) -> u8 {
        match self {
            Dragon::Haku => 5,
            Dragon::Hatsu => 6,
            Dragon::Chun => 7,
        }
    }
}

/// A tile symbol. Fields are private so every value is a valid member of the
/// 34-symbol vocabulary.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tile {
    kind: TileKind,
    rank: u8,
}

impl Tile {
    pub fn new(kind: TileKind, rank: u8) -> Result<Tile, DomainError> {
        if rank == 0 || rank > kind.max_rank() {
            return Err(DomainError::invalid(
                ArgumentKind::TileSymbol,
                format!("Tile rank {rank} is out of range for {kind:?}"),
            ));
        }
        Ok(Tile { kind, rank })
    }

    pub const fn wind(wind: Wind) -> Tile {
        Tile {
            kind: TileKind::Honor,
            rank: wind.honor_rank(),
        }
    }

    pub const fn dragon(dragon: Dragon) -> Tile {
        Tile {
            kind: TileKind::Honor,
            rank: dragon.honor_rank(),
        }
    }

    pub const fn kind(self) -> TileKind {
        self.kind
    }

    pub const fn rank(self) -> u8 {
        self.rank
    }

    pub fn as_wind(self) -> Option<Wind> {
        match (self.kind, self.rank) {
            (TileKind::Honor, 1..=4) => Some(Wind::ALL[(self.rank - 1) as usize]),
            _ => None,
        }
    }

    pub fn as_dragon(self) -> Option<Dragon> {
        match (self.kind, self.rank) {
            (TileKind::Honor, 5) => Some(Dragon::Haku),
            (TileKind::Honor, 6) => Some(Dragon::Hatsu),
            (TileKind::Honor, 7) => Some(Dragon::Chun),
            _ => None,
        }
    }

    /// The 34 distinct symbols in canonical order: man, pin, sou, honors.
    pub fn all_symbols() -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(DISTINCT_TILES);
        for kind in TileKind::ALL {
            for rank in 1..=kind.max_rank() {
                tiles.push(Tile { kind, rank });
            }
        }
        tiles
    }
}
