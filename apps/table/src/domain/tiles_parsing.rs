//! Tile parsing from and formatting to compact symbols (e.g., "5m", "7z")

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::tiles_types::{Tile, TileKind};
use crate::errors::domain::{ArgumentKind, DomainError};

impl TileKind {
    pub const fn symbol(self) -> char {
        match self {
            TileKind::Man => 'm',
            TileKind::Pin => 'p',
            TileKind::Sou => 's',
            TileKind::Honor => 'z',
        }
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.rank(), self.kind().symbol())
    }
}

impl FromStr for Tile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || DomainError::invalid(ArgumentKind::TileSymbol, format!("Parse tile: {s}"));

        let mut chars = s.chars();
        let rank_ch = chars.next().ok_or_else(parse_err)?;
        let kind_ch = chars.next().ok_or_else(parse_err)?;
        if chars.next().is_some() {
            return Err(parse_err());
        }

        let rank = rank_ch.to_digit(10).ok_or_else(parse_err)? as u8;
        let kind = match kind_ch {
            'm' => TileKind::Man,
            'p' => TileKind::Pin,
            's' => TileKind::Sou,
            'z' => TileKind::Honor,
            _ => return Err(parse_err()),
        };
        Tile::new(kind, rank).map_err(|_| parse_err())
    }
}
