//! Tile logic: dora succession and glyph rendering

use super::tiles_types::{Dragon, Tile, TileKind};

/// Glyph for a tile whose face the viewer may not see.
pub const HIDDEN_TILE_GLYPH: char = '\u{1F02B}';

/// The dora a flipped indicator points at.
///
/// Suits wrap 9 → 1, winds cycle E → S → W → N → E and dragons cycle
/// Haku → Hatsu → Chun → Haku.
pub fn dora_from_indicator(indicator: Tile) -> Tile {
    if let Some(wind) = indicator.as_wind() {
        return Tile::wind(wind.next());
    }
    if let Some(dragon) = indicator.as_dragon() {
        let next = match dragon {
            Dragon::Haku => Dragon::Hatsu,
            Dragon::Hatsu => Dragon::Chun,
            Dragon::Chun => Dragon::Haku,
        };
        return Tile::dragon(next);
    }
    let rank = indicator.rank() % 9 + 1;
    // Suited ranks stay within 1..=9, so construction cannot fail.
    Tile::new(indicator.kind(), rank).unwrap_or(indicator)
}

/// Unicode mahjong glyph, or the tile back when the value is unknown.
pub fn tile_glyph(tile: Option<Tile>) -> char {
    let Some(tile) = tile else {
        return HIDDEN_TILE_GLYPH;
    };
    let rank = u32::from(tile.rank());
    let code = match tile.kind() {
        TileKind::Man => 0x1F006 + rank,
        TileKind::Sou => 0x1F00F + rank,
        TileKind::Pin => 0x1F018 + rank,
        TileKind::Honor => match tile.as_dragon() {
            Some(Dragon::Haku) => 0x1F006,
            Some(Dragon::Hatsu) => 0x1F005,
            Some(Dragon::Chun) => 0x1F004,
            None => 0x1EFFF + rank,
        },
    };
    char::from_u32(code).unwrap_or(HIDDEN_TILE_GLYPH)
}

/// Render a row of tiles as glyphs separated by spaces, for log lines.
pub fn glyph_row<I>(tiles: I) -> String
where
    I: IntoIterator<Item = Option<Tile>>,
{
    tiles
        .into_iter()
        .map(|t| tile_glyph(t).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
