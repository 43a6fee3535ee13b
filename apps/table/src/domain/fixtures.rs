//! Shared fixtures for domain unit tests.

use super::document::PlayerInfo;
use super::seats::SEATS;
use super::tiles_types::Wind;

/// Four players seated East, South, West, North in seat order.
pub fn roster() -> [PlayerInfo; SEATS] {
    let names = ["Alice", "Bob", "Carol", "Dave"];
    std::array::from_fn(|seat| PlayerInfo {
        name: names[seat].to_string(),
        id: format!("player-{seat}"),
        avatar_url: format!("https://example.invalid/avatars/{seat}.png"),
        seat_wind: Wind::ALL[seat],
        points: 25_000,
    })
}

/// Ledger entry with a tag this build does not know, as a newer writer would
/// append it.
pub fn foreign_entry() -> serde_json::Value {
    serde_json::json!({"type": "declared_riichi", "seat": 1, "tile_index": 4})
}
