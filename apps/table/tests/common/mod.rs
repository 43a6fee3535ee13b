#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;

use mahjong_table::{open_table, DocumentStore, PlayerInfo, TableSession, Wind};
use table_test_support::unique_helpers::unique_player_ids;

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    table_test_support::logging::init();
}

/// Four players seated East, South, West, North, with ids unique per call.
pub fn roster(prefix: &str) -> [PlayerInfo; 4] {
    let names = ["Alice", "Bob", "Carol", "Dave"];
    let ids = unique_player_ids(prefix);
    std::array::from_fn(|seat| PlayerInfo {
        name: names[seat].to_string(),
        id: ids[seat].clone(),
        avatar_url: String::new(),
        seat_wind: Wind::ALL[seat],
        points: 25_000,
    })
}

/// Open a table on `store` and join every seat, in seat order.
pub async fn seated_table(
    store: Arc<dyn DocumentStore>,
    players: [PlayerInfo; 4],
    seed: u32,
    training_wheels: bool,
) -> Vec<TableSession> {
    let game_id = open_table(store.as_ref(), players.clone(), Some(seed))
        .await
        .expect("open table");
    let mut sessions = Vec::new();
    for player in &players {
        sessions.push(
            TableSession::join(Arc::clone(&store), game_id.clone(), player.id.clone(), training_wheels)
                .await
                .expect("join table"),
        );
    }
    sessions
}
