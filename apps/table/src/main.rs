use std::sync::Arc;

use mahjong_table::domain::ledger::dice_total;
use mahjong_table::domain::tiles_logic::glyph_row;
use mahjong_table::domain::validators::next_drawable;
use mahjong_table::domain::{Seat, TilePosition, WallGeometry, SEATS};
use mahjong_table::store::GameId;
use mahjong_table::telemetry;
use mahjong_table::{
    open_table, DocumentStore, InMemoryDocumentStore, MoveOutcome, PlayerInfo, RedisBackend,
    RemoteDocumentStore, StoreError, StoreKind, TableConfig, TableSession, Wind,
};
use tracing::{error, info, warn};
use ulid::Ulid;

/// Tiles each seat holds after the deal; the dealer takes one more.
const HAND_SIZE: usize = 13;

#[tokio::main]
async fn main() {
    let config = match TableConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_tracing() {
        eprintln!("❌ Failed to install tracing subscriber: {e}");
        std::process::exit(1);
    }

    let store = match build_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to build document store");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_demo(store, &config).await {
        error!(error = %e, retryable = e.is_retryable(), "Demo table failed");
        std::process::exit(1);
    }
}

async fn build_store(config: &TableConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match &config.store {
        StoreKind::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        StoreKind::Redis { url } => {
            let backend = RedisBackend::connect(url).await?;
            Ok(Arc::new(RemoteDocumentStore::with_retry(
                backend,
                config.retry_policy(),
            )))
        }
    }
}

fn demo_players() -> [PlayerInfo; SEATS] {
    let names = ["Aki", "Boris", "Chiyo", "Dario"];
    let run = Ulid::new();
    std::array::from_fn(|seat| PlayerInfo {
        name: names[seat].to_string(),
        id: format!("demo-{run}-{seat}"),
        avatar_url: String::new(),
        seat_wind: Wind::ALL[seat],
        points: 25_000,
    })
}

/// Roll, split, flip the dora, deal, and let the dealer discard once.
async fn run_demo(store: Arc<dyn DocumentStore>, config: &TableConfig) -> Result<(), StoreError> {
    let players = demo_players();
    let game_id = open_table(store.as_ref(), players.clone(), config.seed).await?;

    let mut sessions = Vec::with_capacity(SEATS);
    for player in &players {
        sessions.push(
            TableSession::join(
                Arc::clone(&store),
                game_id.clone(),
                player.id.clone(),
                config.training_wheels,
            )
            .await?,
        );
    }
    let by_wind = |wind: Wind| -> Seat {
        players
            .iter()
            .position(|p| p.seat_wind == wind)
            .unwrap_or(0) as Seat
    };
    let dealer = &sessions[usize::from(by_wind(Wind::East))];

    if !accepted(&game_id, dealer.roll_dice().await?) {
        return Ok(());
    }
    let view = dealer.current_view().await?;
    let Some(total) = dice_total(&view.ledger) else {
        return Ok(());
    };
    let geometry = WallGeometry::new(&view.players, total)?;
    info!(game_id = %game_id, dice_total = total, splitter = geometry.splitting_seat, "Dice rolled");

    let splitter = &sessions[usize::from(geometry.splitting_seat)];
    let first = geometry.first_split();
    if !accepted(&game_id, splitter.split_wall(first).await?)
        || !accepted(&game_id, splitter.split_wall(WallGeometry::dead_wall_split(first)).await?)
        || !accepted(&game_id, splitter.flip_tile(geometry.dora_indicator()).await?)
    {
        return Ok(());
    }

    // Four rounds of four, then one each, then the dealer's extra tile.
    let deal_order = [Wind::East, Wind::South, Wind::West, Wind::North];
    let mut draws: Vec<Seat> = Vec::new();
    for _ in 0..3 {
        for wind in deal_order {
            draws.extend(std::iter::repeat(by_wind(wind)).take(4));
        }
    }
    draws.extend(deal_order.iter().map(|&wind| by_wind(wind)));
    draws.push(by_wind(Wind::East));
    debug_assert_eq!(draws.len(), HAND_SIZE * SEATS + 1);

    for seat in draws {
        let session = &sessions[usize::from(seat)];
        let view = session.current_view().await?;
        let tile = match next_drawable(&view) {
            Ok(tile) => tile,
            Err(reason) => {
                warn!(game_id = %game_id, reason = %reason, "Deal stopped");
                return Ok(());
            }
        };
        if !accepted(&game_id, session.take_tile(tile).await?) {
            return Ok(());
        }
    }

    let view = dealer.current_view().await?;
    let hand: Vec<_> = view
        .tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.placement.position == TilePosition::Hand && t.placement.seat == dealer.seat())
        .collect();
    info!(
        game_id = %game_id,
        hand = %glyph_row(hand.iter().map(|(_, t)| t.tile)),
        "Dealer hand after the deal"
    );

    if let Some(&(discard, _)) = hand.last() {
        let outcome = dealer.discard(discard).await?;
        if accepted(&game_id, outcome) {
            let (revision, doc) = store.load_authoritative(&game_id).await?;
            info!(
                game_id = %game_id,
                revision,
                ledger_len = doc.ledger.len(),
                seed = doc.seed,
                "Demo hand finished"
            );
        }
    }
    Ok(())
}

fn accepted(game_id: &GameId, outcome: MoveOutcome) -> bool {
    match outcome {
        MoveOutcome::Applied(_) => true,
        MoveOutcome::Rejected(reason) => {
            warn!(game_id = %game_id, reason = %reason, "Demo move rejected");
            false
        }
    }
}
