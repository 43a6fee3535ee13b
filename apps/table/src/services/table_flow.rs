//! Seat-facing move surface.
//!
//! A [`TableSession`] binds one player to one seat of one game. Every move
//! goes through the store's `update`; with training wheels on, the seat's
//! current projection is validated first and a rejection comes back as a
//! [`MoveOutcome::Rejected`] value instead of an error.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::domain::document::{create_authoritative, PlayerInfo, TilePlacement};
use crate::domain::moves::{apply, CallType, Command};
use crate::domain::player_view::ProjectedGameDocument;
use crate::domain::seats::{Seat, SEATS};
use crate::domain::validators::{validate, IllegalMove};
use crate::domain::wall::TileIndex;
use crate::errors::StoreError;
use crate::store::{DocumentStore, GameId, ProjectionStream, Revision};

/// Result of submitting a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(Revision),
    Rejected(IllegalMove),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }

    pub fn revision(&self) -> Option<Revision> {
        match self {
            MoveOutcome::Applied(revision) => Some(*revision),
            MoveOutcome::Rejected(_) => None,
        }
    }
}

/// Create a game for `players` and store it. `None` draws a seed from OS entropy.
pub async fn open_table(
    store: &dyn DocumentStore,
    players: [PlayerInfo; SEATS],
    seed: Option<u32>,
) -> Result<GameId, StoreError> {
    let doc = create_authoritative(players, seed)?;
    let deck_integrity = doc.deck_integrity.clone();
    let game_id = store.create(doc).await?;
    info!(game_id = %game_id, deck_integrity = %deck_integrity, "Opened table");
    Ok(game_id)
}

#[derive(Clone)]
pub struct TableSession {
    store: Arc<dyn DocumentStore>,
    game_id: GameId,
    player_id: String,
    seat: Seat,
    training_wheels: bool,
}

impl TableSession {
    /// Join `game_id` as `player_id`, resolving the seat from the roster.
    pub async fn join(
        store: Arc<dyn DocumentStore>,
        game_id: GameId,
        player_id: impl Into<String>,
        training_wheels: bool,
    ) -> Result<Self, StoreError> {
        let player_id = player_id.into();
        let players = store.roster(&game_id).await?;
        let seat = crate::domain::document::seat_of(&players, &player_id)
            .ok_or_else(|| StoreError::player_not_found(&player_id))?;
        debug!(game_id = %game_id, player_id = %player_id, seat, training_wheels, "Joined table");
        Ok(Self {
            store,
            game_id,
            player_id,
            seat,
            training_wheels,
        })
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Live projections for this seat.
    pub async fn projections(&self) -> Result<ProjectionStream, StoreError> {
        self.store.projection_stream(&self.game_id, self.seat).await
    }

    /// The seat's view as of now.
    pub async fn current_view(&self) -> Result<ProjectedGameDocument, StoreError> {
        self.projections()
            .await?
            .next()
            .await
            .ok_or_else(|| StoreError::game_not_found(&self.game_id, true))
    }

    /// Validate (when enabled) and apply `command`.
    pub async fn submit(&self, command: Command) -> Result<MoveOutcome, StoreError> {
        if self.training_wheels {
            let view = self.current_view().await?;
            if let Err(reason) = validate(&view, self.seat, &command) {
                warn!(
                    game_id = %self.game_id,
                    seat = self.seat,
                    command = command.name(),
                    reason = %reason,
                    "Rejected move"
                );
                return Ok(MoveOutcome::Rejected(reason));
            }
        }

        let seat = self.seat;
        let revision = self
            .store
            .update(&self.game_id, &|doc| apply(doc, seat, &command).map(|_| ()))
            .await?;
        debug!(
            game_id = %self.game_id,
            seat,
            command = command.name(),
            revision,
            "Applied move"
        );
        Ok(MoveOutcome::Applied(revision))
    }

    pub async fn roll_dice(&self) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::RollDice).await
    }

    pub async fn split_wall(&self, tile: TileIndex) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::SplitWall { tile }).await
    }

    pub async fn move_tile(
        &self,
        tile: TileIndex,
        placement: TilePlacement,
    ) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::MoveTile { tile, placement }).await
    }

    pub async fn take_tile(&self, tile: TileIndex) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::TakeTile { tile }).await
    }

    pub async fn flip_tile(&self, tile: TileIndex) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::FlipTile { tile }).await
    }

    pub async fn discard(&self, tile: TileIndex) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::Discard { tile }).await
    }

    pub async fn move_to_meld(&self, tile: TileIndex) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::MoveToMeld { tile }).await
    }

    pub async fn make_call(&self, call: CallType) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::MakeCall { call }).await
    }

    pub async fn warn_player(&self, seat: Seat) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::WarnPlayer { seat }).await
    }

    pub async fn return_tile_to_wall(&self, tile: TileIndex) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::ReturnTileToWall { tile }).await
    }

    pub async fn return_tile_to_players_discards(
        &self,
        tile: TileIndex,
        seat: Seat,
    ) -> Result<MoveOutcome, StoreError> {
        self.submit(Command::ReturnTileToPlayersDiscards { tile, seat })
            .await
    }
}
