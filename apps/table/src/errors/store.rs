//! Errors surfaced across the document store boundary.

use std::error::Error as StdError;

use thiserror::Error;

use crate::errors::domain::DomainError;

/// Store-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Player,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unknown game or player. Remote stores mark this retryable because a
    /// missing document may only be a replication or partition artefact.
    #[error("not found {kind:?}: {detail}")]
    NotFound {
        kind: NotFoundKind,
        detail: String,
        retryable: bool,
    },

    /// Backing store could not be reached or answered with an operational failure.
    #[error("store unavailable: {detail}")]
    Unavailable {
        detail: String,
        transient: bool,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Optimistic update lost the revision race too many times.
    #[error("revision conflict on game {game_id} after {attempts} attempts")]
    Conflict { game_id: String, attempts: u32 },

    /// The move handler itself failed; the stored document is unchanged.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Persisted snapshot could not be encoded or decoded.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl StoreError {
    pub fn game_not_found(game_id: impl std::fmt::Display, retryable: bool) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Game,
            detail: format!("No game with the id '{game_id}'"),
            retryable,
        }
    }

    pub fn player_not_found(player_id: &str) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Player,
            detail: format!("No player with the id '{player_id}' in this game"),
            retryable: false,
        }
    }

    pub fn unavailable(
        detail: impl Into<String>,
        transient: bool,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Unavailable {
            detail: detail.into(),
            transient,
            source: Some(Box::new(source)),
        }
    }

    /// Whether the caller may resubmit the same command and expect progress.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::NotFound { retryable, .. } => *retryable,
            StoreError::Unavailable { transient, .. } => *transient,
            StoreError::Conflict { .. } => true,
            StoreError::Domain(_) | StoreError::Snapshot(_) => false,
        }
    }
}
