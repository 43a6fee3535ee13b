//! Domain-level error type used by the pure game layer.
//!
//! This error type is store- and transport-agnostic. Stores wrap it in
//! [`crate::errors::StoreError::Domain`] when a move handler fails inside an
//! update.

use thiserror::Error;

/// Which input an [`DomainError::InvalidArgument`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgumentKind {
    RandomLimit,
    TileIndex,
    TileSymbol,
    Roster,
    Seat,
    DiceTotal,
    DiceValue,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed input to a pure function; always a caller bug.
    #[error("invalid argument {kind:?}: {detail}")]
    InvalidArgument { kind: ArgumentKind, detail: String },

    /// A move whose semantics have not been built yet. Not recoverable by retrying.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl DomainError {
    pub fn invalid(kind: ArgumentKind, detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            kind,
            detail: detail.into(),
        }
    }

    pub fn tile_index(index: usize) -> Self {
        Self::invalid(
            ArgumentKind::TileIndex,
            format!("tile index {index} is outside the deck"),
        )
    }
}
