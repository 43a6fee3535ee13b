//! Rebuild a document from its roster, seed, and ledger.

use super::document::{create_authoritative, AuthoritativeGameDocument, PlayerInfo};
use super::ledger::LogEntry;
use super::moves::apply_entry;
use super::seats::SEATS;
use crate::errors::domain::DomainError;

/// Replay `ledger` over the freshly shuffled deck for `seed`.
///
/// For a document built only through move handlers the result equals the
/// document, tile for tile.
pub fn replay(
    players: [PlayerInfo; SEATS],
    seed: u32,
    ledger: &[LogEntry],
) -> Result<AuthoritativeGameDocument, DomainError> {
    let mut doc = create_authoritative(players, Some(seed))?;
    for entry in ledger {
        apply_entry(&mut doc, entry)?;
    }
    Ok(doc)
}

/// Whether `doc` is exactly what its own ledger produces.
pub fn is_consistent(doc: &AuthoritativeGameDocument) -> Result<bool, DomainError> {
    let rebuilt = replay(doc.players.clone(), doc.seed, &doc.ledger)?;
    Ok(rebuilt.tiles == doc.tiles && rebuilt.deck_integrity == doc.deck_integrity)
}
