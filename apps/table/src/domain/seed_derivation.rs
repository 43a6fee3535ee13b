//! RNG seed derivation utilities for deterministic game behavior.
//!
//! The game seed drives the shuffle directly. Every other random decision is
//! drawn from a generator seeded by a value derived from the game seed and the
//! ledger position, so replaying a ledger never needs hidden generator state.

/// Derive a seed for the dice roll recorded at `ledger_position`.
///
/// Creates a unique seed for each roll, ensuring:
/// - Same game + same ledger position = same dice
/// - A re-roll later in the ledger produces independent values
/// - Dice never reuse the shuffle stream
///
/// # Arguments
///
/// * `game_seed` - Base RNG seed of the game (the shuffle seed)
/// * `ledger_position` - Index the DiceRolled entry will occupy in the ledger
pub fn derive_dice_seed(game_seed: u32, ledger_position: usize) -> u32 {
    // Ledger length is bounded far below u32::MAX; truncation only matters for
    // wrapping, which stays deterministic.
    let position = ledger_position as u32;

    game_seed
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(position.wrapping_mul(10_007))
        .wrapping_add(1) // Offset to distinguish from the shuffle seed
}
