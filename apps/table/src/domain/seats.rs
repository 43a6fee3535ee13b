//! Seats: four fixed positions, 0..=3, in roster order.

use crate::errors::domain::{ArgumentKind, DomainError};

/// Positional seat index, 0..=3.
pub type Seat = u8;

pub const SEATS: usize = 4;

pub const ALL_SEATS: [Seat; SEATS] = [0, 1, 2, 3];

pub fn require_seat(seat: Seat) -> Result<Seat, DomainError> {
    if usize::from(seat) < SEATS {
        Ok(seat)
    } else {
        Err(DomainError::invalid(
            ArgumentKind::Seat,
            format!("seat {seat} is outside 0..=3"),
        ))
    }
}
