//! Seeded, reproducible random source shared by every seat.
//!
//! The generator is a pair of 16-bit multiply-with-carry lanes packed into
//! 32-bit state words. It is deliberately simple so that any client can
//! re-implement it and verify the deck from the published seed.

use crate::errors::domain::{ArgumentKind, DomainError};

/// Number of distinct raw outputs (2^32).
const OUTPUT_SPACE: u64 = 1 << 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSource {
    w: u32,
    z: u32,
}

impl RandomSource {
    pub fn new(seed: u32) -> Self {
        Self {
            w: 123_456_789u32.wrapping_add(seed),
            z: 987_654_321u32.wrapping_sub(seed),
        }
    }

    /// Create a generator from OS entropy, returning the seed so it can be recorded.
    pub fn from_entropy() -> (Self, u32) {
        let seed = rand::random::<u32>();
        (Self::new(seed), seed)
    }

    /// One full-range 32-bit draw.
    pub fn next_u32(&mut self) -> u32 {
        self.z = 36969u32
            .wrapping_mul(self.z & 0xFFFF)
            .wrapping_add(self.z >> 16);
        self.w = 18000u32
            .wrapping_mul(self.w & 0xFFFF)
            .wrapping_add(self.w >> 16);
        (self.z << 16) | (self.w & 0xFFFF)
    }

    /// Uniform draw in `[0, limit)`.
    ///
    /// Raw outputs above the largest multiple of `limit` that fits in 2^32 are
    /// rejected and redrawn, so the modulus never favours low values.
    pub fn next(&mut self, limit: u32) -> Result<u32, DomainError> {
        if limit == 0 {
            return Err(DomainError::invalid(
                ArgumentKind::RandomLimit,
                "limit must be a positive integer",
            ));
        }

        let limit = u64::from(limit);
        let highest_permitted = (OUTPUT_SPACE / limit) * limit - 1;
        loop {
            let value = u64::from(self.next_u32());
            if value <= highest_permitted {
                // value % limit < limit <= u32::MAX
                return Ok((value % limit) as u32);
            }
        }
    }
}
