//! Table test support utilities
//!
//! This crate provides utilities shared by the table integration tests:
//! unified logging initialization and unique identifier generation.

pub mod logging;
pub mod unique_helpers;
