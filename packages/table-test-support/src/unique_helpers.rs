//! Helpers for generating unique test data.
//!
//! ULIDs keep player and game identifiers distinct between test runs that
//! share a backing store.

use ulid::Ulid;

/// Generate a unique string with the given prefix, formatted `{prefix}-{ulid}`.
///
/// # Examples
/// ```
/// use table_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("player");
/// let id2 = unique_str("player");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate four unique player ids sharing a prefix, one per seat.
pub fn unique_player_ids(prefix: &str) -> [String; 4] {
    [
        unique_str(&format!("{prefix}-p1")),
        unique_str(&format!("{prefix}-p2")),
        unique_str(&format!("{prefix}-p3")),
        unique_str(&format!("{prefix}-p4")),
    ]
}
