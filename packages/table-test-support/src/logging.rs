//! Test logging shared by unit and integration tests.
//!
//! Level precedence: `TEST_LOG`, then `RUST_LOG`, then `warn`.
//!
//! ```bash
//! TEST_LOG=mahjong_table=debug cargo test -p mahjong-table --test store_concurrency_test
//! ```

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber once per binary. Safe to call from every test;
/// a subscriber installed elsewhere wins silently.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let directives = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());

        fmt()
            .with_env_filter(EnvFilter::new(directives))
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
