//! Unified test logging initialization
//!
//! One idempotent entrypoint shared by unit tests (via `ctor`) and every
//! integration test binary.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize test logging once per process.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `"warn"`. Gateway
/// diagnostics (outbound request/response dumps) are at debug level, so
/// `TEST_LOG=inference_gateway=debug` shows exactly what went upstream.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
