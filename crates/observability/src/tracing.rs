//! Tracing/logging initialization.
//!
//! Recomputation and publish events are emitted as structured fields
//! (snapshot id, record counts, filter descriptors), so JSON output is the
//! default for processes and plain compact output is available for tests
//! and local runs.

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize JSON tracing for the process.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Safe to call multiple
/// times (subsequent calls are no-ops).
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Human-readable variant for tests and local debugging.
///
/// Same filtering rules as [`init`]; also idempotent.
pub fn init_compact() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .compact()
        .with_target(false)
        .try_init();
}
