//! Shared tracing/logging setup for subsight processes.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability with JSON output.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
