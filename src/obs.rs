//! Observability helpers for embedding hosts and tests.

use tracing_subscriber::EnvFilter;

/// Installs a formatted tracing subscriber with an env-driven filter
/// (`RUST_LOG`, defaulting to `info`).
///
/// Idempotent: a second call (for example from another test) is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
