//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Binaries call [`init_tracing`]
//! once at startup; `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber with an env-driven filter
///
/// Calling it twice is harmless: the second install fails quietly and the
/// first subscriber stays in place.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("[CONFIG] Tracing subscriber already installed");
    }
}
