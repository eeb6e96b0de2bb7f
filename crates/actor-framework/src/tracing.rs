//! # Observability
//!
//! Process-wide `tracing` subscriber setup.
//!
//! Verbosity comes from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run                          # lifecycle + settlements
//! RUST_LOG=debug cargo run                         # every request with its payload
//! RUST_LOG=order_fulfillment::kitchen=debug cargo run
//! ```
//!
//! The actor loop tags its lines with `entity_type`, so module targets are hidden to keep
//! lines short.

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
