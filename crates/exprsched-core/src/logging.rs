//! # Observability (C10)
//!
//! A single `init_tracing()` entry point shared by both binaries so the
//! orchestrator and the worker log in the same shape. Respects `RUST_LOG`
//! (standard `tracing_subscriber::EnvFilter` syntax), defaulting to `info`
//! for this crate and `warn` for dependencies.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,exprsched_core=debug,exprsched_orchestrator=debug,exprsched_worker=debug";

/// Install a global `tracing` subscriber. Safe to call once per process;
/// calling it twice (e.g. in tests) is ignored rather than panicking.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
