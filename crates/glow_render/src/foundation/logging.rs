//! Logging setup for glow-pass diagnostics
//!
//! The pass reports through `log`: `trace!` names the early-out that
//! abandoned a frame, `debug!` summarizes batch/draw/rebind counts after a
//! completed pass, and `warn!` flags warning-material substitutions. These
//! helpers install `env_logger` as the sink so `RUST_LOG=glow_render=debug`
//! surfaces that stream in tools and tests.

pub use log::{debug, error, info, trace, warn};

/// Install the `env_logger` backend.
///
/// Panics if a logger is already installed; call once at startup.
pub fn init() {
    env_logger::init();
}

/// Install the `env_logger` backend if no logger is installed yet.
///
/// Safe to call from every test or tool entry point.
pub fn try_init() {
    let _ = env_logger::try_init();
}
