//! Foundation utilities shared across the crate
//!
//! Math type aliases and logging helpers, independent of any rendering
//! backend.

pub mod logging;
pub mod math;
