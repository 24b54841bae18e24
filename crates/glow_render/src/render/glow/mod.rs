//! Glow pass: offscreen target controller and batch submission manager
//!
//! - **[`GlowTarget`]** / **[`GlowBuffer`]**: the offscreen accumulation
//!   surface with availability, activation, and resolve-with-composite
//! - **[`GlowRenderManager`]**: accumulates the frame's glow contributors
//!   and submits them with minimal state churn

mod manager;
mod target;

pub use manager::{GlowFrameStats, GlowRenderManager};
pub use target::{GlowBuffer, GlowTarget, GlowTargetError};
