//! Per-frame scene state consumed by the glow pass
//!
//! The pass reads camera and fog parameters from an explicit snapshot rather
//! than from ambient scene-graph globals, so it can run against synthetic
//! scenes in tests.

use crate::foundation::math::Vec3;
use crate::render::api::TextureHandle;

/// Fog parameters sourced from the active scene
#[derive(Debug, Clone, Copy, Default)]
pub struct FogParams {
    /// Fog lookup texture
    pub texture: Option<TextureHandle>,
    /// Height at which fog begins
    pub height_offset: f32,
    /// Reciprocal of the fog height range
    pub inv_height_range: f32,
    /// Visible-distance modifier
    pub visible_distance_mod: f32,
}

/// Read-only snapshot of the scene state the glow pass samples
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneState {
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Fog configuration for this frame
    pub fog: FogParams,
}
