//! Light descriptors carried by drawable instances
//!
//! Pure value types; the glow pass copies them into each batch's shading
//! context and never computes lighting itself.

use crate::foundation::math::Vec3;

/// Description of one light affecting an instance
///
/// Copied by value into the shading context so later batches can never
/// observe mutation through aliasing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescriptor {
    /// Light direction (world space)
    pub direction: Vec3,
    /// Light position (world space)
    pub position: Vec3,
    /// Diffuse color
    pub color: Vec3,
    /// Ambient contribution
    pub ambient: Vec3,
    /// Scalar brightness multiplier
    pub brightness: f32,
}

impl Default for LightDescriptor {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, 0.0, -1.0),
            position: Vec3::zeros(),
            color: Vec3::new(1.0, 1.0, 1.0),
            ambient: Vec3::zeros(),
            brightness: 1.0,
        }
    }
}
