//! Shading context construction (the Render Context Builder)
//!
//! The [`ShadingContext`] is the per-batch bundle of ambient and
//! per-instance parameters a material pass needs to configure itself. One is
//! built fresh for every contiguous batch, owned by the loop iteration that
//! created it, and discarded when the next batch is built.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::api::{CubemapHandle, TextureHandle};
use crate::render::instance::RenderInstance;
use crate::render::lighting::LightDescriptor;
use crate::render::scene::SceneState;

/// Per-batch parameter bundle handed to the material pass protocol
#[derive(Debug, Clone)]
pub struct ShadingContext {
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Copy of the instance's primary light
    pub light: LightDescriptor,
    /// Copy of the instance's secondary light
    pub light_secondary: LightDescriptor,
    /// Whether fog is applied; always true for the glow pass
    pub use_fog: bool,
    /// Fog lookup texture
    pub fog_texture: Option<TextureHandle>,
    /// Height at which fog begins
    pub fog_height_offset: f32,
    /// Reciprocal of the fog height range
    pub fog_inv_height_range: f32,
    /// Visible-distance modifier
    pub visible_distance_mod: f32,
    /// Marks the context as belonging to the glow pass; always true here
    pub glow_pass: bool,
    /// Baked lightmap copied from the instance, if present
    pub lightmap: Option<TextureHandle>,
    /// Normal-mapped lightmap copied from the instance, if present
    pub norm_lightmap: Option<TextureHandle>,
    /// Instance visibility/opacity scalar
    pub visibility: f32,
    /// Instance object transform
    pub object_transform: Mat4,
    /// Captured backbuffer texture, if present
    pub backbuffer_tex: Option<TextureHandle>,
    /// Environment cubemap, if present
    pub cubemap: Option<CubemapHandle>,
}

impl Default for ShadingContext {
    /// All-zero starting point; the builder overwrites every field.
    fn default() -> Self {
        Self {
            camera_position: Vec3::zeros(),
            light: LightDescriptor::default(),
            light_secondary: LightDescriptor::default(),
            use_fog: false,
            fog_texture: None,
            fog_height_offset: 0.0,
            fog_inv_height_range: 0.0,
            visible_distance_mod: 0.0,
            glow_pass: false,
            lightmap: None,
            norm_lightmap: None,
            visibility: 0.0,
            object_transform: Mat4::zeros(),
            backbuffer_tex: None,
            cubemap: None,
        }
    }
}

impl ShadingContext {
    /// Build the context for one glow batch from an instance and the scene
    /// snapshot.
    ///
    /// Starts from the zero default and populates field by field. The glow
    /// pass has no "no fog" variant, so `use_fog` and `glow_pass` are always
    /// set. Light descriptors are copied, never referenced, so later batches
    /// cannot observe mutation through aliasing. Neither input is mutated.
    pub fn for_glow_batch(instance: &RenderInstance, scene: &SceneState) -> Self {
        let mut context = Self::default();

        context.light = instance.light;
        context.light_secondary = instance.light_secondary;

        context.camera_position = scene.camera_position;
        context.object_transform = instance.object_transform;
        context.backbuffer_tex = instance.backbuffer_tex;
        context.cubemap = instance.cubemap;

        context.use_fog = true;
        context.fog_texture = scene.fog.texture;
        context.fog_height_offset = scene.fog.height_offset;
        context.fog_inv_height_range = scene.fog.inv_height_range;
        context.visible_distance_mod = scene.fog.visible_distance_mod;

        context.glow_pass = true;

        if let Some(lightmap) = instance.lightmap {
            context.lightmap = Some(lightmap);
        }
        if let Some(norm_lightmap) = instance.norm_lightmap {
            context.norm_lightmap = Some(norm_lightmap);
        }

        context.visibility = instance.visibility;

        context
    }
}
