//! Drawable-instance data model
//!
//! A [`RenderInstance`] is one renderable unit handed to the glow pass.
//! Instances are created and populated upstream each frame, read-only while
//! the pass runs, and discarded at end of frame; the pass never mutates one.

use crate::foundation::math::Mat4;
use crate::render::api::{CubemapHandle, IndexBufferHandle, TextureHandle, VertexBufferHandle};
use crate::render::lighting::LightDescriptor;
use crate::render::materials::MaterialRef;

/// An index buffer together with the primitive group to draw from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBufferBinding {
    /// Index buffer resource
    pub buffer: IndexBufferHandle,
    /// Primitive-group index within the buffer
    pub group_index: u32,
}

/// One renderable unit submitted to the glow pass
///
/// A `None` material is not an error; the warning material substitutes at
/// submission time. A `None` index buffer means the instance is skipped at
/// draw time (no rebind, no draw) while still participating in batching.
#[derive(Clone)]
pub struct RenderInstance {
    /// World transform uploaded per draw
    pub world_transform: Mat4,
    /// Object transform (object to world)
    pub object_transform: Mat4,
    /// Bound material, if any
    pub material: Option<MaterialRef>,
    /// Vertex buffer for this instance's geometry
    pub vertex_buffer: VertexBufferHandle,
    /// Index buffer binding, if the geometry is indexed
    pub index_buffer: Option<IndexBufferBinding>,
    /// Primary light affecting the instance
    pub light: LightDescriptor,
    /// Secondary light affecting the instance
    pub light_secondary: LightDescriptor,
    /// Instances casting dynamic light are not drawn by the glow pass
    pub casts_dynamic_light: bool,
    /// Visibility/opacity scalar
    pub visibility: f32,
    /// Baked lightmap, if present
    pub lightmap: Option<TextureHandle>,
    /// Normal-mapped lightmap, if present
    pub norm_lightmap: Option<TextureHandle>,
    /// Environment cubemap, if present
    pub cubemap: Option<CubemapHandle>,
    /// Captured backbuffer texture, if present
    pub backbuffer_tex: Option<TextureHandle>,
}

impl RenderInstance {
    /// Create an instance with identity transforms and default lights.
    ///
    /// Upstream population fills in the remaining fields as needed.
    pub fn new(vertex_buffer: VertexBufferHandle) -> Self {
        Self {
            world_transform: Mat4::identity(),
            object_transform: Mat4::identity(),
            material: None,
            vertex_buffer,
            index_buffer: None,
            light: LightDescriptor::default(),
            light_secondary: LightDescriptor::default(),
            casts_dynamic_light: false,
            visibility: 1.0,
            lightmap: None,
            norm_lightmap: None,
            cubemap: None,
            backbuffer_tex: None,
        }
    }
}
