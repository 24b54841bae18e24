//! GPU device trait and the resource handles that cross it
//!
//! The glow pass never talks to a concrete graphics API. Everything it needs
//! is expressed through [`GpuDevice`]: viewport query, render-target and
//! world-matrix stack push/pop, fixed-function state setters, shader-constant
//! uploads by slot, buffer binds, and indexed draw submission.
//!
//! All setters are infallible by signature. The glow pass expresses failure
//! as early, silent abandonment of the frame before any device state is
//! touched; once the pass is underway, faults belong to the backend's own
//! handling, outside this contract.

/// Number of texture stages the pass configures with its baseline
/// addressing/filtering state.
pub const TEXTURE_STAGE_COUNT: u32 = 8;

/// Handle to a vertex buffer resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferHandle(pub u64);

/// Handle to an index buffer resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferHandle(pub u64);

/// Handle to a texture resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a cubemap resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubemapHandle(pub u64);

/// Integer viewport rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectI {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl RectI {
    /// Create a rectangle from its origin and extent.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Triangle culling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull clockwise-wound triangles
    Clockwise,
    /// Cull counter-clockwise-wound triangles
    CounterClockwise,
}

/// Texture coordinate addressing modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureAddressMode {
    /// Repeat the texture outside [0, 1]
    Wrap,
    /// Clamp coordinates to the edge texel
    Clamp,
}

/// Texture sampling filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest-texel sampling
    Point,
    /// Linear interpolation
    Linear,
}

/// Main GPU device trait
///
/// Abstracts the immediate-mode device interface the batch submission loop
/// drives. Implementations own all backend-specific detail; the loop only
/// ever issues these calls.
pub trait GpuDevice {
    /// Current viewport rectangle.
    fn viewport(&self) -> RectI;

    /// Programmable-shading capability level reported by the device.
    ///
    /// The glow pass requires a non-zero level and early-outs below its
    /// configured threshold.
    fn pixel_shader_version(&self) -> f32;

    /// Push the active render-target stack.
    fn push_render_targets(&mut self);

    /// Pop the active render-target stack, restoring the previous target.
    fn pop_render_targets(&mut self);

    /// Make `surface` the active render destination.
    fn set_render_target(&mut self, surface: TextureHandle);

    /// Push the world-matrix stack.
    fn push_world_matrix(&mut self);

    /// Pop the world-matrix stack.
    fn pop_world_matrix(&mut self);

    /// Set the triangle culling mode.
    fn set_cull_mode(&mut self, mode: CullMode);

    /// Enable or disable depth-buffer writes.
    fn set_zwrite_enable(&mut self, enabled: bool);

    /// Set the U/V addressing mode for one texture stage.
    fn set_texture_stage_address_mode(
        &mut self,
        stage: u32,
        u: TextureAddressMode,
        v: TextureAddressMode,
    );

    /// Set the min/mag/mip filters for one texture stage.
    fn set_texture_stage_filters(
        &mut self,
        stage: u32,
        min: TextureFilter,
        mag: TextureFilter,
        mip: TextureFilter,
    );

    /// Upload vertex-shader constant rows starting at `slot`.
    fn set_vertex_shader_const(&mut self, slot: u32, rows: &[[f32; 4]]);

    /// Bind a vertex buffer.
    fn set_vertex_buffer(&mut self, buffer: VertexBufferHandle);

    /// Bind an index buffer.
    fn set_index_buffer(&mut self, buffer: IndexBufferHandle);

    /// Draw the primitive group at `group_index` of the bound buffers.
    fn draw_indexed_primitive(&mut self, group_index: u32);

    /// Composite `source` onto the visible surface over `viewport`.
    ///
    /// Used by offscreen targets when resolving their contents back to the
    /// screen after the pass.
    fn composite_to_screen(&mut self, source: TextureHandle, viewport: RectI);
}
