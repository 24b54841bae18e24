//! Call-recording device implementation
//!
//! [`RecordingDevice`] captures every call the submission loop issues as a
//! [`DeviceCall`] value, in order. Unit tests assert on the call stream;
//! headless tools can replay or summarize it. The reported capability level
//! and viewport are configurable so disabled-hardware paths can be exercised.

use super::{
    CullMode, GpuDevice, IndexBufferHandle, RectI, TextureAddressMode, TextureFilter,
    TextureHandle, VertexBufferHandle,
};

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    /// Render-target stack pushed
    PushRenderTargets,
    /// Render-target stack popped
    PopRenderTargets,
    /// Active render target set
    SetRenderTarget(TextureHandle),
    /// World-matrix stack pushed
    PushWorldMatrix,
    /// World-matrix stack popped
    PopWorldMatrix,
    /// Culling mode set
    SetCullMode(CullMode),
    /// Depth-write enable set
    SetZWriteEnable(bool),
    /// Texture stage addressing set
    SetTextureStageAddressMode {
        /// Stage index
        stage: u32,
        /// U addressing mode
        u: TextureAddressMode,
        /// V addressing mode
        v: TextureAddressMode,
    },
    /// Texture stage filters set
    SetTextureStageFilters {
        /// Stage index
        stage: u32,
        /// Minification filter
        min: TextureFilter,
        /// Magnification filter
        mag: TextureFilter,
        /// Mip filter
        mip: TextureFilter,
    },
    /// Vertex-shader constant rows uploaded
    SetVertexShaderConst {
        /// First constant slot
        slot: u32,
        /// Uploaded rows
        rows: Vec<[f32; 4]>,
    },
    /// Vertex buffer bound
    SetVertexBuffer(VertexBufferHandle),
    /// Index buffer bound
    SetIndexBuffer(IndexBufferHandle),
    /// Indexed primitive group drawn
    DrawIndexedPrimitive(u32),
    /// Offscreen contents composited to the screen
    CompositeToScreen {
        /// Source surface
        source: TextureHandle,
        /// Destination viewport
        viewport: RectI,
    },
}

/// A [`GpuDevice`] that records its call stream
#[derive(Debug)]
pub struct RecordingDevice {
    calls: Vec<DeviceCall>,
    pixel_shader_version: f32,
    viewport: RectI,
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDevice {
    /// Create a device reporting shader-model 2.0 and a 1280x720 viewport.
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pixel_shader_version: 2.0,
            viewport: RectI::new(0, 0, 1280, 720),
        }
    }

    /// Override the reported shading-capability level.
    pub fn with_pixel_shader_version(mut self, version: f32) -> Self {
        self.pixel_shader_version = version;
        self
    }

    /// Override the reported viewport.
    pub fn with_viewport(mut self, viewport: RectI) -> Self {
        self.viewport = viewport;
        self
    }

    /// The recorded call stream, in issue order.
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// Discard the recorded call stream.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl GpuDevice for RecordingDevice {
    fn viewport(&self) -> RectI {
        self.viewport
    }

    fn pixel_shader_version(&self) -> f32 {
        self.pixel_shader_version
    }

    fn push_render_targets(&mut self) {
        self.calls.push(DeviceCall::PushRenderTargets);
    }

    fn pop_render_targets(&mut self) {
        self.calls.push(DeviceCall::PopRenderTargets);
    }

    fn set_render_target(&mut self, surface: TextureHandle) {
        self.calls.push(DeviceCall::SetRenderTarget(surface));
    }

    fn push_world_matrix(&mut self) {
        self.calls.push(DeviceCall::PushWorldMatrix);
    }

    fn pop_world_matrix(&mut self) {
        self.calls.push(DeviceCall::PopWorldMatrix);
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        self.calls.push(DeviceCall::SetCullMode(mode));
    }

    fn set_zwrite_enable(&mut self, enabled: bool) {
        self.calls.push(DeviceCall::SetZWriteEnable(enabled));
    }

    fn set_texture_stage_address_mode(
        &mut self,
        stage: u32,
        u: TextureAddressMode,
        v: TextureAddressMode,
    ) {
        self.calls
            .push(DeviceCall::SetTextureStageAddressMode { stage, u, v });
    }

    fn set_texture_stage_filters(
        &mut self,
        stage: u32,
        min: TextureFilter,
        mag: TextureFilter,
        mip: TextureFilter,
    ) {
        self.calls.push(DeviceCall::SetTextureStageFilters {
            stage,
            min,
            mag,
            mip,
        });
    }

    fn set_vertex_shader_const(&mut self, slot: u32, rows: &[[f32; 4]]) {
        self.calls.push(DeviceCall::SetVertexShaderConst {
            slot,
            rows: rows.to_vec(),
        });
    }

    fn set_vertex_buffer(&mut self, buffer: VertexBufferHandle) {
        self.calls.push(DeviceCall::SetVertexBuffer(buffer));
    }

    fn set_index_buffer(&mut self, buffer: IndexBufferHandle) {
        self.calls.push(DeviceCall::SetIndexBuffer(buffer));
    }

    fn draw_indexed_primitive(&mut self, group_index: u32) {
        self.calls.push(DeviceCall::DrawIndexedPrimitive(group_index));
    }

    fn composite_to_screen(&mut self, source: TextureHandle, viewport: RectI) {
        self.calls
            .push(DeviceCall::CompositeToScreen { source, viewport });
    }
}
