//! # Glow batch submission
//!
//! This module provides the glow pass manager: it accumulates the frame's
//! glow-contributing instances and submits them to the device with minimal
//! state churn.
//!
//! ## Algorithm
//!
//! The instance list is walked with a cursor. Each non-skipped instance
//! opens a batch: a shading context is built, the effective material is
//! resolved (warning fallback for unbound instances), and the material's
//! pass sequence is driven. Within each pass the loop scans forward over the
//! contiguous run of instances sharing the batch material's identity,
//! uploading per-draw shader constants and issuing draws with vertex/index
//! buffer rebinds elided through a pass-local cache. Dynamically-lit
//! instances are never drawn by this pass: they end the run they would have
//! joined, and the cursor walk steps over them. Every pass re-walks the
//! same run from the batch's origin; the cursor then jumps to the run's end,
//! with a forced single-step advance when the run was empty so the walk
//! always makes progress.
//!
//! Relative draw order follows the caller's list order exactly. Batching
//! only elides redundant state transitions.

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::foundation::math::{
    direction_row, inverse_of_transposed, matrix_rows, matrix_rows3, position_row, translation_of,
    without_translation, Mat4, Point3,
};
use crate::render::api::{
    CullMode, GpuDevice, IndexBufferHandle, TextureAddressMode, TextureFilter, VertexBufferHandle,
    TEXTURE_STAGE_COUNT,
};
use crate::render::context::ShadingContext;
use crate::render::glow::target::GlowTarget;
use crate::render::instance::RenderInstance;
use crate::render::materials::{same_material, MaterialRef};
use crate::render::scene::SceneState;
use crate::render::shader_consts;
use crate::settings::GlowSettings;

/// Per-frame statistics collected by [`GlowRenderManager::render`]
///
/// Reset at the start of every render call; cheap counters only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlowFrameStats {
    /// Batches opened (contiguous same-material runs)
    pub batches: u32,
    /// Material passes configured across all batches
    pub passes: u32,
    /// Draw calls issued
    pub draws: u32,
    /// Vertex-buffer rebinds performed
    pub vertex_rebinds: u32,
    /// Index-buffer rebinds performed
    pub index_rebinds: u32,
    /// Rebinds elided because the buffer identity was already bound
    pub rebind_elisions: u32,
    /// Instances skipped for casting dynamic light
    pub dynamic_light_skips: u32,
    /// Batches that fell back to the warning material
    pub fallback_substitutions: u32,
}

impl GlowFrameStats {
    /// Average draw calls per batch.
    pub fn avg_draws_per_batch(&self) -> f32 {
        if self.batches == 0 {
            0.0
        } else {
            self.draws as f32 / self.batches as f32
        }
    }
}

/// Last-bound buffer identities, spanning one whole render call
///
/// Not reset per pass or per batch; rebind elision spans every submission of
/// the frame. Comparison is by handle identity, never contents.
#[derive(Debug, Default)]
struct BufferBindCache {
    last_vertex: Option<VertexBufferHandle>,
    last_index: Option<IndexBufferHandle>,
}

impl BufferBindCache {
    /// Bind `buffer` if its identity differs from the last bound vertex
    /// buffer. Returns whether a rebind was issued.
    fn bind_vertex<D: GpuDevice + ?Sized>(
        &mut self,
        device: &mut D,
        buffer: VertexBufferHandle,
    ) -> bool {
        if self.last_vertex == Some(buffer) {
            return false;
        }
        device.set_vertex_buffer(buffer);
        self.last_vertex = Some(buffer);
        true
    }

    /// Bind `buffer` if its identity differs from the last bound index
    /// buffer. Returns whether a rebind was issued.
    fn bind_index<D: GpuDevice + ?Sized>(
        &mut self,
        device: &mut D,
        buffer: IndexBufferHandle,
    ) -> bool {
        if self.last_index == Some(buffer) {
            return false;
        }
        device.set_index_buffer(buffer);
        self.last_index = Some(buffer);
        true
    }
}

/// Manager for the per-frame glow pass
///
/// Accumulates [`RenderInstance`]s (population and sort order are the
/// caller's business) and submits them once per frame via
/// [`render`](Self::render). Holds the process-wide warning material used
/// for instances that arrive without a material bound.
pub struct GlowRenderManager {
    elements: Vec<RenderInstance>,
    warning_material: MaterialRef,
    pixel_shader_threshold: f32,
    stats: GlowFrameStats,
}

impl GlowRenderManager {
    /// Minimum programmable-shading capability for the pass to run.
    pub const DEFAULT_PIXEL_SHADER_THRESHOLD: f32 = 0.001;

    /// Create a manager with the default capability threshold.
    pub fn new(warning_material: MaterialRef) -> Self {
        Self {
            elements: Vec::new(),
            warning_material,
            pixel_shader_threshold: Self::DEFAULT_PIXEL_SHADER_THRESHOLD,
            stats: GlowFrameStats::default(),
        }
    }

    /// Create a manager with the threshold taken from settings.
    pub fn with_settings(warning_material: MaterialRef, settings: &GlowSettings) -> Self {
        Self {
            pixel_shader_threshold: settings.pixel_shader_threshold,
            ..Self::new(warning_material)
        }
    }

    /// Append an instance to this frame's list.
    ///
    /// The list's relative order is preserved through submission.
    pub fn add_instance(&mut self, instance: RenderInstance) {
        self.elements.push(instance);
    }

    /// Drop all accumulated instances.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Number of accumulated instances.
    pub fn instance_count(&self) -> usize {
        self.elements.len()
    }

    /// Whether the frame's list is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Statistics from the most recent [`render`](Self::render) call.
    pub fn frame_stats(&self) -> &GlowFrameStats {
        &self.stats
    }

    /// Render this frame's glow batch.
    ///
    /// Runs to completion on the calling thread. Failure is expressed as
    /// early, silent abandonment of the pass: a build variant without glow,
    /// an empty list, insufficient shading capability, or an absent/disabled
    /// target each return before any device state is touched. On the success
    /// path the render-target and world-matrix stacks and the depth-write
    /// flag are restored; texture-stage addressing/filtering is this pass's
    /// baseline and is not restored.
    pub fn render<D, G>(&mut self, device: &mut D, scene: &SceneState, target: Option<&mut G>)
    where
        D: GpuDevice,
        G: GlowTarget + ?Sized,
    {
        self.stats = GlowFrameStats::default();

        if cfg!(feature = "disable-glow") {
            return;
        }

        if self.elements.is_empty() {
            trace!("glow pass skipped: nothing to draw");
            return;
        }

        if device.pixel_shader_version() < self.pixel_shader_threshold {
            trace!("glow pass skipped: shading capability below threshold");
            return;
        }

        let Some(target) = target else {
            trace!("glow pass skipped: no glow buffer");
            return;
        };
        if !target.is_enabled() || self.elements.is_empty() {
            trace!("glow pass skipped: glow buffer disabled");
            return;
        }

        let viewport = device.viewport();

        device.push_render_targets();
        target.activate(&mut *device);

        device.push_world_matrix();

        // fixed render state for the pass
        device.set_cull_mode(CullMode::CounterClockwise);
        device.set_zwrite_enable(false);
        for stage in 0..TEXTURE_STAGE_COUNT {
            device.set_texture_stage_address_mode(
                stage,
                TextureAddressMode::Wrap,
                TextureAddressMode::Wrap,
            );
            device.set_texture_stage_filters(
                stage,
                TextureFilter::Linear,
                TextureFilter::Linear,
                TextureFilter::Linear,
            );
        }

        let mut bind_cache = BufferBindCache::default();
        let elements = &self.elements;
        let stats = &mut self.stats;
        let warning = &self.warning_material;
        let bin_size = elements.len();

        let mut j = 0;
        while j < bin_size {
            let ri = &elements[j];

            // glow submission does not handle dynamically-lit instances
            if ri.casts_dynamic_light {
                stats.dynamic_light_skips += 1;
                j += 1;
                continue;
            }

            let context = ShadingContext::for_glow_batch(ri, scene);
            let material: MaterialRef = match &ri.material {
                Some(material) => Arc::clone(material),
                None => {
                    warn!("glow instance without material, substituting warning material");
                    stats.fallback_substitutions += 1;
                    Arc::clone(warning)
                }
            };
            let has_cubemap = material.has_cubemap();

            let mut run_end = j;
            let mut passes = material.begin_passes();

            while passes.setup_next(&mut *device, &context) {
                stats.passes += 1;

                let mut a = j;
                while a < bin_size {
                    let pass_ri = &elements[a];

                    // dynamically-lit instances end the run; the cursor walk
                    // skips them without ever drawing
                    if pass_ri.casts_dynamic_light {
                        break;
                    }

                    // unbound instances batch under the warning material
                    let pass_material = pass_ri.material.as_ref().unwrap_or(warning);
                    if !same_material(&material, pass_material) {
                        break;
                    }

                    upload_instance_constants(device, pass_ri, scene, has_cubemap);

                    if let Some(binding) = pass_ri.index_buffer {
                        if bind_cache.bind_vertex(device, pass_ri.vertex_buffer) {
                            stats.vertex_rebinds += 1;
                        } else {
                            stats.rebind_elisions += 1;
                        }
                        if bind_cache.bind_index(device, binding.buffer) {
                            stats.index_rebinds += 1;
                        } else {
                            stats.rebind_elisions += 1;
                        }
                        device.draw_indexed_primitive(binding.group_index);
                        stats.draws += 1;
                    }

                    a += 1;
                }
                run_end = a;
            }
            stats.batches += 1;

            // force increment if the run was empty, otherwise jump to its end
            j = if j == run_end { j + 1 } else { run_end };
        }

        device.set_zwrite_enable(true);
        device.pop_render_targets();
        target.resolve(&mut *device, viewport);

        device.pop_world_matrix();

        debug!(
            "glow pass: {} batches, {} passes, {} draws, {}+{} rebinds ({} elided)",
            self.stats.batches,
            self.stats.passes,
            self.stats.draws,
            self.stats.vertex_rebinds,
            self.stats.index_rebinds,
            self.stats.rebind_elisions,
        );
    }
}

/// Upload the per-draw vertex-shader constants for one instance.
///
/// The object transform is uploaded transposed; the eye position and light
/// direction are mapped into object space through the inverse of that
/// transposed matrix. The cubemap eye position is world-space (camera minus
/// object translation) while the cube transform carries orientation only.
/// That asymmetry is part of the shading model's contract.
fn upload_instance_constants<D: GpuDevice>(
    device: &mut D,
    ri: &RenderInstance,
    scene: &SceneState,
    has_cubemap: bool,
) {
    device.set_vertex_shader_const(
        shader_consts::VC_WORLD_TRANS,
        &matrix_rows(&ri.world_transform),
    );

    let transposed_obj = ri.object_transform.transpose();
    device.set_vertex_shader_const(shader_consts::VC_OBJ_TRANS, &matrix_rows(&transposed_obj));

    // singular transforms fall back to identity rather than aborting the pass
    let object_space =
        inverse_of_transposed(&ri.object_transform).unwrap_or_else(Mat4::identity);

    let eye_pos = object_space.transform_point(&Point3::from(scene.camera_position));
    device.set_vertex_shader_const(shader_consts::VC_EYE_POS, &[position_row(&eye_pos.coords)]);

    let light_dir = object_space.transform_vector(&ri.light.direction);
    device.set_vertex_shader_const(shader_consts::VC_LIGHT_DIR1, &[direction_row(&light_dir)]);

    if has_cubemap {
        let cube_eye = scene.camera_position - translation_of(&ri.object_transform);
        device.set_vertex_shader_const(shader_consts::VC_CUBE_EYE_POS, &[position_row(&cube_eye)]);

        let cube_trans = without_translation(&ri.object_transform).transpose();
        device.set_vertex_shader_const(shader_consts::VC_CUBE_TRANS, &matrix_rows3(&cube_trans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::api::recording::{DeviceCall, RecordingDevice};
    use crate::render::api::{IndexBufferHandle, RectI, VertexBufferHandle};
    use crate::render::glow::target::GlowBuffer;
    use crate::render::instance::IndexBufferBinding;
    use crate::render::materials::FixedPassMaterial;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    fn material(passes: u32) -> MaterialRef {
        Arc::new(FixedPassMaterial::new("test", passes))
    }

    fn cubemap_material() -> MaterialRef {
        Arc::new(FixedPassMaterial::new("cube", 1).with_cubemap())
    }

    fn instance(material: Option<&MaterialRef>, vb: u64, ib: u64, group: u32) -> RenderInstance {
        let mut ri = RenderInstance::new(VertexBufferHandle(vb));
        ri.material = material.map(Arc::clone);
        ri.index_buffer = Some(IndexBufferBinding {
            buffer: IndexBufferHandle(ib),
            group_index: group,
        });
        ri
    }

    fn manager() -> GlowRenderManager {
        GlowRenderManager::new(Arc::new(FixedPassMaterial::warning()))
    }

    fn scene() -> SceneState {
        SceneState {
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            ..SceneState::default()
        }
    }

    fn target() -> GlowBuffer {
        GlowBuffer::new((1280, 720), &GlowSettings::default()).unwrap()
    }

    fn draw_calls(device: &RecordingDevice) -> Vec<u32> {
        device
            .calls()
            .iter()
            .filter_map(|c| match c {
                DeviceCall::DrawIndexedPrimitive(group) => Some(*group),
                _ => None,
            })
            .collect()
    }

    fn const_rows(device: &RecordingDevice, wanted_slot: u32) -> Vec<Vec<[f32; 4]>> {
        device
            .calls()
            .iter()
            .filter_map(|c| match c {
                DeviceCall::SetVertexShaderConst { slot, rows } if *slot == wanted_slot => {
                    Some(rows.clone())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_list_touches_no_device_state() {
        let mut mgr = manager();
        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn low_shading_capability_touches_no_device_state() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        let mut device = RecordingDevice::new().with_pixel_shader_version(0.0);
        mgr.render(&mut device, &scene(), Some(&mut target()));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn absent_target_touches_no_device_state() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        let mut device = RecordingDevice::new();
        mgr.render::<_, GlowBuffer>(&mut device, &scene(), None);
        assert!(device.calls().is_empty());
    }

    #[test]
    fn disabled_target_touches_no_device_state() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        let mut device = RecordingDevice::new();
        let mut glow = target();
        glow.set_disabled(true);
        mgr.render(&mut device, &scene(), Some(&mut glow));
        assert!(device.calls().is_empty());
        assert_eq!(*mgr.frame_stats(), GlowFrameStats::default());
    }

    #[test]
    fn settings_threshold_gates_the_pass() {
        let settings = GlowSettings {
            pixel_shader_threshold: 3.0,
            ..GlowSettings::default()
        };
        let mut mgr =
            GlowRenderManager::with_settings(Arc::new(FixedPassMaterial::warning()), &settings);
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        let mut device = RecordingDevice::new(); // reports 2.0
        mgr.render(&mut device, &scene(), Some(&mut target()));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn dynamic_light_instances_are_skipped_but_cursor_advances() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        let mut lit = instance(Some(&mat), 1, 1, 1);
        lit.casts_dynamic_light = true;
        mgr.add_instance(lit);
        mgr.add_instance(instance(Some(&mat), 1, 1, 2));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        // group 1 is never drawn; the instances around it are
        assert_eq!(draw_calls(&device), vec![0, 2]);
        assert_eq!(mgr.frame_stats().dynamic_light_skips, 1);
    }

    #[test]
    fn dynamic_light_instance_inside_a_run_is_never_drawn_across_passes() {
        let mut mgr = manager();
        let mat = material(2);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        let mut lit = instance(Some(&mat), 1, 1, 1);
        lit.casts_dynamic_light = true;
        mgr.add_instance(lit);
        mgr.add_instance(instance(Some(&mat), 1, 1, 2));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        // the lit instance splits the run; both halves still get every pass
        assert_eq!(draw_calls(&device), vec![0, 0, 2, 2]);
        assert_eq!(mgr.frame_stats().dynamic_light_skips, 1);
        assert_eq!(mgr.frame_stats().batches, 2);
        assert_eq!(mgr.frame_stats().passes, 4);

        // no constants were uploaded for the skipped instance either
        assert_eq!(const_rows(&device, shader_consts::VC_WORLD_TRANS).len(), 4);
    }

    #[test]
    fn rebinds_fire_once_per_identity_across_a_run() {
        let mut mgr = manager();
        let mat = material(1);
        for group in 0..3 {
            mgr.add_instance(instance(Some(&mat), 7, 9, group));
        }

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::SetVertexBuffer(_))),
            1
        );
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::SetIndexBuffer(_))),
            1
        );
        assert_eq!(draw_calls(&device), vec![0, 1, 2]);
        assert_eq!(mgr.frame_stats().rebind_elisions, 4);
    }

    #[test]
    fn rebind_cache_spans_batches_within_a_frame() {
        let mut mgr = manager();
        let mat_a = material(1);
        let mat_b = material(1);
        // distinct materials, same buffers: batch break without rebinds
        mgr.add_instance(instance(Some(&mat_a), 7, 9, 0));
        mgr.add_instance(instance(Some(&mat_b), 7, 9, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(mgr.frame_stats().batches, 2);
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::SetVertexBuffer(_))),
            1
        );
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::SetIndexBuffer(_))),
            1
        );
    }

    #[test]
    fn batch_boundaries_follow_material_transitions_only() {
        let mut mgr = manager();
        let mat_a = material(1);
        let mat_b = material(1);
        // [A, A, B, A]: the trailing A is its own batch, not merged
        mgr.add_instance(instance(Some(&mat_a), 1, 1, 0));
        mgr.add_instance(instance(Some(&mat_a), 1, 1, 1));
        mgr.add_instance(instance(Some(&mat_b), 2, 2, 2));
        mgr.add_instance(instance(Some(&mat_a), 1, 1, 3));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(mgr.frame_stats().batches, 3);
        assert_eq!(mgr.frame_stats().passes, 3);
        assert_eq!(draw_calls(&device), vec![0, 1, 2, 3]);
    }

    #[test]
    fn equal_valued_materials_are_not_merged() {
        let mut mgr = manager();
        // same parameters, distinct instances: identity comparison splits them
        let mat_a = material(1);
        let mat_b = material(1);
        mgr.add_instance(instance(Some(&mat_a), 1, 1, 0));
        mgr.add_instance(instance(Some(&mat_b), 1, 1, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));
        assert_eq!(mgr.frame_stats().batches, 2);
    }

    #[test]
    fn null_materials_batch_under_the_warning_identity() {
        let mut mgr = manager();
        mgr.add_instance(instance(None, 1, 1, 0));
        mgr.add_instance(instance(None, 1, 1, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        // one batch, both drawn through the fallback material
        assert_eq!(mgr.frame_stats().batches, 1);
        assert_eq!(mgr.frame_stats().fallback_substitutions, 1);
        assert_eq!(draw_calls(&device), vec![0, 1]);
    }

    #[test]
    fn null_material_breaks_a_bound_material_run() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        mgr.add_instance(instance(None, 1, 1, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(mgr.frame_stats().batches, 2);
        assert_eq!(draw_calls(&device), vec![0, 1]);
    }

    #[test]
    fn zero_pass_material_still_advances_the_cursor() {
        let mut mgr = manager();
        let inert = material(0);
        let mat = material(1);
        mgr.add_instance(instance(Some(&inert), 1, 1, 0));
        mgr.add_instance(instance(Some(&mat), 1, 1, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        // the zero-pass batch draws nothing but must not stall the walk
        assert_eq!(draw_calls(&device), vec![1]);
        assert_eq!(mgr.frame_stats().batches, 2);
    }

    #[test]
    fn multi_pass_material_rewalks_its_run_per_pass() {
        let mut mgr = manager();
        let mat = material(2);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        mgr.add_instance(instance(Some(&mat), 1, 1, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(mgr.frame_stats().batches, 1);
        assert_eq!(mgr.frame_stats().passes, 2);
        // each pass re-walks the run from the batch origin
        assert_eq!(draw_calls(&device), vec![0, 1, 0, 1]);
    }

    #[test]
    fn missing_index_buffer_skips_the_draw_only() {
        let mut mgr = manager();
        let mat = material(1);
        let mut unindexed = instance(Some(&mat), 1, 1, 0);
        unindexed.index_buffer = None;
        mgr.add_instance(unindexed);
        mgr.add_instance(instance(Some(&mat), 1, 1, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(draw_calls(&device), vec![1]);
        // constants still went up for both instances in the run
        assert_eq!(const_rows(&device, shader_consts::VC_WORLD_TRANS).len(), 2);
    }

    #[test]
    fn stacks_and_depth_write_are_restored() {
        let mut mgr = manager();
        let mat = material(2);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));
        mgr.add_instance(instance(None, 2, 2, 1));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        let calls = device.calls();
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::PushRenderTargets)),
            1
        );
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::PopRenderTargets)),
            1
        );
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::PushWorldMatrix)),
            1
        );
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::PopWorldMatrix)),
            1
        );

        // depth writes re-enabled at the end
        let last_zwrite = calls
            .iter()
            .rev()
            .find_map(|c| match c {
                DeviceCall::SetZWriteEnable(enabled) => Some(*enabled),
                _ => None,
            })
            .unwrap();
        assert!(last_zwrite);

        // composite lands after the target pop, before the matrix pop
        let pop_targets = calls
            .iter()
            .position(|c| matches!(c, DeviceCall::PopRenderTargets))
            .unwrap();
        let composite = calls
            .iter()
            .position(|c| matches!(c, DeviceCall::CompositeToScreen { .. }))
            .unwrap();
        let pop_world = calls
            .iter()
            .position(|c| matches!(c, DeviceCall::PopWorldMatrix))
            .unwrap();
        assert!(pop_targets < composite && composite < pop_world);
    }

    #[test]
    fn composite_uses_the_saved_viewport() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));

        let viewport = RectI::new(16, 32, 640, 480);
        let mut device = RecordingDevice::new().with_viewport(viewport);
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(
            device.count_calls(|c| matches!(
                c,
                DeviceCall::CompositeToScreen { viewport: vp, .. } if *vp == viewport
            )),
            1
        );
    }

    #[test]
    fn fixed_pass_state_covers_every_texture_stage() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert_eq!(
            device.count_calls(|c| matches!(
                c,
                DeviceCall::SetTextureStageAddressMode {
                    u: TextureAddressMode::Wrap,
                    v: TextureAddressMode::Wrap,
                    ..
                }
            )),
            TEXTURE_STAGE_COUNT as usize
        );
        assert_eq!(
            device.count_calls(|c| matches!(c, DeviceCall::SetTextureStageFilters { .. })),
            TEXTURE_STAGE_COUNT as usize
        );
        assert_eq!(
            device.count_calls(
                |c| matches!(c, DeviceCall::SetCullMode(CullMode::CounterClockwise))
            ),
            1
        );
    }

    #[test]
    fn cube_eye_position_is_rotation_independent() {
        let translation = Vec3::new(10.0, 0.0, 0.0);
        let rotated = Mat4::new_translation(&translation)
            * Rotation3::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2)
                .to_homogeneous();
        let unrotated = Mat4::new_translation(&translation);

        let mut mgr = manager();
        let mat = cubemap_material();
        let mut a = instance(Some(&mat), 1, 1, 0);
        a.object_transform = unrotated;
        let mut b = instance(Some(&mat), 1, 1, 1);
        b.object_transform = rotated;
        mgr.add_instance(a);
        mgr.add_instance(b);

        let camera = Vec3::new(11.0, 0.0, 0.0);
        let scene = SceneState {
            camera_position: camera,
            ..SceneState::default()
        };

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene, Some(&mut target()));

        let cube_eyes = const_rows(&device, shader_consts::VC_CUBE_EYE_POS);
        assert_eq!(cube_eyes.len(), 2);
        // world-space camera minus object translation, rotation plays no part
        let expected = camera - translation;
        for rows in &cube_eyes {
            assert_relative_eq!(rows[0][0], expected.x);
            assert_relative_eq!(rows[0][1], expected.y);
            assert_relative_eq!(rows[0][2], expected.z);
        }

        // the generic eye position does depend on the rotation
        let eyes = const_rows(&device, shader_consts::VC_EYE_POS);
        assert_eq!(eyes.len(), 2);
        assert_ne!(eyes[0], eyes[1]);
    }

    #[test]
    fn cube_transform_drops_translation_and_is_transposed() {
        let translation = Vec3::new(3.0, -2.0, 1.0);
        let rotation =
            Rotation3::from_axis_angle(&Vec3::y_axis(), 0.5).to_homogeneous();
        let object = Mat4::new_translation(&translation) * rotation;

        let mut mgr = manager();
        let mat = cubemap_material();
        let mut ri = instance(Some(&mat), 1, 1, 0);
        ri.object_transform = object;
        mgr.add_instance(ri);

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        let uploads = const_rows(&device, shader_consts::VC_CUBE_TRANS);
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].len(), 3);
        let expected = without_translation(&object).transpose();
        let expected_rows = matrix_rows3(&expected);
        for (row, expected_row) in uploads[0].iter().zip(expected_rows.iter()) {
            for (value, expected_value) in row.iter().zip(expected_row.iter()) {
                assert_relative_eq!(*value, *expected_value);
            }
            // no translation terms survive into the cube transform
            assert_relative_eq!(row[3], 0.0);
        }
    }

    #[test]
    fn non_cubemap_material_uploads_no_cube_constants() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        assert!(const_rows(&device, shader_consts::VC_CUBE_EYE_POS).is_empty());
        assert!(const_rows(&device, shader_consts::VC_CUBE_TRANS).is_empty());
    }

    #[test]
    fn object_transform_upload_is_transposed() {
        let object = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));

        let mut mgr = manager();
        let mat = material(1);
        let mut ri = instance(Some(&mat), 1, 1, 0);
        ri.object_transform = object;
        mgr.add_instance(ri);

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));

        let uploads = const_rows(&device, shader_consts::VC_OBJ_TRANS);
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].len(), 4);
        // transposed: the translation lands in the bottom row
        assert_eq!(uploads[0][3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn stats_reset_between_render_calls() {
        let mut mgr = manager();
        let mat = material(1);
        mgr.add_instance(instance(Some(&mat), 1, 1, 0));

        let mut device = RecordingDevice::new();
        mgr.render(&mut device, &scene(), Some(&mut target()));
        assert_eq!(mgr.frame_stats().draws, 1);

        mgr.clear();
        mgr.render(&mut device, &scene(), Some(&mut target()));
        assert_eq!(*mgr.frame_stats(), GlowFrameStats::default());
    }

    #[test]
    fn avg_draws_per_batch_handles_empty_frames() {
        let stats = GlowFrameStats::default();
        assert_relative_eq!(stats.avg_draws_per_batch(), 0.0);
        let stats = GlowFrameStats {
            batches: 2,
            draws: 6,
            ..GlowFrameStats::default()
        };
        assert_relative_eq!(stats.avg_draws_per_batch(), 3.0);
    }
}
