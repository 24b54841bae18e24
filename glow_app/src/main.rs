//! Headless glow-pass demo
//!
//! Builds a synthetic frame of glow contributors, runs the batch submission
//! loop against a call-recording device, and reports how much state churn
//! the batching saved. Useful as a wiring example and for eyeballing the
//! call stream with `RUST_LOG=trace`.

use std::sync::Arc;

use glow_render::prelude::*;

const SETTINGS_PATH: &str = "glow_app/glow.toml";
const FRAMES: u32 = 3;

fn load_settings() -> GlowSettings {
    match GlowSettings::load_from_file(SETTINGS_PATH) {
        Ok(settings) => settings,
        Err(err) => {
            log::info!("using default glow settings ({err})");
            GlowSettings::default()
        }
    }
}

/// Populate one frame's worth of instances.
///
/// Mirrors what an engine's bin-sorting step would hand over: contiguous
/// same-material runs, one unbound instance, and one dynamically-lit
/// instance the pass must skip.
fn populate(manager: &mut GlowRenderManager, neon: &MaterialRef, chrome: &MaterialRef) {
    let sign_vb = VertexBufferHandle(1);
    let sign_ib = IndexBufferHandle(1);
    let hull_vb = VertexBufferHandle(2);
    let hull_ib = IndexBufferHandle(2);

    // three neon sign segments sharing buffers: one rebind for the run
    for group in 0..3 {
        let mut sign = RenderInstance::new(sign_vb);
        sign.material = Some(Arc::clone(neon));
        sign.index_buffer = Some(IndexBufferBinding {
            buffer: sign_ib,
            group_index: group,
        });
        sign.world_transform = Mat4::new_translation(&Vec3::new(group as f32 * 2.0, 0.0, 0.0));
        sign.object_transform = sign.world_transform;
        manager.add_instance(sign);
    }

    // chrome hull with a cubemap material, two passes
    let mut hull = RenderInstance::new(hull_vb);
    hull.material = Some(Arc::clone(chrome));
    hull.index_buffer = Some(IndexBufferBinding {
        buffer: hull_ib,
        group_index: 0,
    });
    hull.object_transform = Mat4::new_translation(&Vec3::new(0.0, 4.0, -2.0));
    hull.world_transform = hull.object_transform;
    manager.add_instance(hull);

    // an instance that lost its material upstream; drawn via the fallback
    let mut stray = RenderInstance::new(hull_vb);
    stray.index_buffer = Some(IndexBufferBinding {
        buffer: hull_ib,
        group_index: 1,
    });
    manager.add_instance(stray);

    // dynamically lit: the glow pass skips it
    let mut torch = RenderInstance::new(sign_vb);
    torch.material = Some(Arc::clone(neon));
    torch.casts_dynamic_light = true;
    torch.index_buffer = Some(IndexBufferBinding {
        buffer: sign_ib,
        group_index: 3,
    });
    manager.add_instance(torch);
}

fn main() {
    env_logger::init();

    let settings = load_settings();
    let warning: MaterialRef = Arc::new(FixedPassMaterial::warning());
    let neon: MaterialRef = Arc::new(FixedPassMaterial::new("neon", 1));
    let chrome: MaterialRef = Arc::new(FixedPassMaterial::new("chrome", 2).with_cubemap());

    let mut manager = GlowRenderManager::with_settings(Arc::clone(&warning), &settings);
    let mut device = RecordingDevice::new();
    let mut target = match GlowBuffer::new((1280, 720), &settings) {
        Ok(target) => target,
        Err(err) => {
            log::error!("failed to create glow buffer: {err}");
            return;
        }
    };

    let scene = SceneState {
        camera_position: Vec3::new(0.0, -10.0, 3.0),
        fog: FogParams {
            texture: Some(TextureHandle(99)),
            height_offset: 40.0,
            inv_height_range: 1.0 / 120.0,
            visible_distance_mod: 1.0,
        },
    };

    for frame in 0..FRAMES {
        device.clear_calls();
        manager.clear();
        populate(&mut manager, &neon, &chrome);

        manager.render(&mut device, &scene, Some(&mut target));

        let stats = manager.frame_stats();
        log::info!(
            "frame {frame}: {} instances -> {} batches, {} passes, {} draws, \
             {}+{} rebinds ({} elided), {} device calls",
            manager.instance_count(),
            stats.batches,
            stats.passes,
            stats.draws,
            stats.vertex_rebinds,
            stats.index_rebinds,
            stats.rebind_elisions,
            device.calls().len(),
        );
        for call in device.calls() {
            log::trace!("  {call:?}");
        }
    }
}
