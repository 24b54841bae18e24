//! # Glow Render
//!
//! A batched glow-pass rendering manager with a backend-agnostic GPU device
//! interface.
//!
//! The crate draws a per-frame list of "glow contributor" instances into a
//! dedicated offscreen target, grouping contiguous same-material runs so that
//! material setup, shader-constant uploads, and vertex/index buffer rebinds
//! happen as rarely as possible. The result is composited back onto the
//! visible surface by the offscreen target controller.
//!
//! ## Architecture
//!
//! - **[`GlowRenderManager`]**: accumulates instances and runs the batch
//!   submission loop once per frame
//! - **[`GpuDevice`]**: trait boundary over the graphics backend (state
//!   setters, constant uploads, buffer binds, draw submission)
//! - **[`MaterialInstance`]**: material pass protocol (`begin_passes` /
//!   `setup_next`) driven once per contiguous batch
//! - **[`GlowTarget`]**: offscreen accumulation surface with
//!   activate/resolve semantics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glow_render::prelude::*;
//!
//! let warning = Arc::new(FixedPassMaterial::warning());
//! let mut manager = GlowRenderManager::new(warning);
//! let mut device = RecordingDevice::new();
//! let scene = SceneState::default();
//! let settings = GlowSettings::default();
//! let mut target = GlowBuffer::new((1280, 720), &settings).unwrap();
//!
//! // instances are populated upstream each frame
//! manager.render(&mut device, &scene, Some(&mut target));
//! manager.clear();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod render;
pub mod settings;

pub use settings::{GlowSettings, SettingsError};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        foundation::math::{Mat4, Point3, Vec3},
        render::{
            api::{
                recording::{DeviceCall, RecordingDevice},
                CullMode, GpuDevice, IndexBufferHandle, RectI, TextureAddressMode,
                TextureFilter, TextureHandle, VertexBufferHandle,
            },
            context::ShadingContext,
            glow::{GlowBuffer, GlowRenderManager, GlowTarget},
            instance::{IndexBufferBinding, RenderInstance},
            lighting::LightDescriptor,
            materials::{FixedPassMaterial, MaterialInstance, MaterialPasses, MaterialRef},
            scene::{FogParams, SceneState},
        },
        settings::GlowSettings,
    };
}
