//! # Rendering System
//!
//! The glow-pass rendering domain: the GPU device abstraction, the material
//! pass protocol, the drawable-instance data model, and the batch submission
//! manager itself.
//!
//! ## Architecture
//!
//! The system is designed with clear separation of concerns:
//! - **[`api`]**: backend-agnostic device boundary (state setters, constant
//!   uploads, buffer binds, draw submission)
//! - **[`materials`]**: material pass protocol driven per batch
//! - **[`glow`]**: the batch submission loop and the offscreen target
//!   controller
//! - **[`context`]** / **[`scene`]**: explicit per-batch and per-frame state
//!   snapshots, so the core runs against synthetic scenes in tests
//!
//! ## Design Goals
//!
//! - **API Agnostic**: nothing here names a concrete graphics backend
//! - **Library-First**: usable as a standalone pass manager, not tied to a
//!   specific engine loop
//! - **Deterministic**: draw order follows the caller's list order; batching
//!   only elides redundant state transitions, never reorders

pub mod api;
pub mod context;
pub mod glow;
pub mod instance;
pub mod lighting;
pub mod materials;
pub mod scene;
pub mod shader_consts;

pub use api::{
    CubemapHandle, CullMode, GpuDevice, IndexBufferHandle, RectI, TextureAddressMode,
    TextureFilter, TextureHandle, VertexBufferHandle,
};
pub use context::ShadingContext;
pub use glow::{GlowBuffer, GlowFrameStats, GlowRenderManager, GlowTarget, GlowTargetError};
pub use instance::{IndexBufferBinding, RenderInstance};
pub use lighting::LightDescriptor;
pub use materials::{FixedPassMaterial, MaterialInstance, MaterialPasses, MaterialRef};
pub use scene::{FogParams, SceneState};
