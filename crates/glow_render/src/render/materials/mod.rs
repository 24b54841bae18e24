//! Material pass protocol
//!
//! A material configures the device for one or more rendering passes. The
//! glow pass drives that through an explicit iterator shape: ask the material
//! to [`begin_passes`](MaterialInstance::begin_passes), then call
//! [`setup_next`](MaterialPasses::setup_next) until it reports no pass was
//! configured. Pass count and ordering are entirely the material's business;
//! the submission loop only re-walks its instance run once per configured
//! pass.
//!
//! Batching compares materials by reference identity, never by value: two
//! materials with identical parameters but distinct instances are distinct
//! batches.

use std::sync::Arc;

use crate::render::api::GpuDevice;
use crate::render::context::ShadingContext;

/// Shared reference to a material instance
pub type MaterialRef = Arc<dyn MaterialInstance>;

/// A resolved, drawable-specific shading configuration
pub trait MaterialInstance: Send + Sync {
    /// Begin the material's pass sequence for one batch.
    fn begin_passes(&self) -> Box<dyn MaterialPasses + '_>;

    /// Whether the material samples a cubemap and needs cube-space constants.
    fn has_cubemap(&self) -> bool;

    /// Debug name for log output.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// In-flight pass sequence for one material and one batch
pub trait MaterialPasses {
    /// Configure the next pass on `device` using `context`.
    ///
    /// Returns `true` while a pass was configured; `false` ends the
    /// sequence.
    fn setup_next(&mut self, device: &mut dyn GpuDevice, context: &ShadingContext) -> bool;
}

/// Reference-identity comparison for material batching.
///
/// Compares the addresses of the underlying material objects, ignoring
/// vtable identity. Value equality is deliberately not consulted.
pub fn same_material(a: &MaterialRef, b: &MaterialRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// A material with a fixed number of passes
///
/// Reference implementation used by the demo application and the test
/// suites; real engines supply their own [`MaterialInstance`] types. The
/// warning variant is the process-wide fallback substituted for instances
/// that arrive without a material bound.
#[derive(Debug)]
pub struct FixedPassMaterial {
    name: String,
    pass_count: u32,
    cubemap: bool,
}

impl FixedPassMaterial {
    /// Create a material that configures `pass_count` passes.
    pub fn new(name: impl Into<String>, pass_count: u32) -> Self {
        Self {
            name: name.into(),
            pass_count,
            cubemap: false,
        }
    }

    /// Mark the material as sampling a cubemap.
    pub fn with_cubemap(mut self) -> Self {
        self.cubemap = true;
        self
    }

    /// The single-pass fallback material for unbound instances.
    pub fn warning() -> Self {
        Self::new("warning", 1)
    }
}

impl MaterialInstance for FixedPassMaterial {
    fn begin_passes(&self) -> Box<dyn MaterialPasses + '_> {
        Box::new(FixedPassSequence {
            material: self,
            remaining: self.pass_count,
        })
    }

    fn has_cubemap(&self) -> bool {
        self.cubemap
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct FixedPassSequence<'a> {
    material: &'a FixedPassMaterial,
    remaining: u32,
}

impl MaterialPasses for FixedPassSequence<'_> {
    fn setup_next(&mut self, _device: &mut dyn GpuDevice, context: &ShadingContext) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        log::trace!(
            "material '{}' pass {} of {} (glow={})",
            self.material.name,
            self.material.pass_count - self.remaining,
            self.material.pass_count,
            context.glow_pass
        );
        true
    }
}
