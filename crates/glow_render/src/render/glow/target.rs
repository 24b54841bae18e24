//! Offscreen glow target
//!
//! The target controller owns the accumulation surface and how it gets back
//! onto the screen. It never touches the render-target or matrix stacks; the
//! submission loop owns that pairing and calls [`GlowTarget::activate`] /
//! [`GlowTarget::resolve`] strictly between its own push and pop.

use thiserror::Error;

use crate::render::api::{GpuDevice, RectI, TextureHandle};
use crate::settings::GlowSettings;

/// Errors raised while constructing a glow buffer
///
/// Construction is the only fallible edge of the target; the per-frame
/// render path never returns errors.
#[derive(Error, Debug)]
pub enum GlowTargetError {
    /// The configured extent divisor was zero
    #[error("glow buffer divisor must be non-zero")]
    ZeroDivisor,

    /// The derived buffer extent collapsed to zero pixels
    #[error("glow buffer extent {width}x{height} is degenerate")]
    DegenerateExtent {
        /// Derived buffer width
        width: u32,
        /// Derived buffer height
        height: u32,
    },
}

/// Offscreen accumulation surface for the glow pass
pub trait GlowTarget {
    /// Whether the target exists and is not administratively disabled.
    fn is_enabled(&self) -> bool;

    /// Make the target the current render destination.
    ///
    /// The caller has already pushed the render-target stack.
    fn activate(&mut self, device: &mut dyn GpuDevice);

    /// Composite the accumulated contents onto `viewport`.
    ///
    /// The caller has already popped the render-target stack, so the
    /// composite lands on the previously active surface.
    fn resolve(&mut self, device: &mut dyn GpuDevice, viewport: RectI);
}

/// Reference glow buffer implementation
///
/// Holds a backend surface handle at a divisor of the screen extent and an
/// administrative disable toggle mirroring a user preference.
#[derive(Debug)]
pub struct GlowBuffer {
    surface: TextureHandle,
    extent: (u32, u32),
    disabled: bool,
}

impl GlowBuffer {
    /// Create a glow buffer sized from `screen_extent` and the settings'
    /// divisor.
    pub fn new(screen_extent: (u32, u32), settings: &GlowSettings) -> Result<Self, GlowTargetError> {
        if settings.buffer_divisor == 0 {
            return Err(GlowTargetError::ZeroDivisor);
        }
        let width = screen_extent.0 / settings.buffer_divisor;
        let height = screen_extent.1 / settings.buffer_divisor;
        if width == 0 || height == 0 {
            return Err(GlowTargetError::DegenerateExtent { width, height });
        }
        Ok(Self {
            // surface allocation is the backend's business; the handle value
            // here stands in for whatever it returned
            surface: TextureHandle((u64::from(width) << 32) | u64::from(height)),
            extent: (width, height),
            disabled: !settings.enabled,
        })
    }

    /// Buffer extent in pixels.
    pub fn extent(&self) -> (u32, u32) {
        self.extent
    }

    /// Backend surface handle.
    pub fn surface(&self) -> TextureHandle {
        self.surface
    }

    /// Administratively enable or disable the buffer.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

impl GlowTarget for GlowBuffer {
    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn activate(&mut self, device: &mut dyn GpuDevice) {
        device.set_render_target(self.surface);
    }

    fn resolve(&mut self, device: &mut dyn GpuDevice, viewport: RectI) {
        device.composite_to_screen(self.surface, viewport);
    }
}
