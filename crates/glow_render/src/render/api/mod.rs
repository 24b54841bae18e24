//! Backend abstraction for the glow pass
//!
//! This module defines the trait a graphics backend must implement for the
//! batch submission loop to drive it, along with the opaque resource handles
//! and fixed-function state enums that cross that boundary.

pub mod recording;

mod device;

pub use device::{
    CubemapHandle, CullMode, GpuDevice, IndexBufferHandle, RectI, TextureAddressMode,
    TextureFilter, TextureHandle, VertexBufferHandle, TEXTURE_STAGE_COUNT,
};
