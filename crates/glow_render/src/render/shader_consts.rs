//! Vertex-shader constant slot assignments
//!
//! The shaders driven by the glow pass expect their per-draw inputs at fixed
//! constant slots. Row counts are part of the contract: transforms occupy
//! four rows, cube transforms three (orientation only), vectors one.

/// World transform, 4 rows
pub const VC_WORLD_TRANS: u32 = 0;

/// Transposed object transform, 4 rows
pub const VC_OBJ_TRANS: u32 = 4;

/// Primary light direction in object space, 1 row
pub const VC_LIGHT_DIR1: u32 = 8;

/// Eye position in object space, 1 row
pub const VC_EYE_POS: u32 = 9;

/// Cube transform (orientation only, transposed), 3 rows
pub const VC_CUBE_TRANS: u32 = 10;

/// Eye position relative to the object's world position, 1 row
pub const VC_CUBE_EYE_POS: u32 = 13;
