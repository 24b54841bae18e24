//! Glow pass configuration
//!
//! Settings cover the pieces an integrator actually tunes: whether the pass
//! is on at all, how much smaller the offscreen buffer is than the screen,
//! and the shading-capability gate. Defaults match the constants the pass
//! shipped with; a missing file or field is not an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file was not valid TOML
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Tunable glow-pass settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowSettings {
    /// Whether the glow buffer starts enabled
    pub enabled: bool,
    /// Screen-extent divisor for the offscreen buffer
    pub buffer_divisor: u32,
    /// Minimum programmable-shading capability for the pass to run
    pub pixel_shader_threshold: f32,
}

impl Default for GlowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            buffer_divisor: 2,
            pixel_shader_threshold: 0.001,
        }
    }
}

impl GlowSettings {
    /// Load settings from a TOML file.
    pub fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        toml::from_str(contents).map_err(|e| SettingsError::Parse(e.to_string()))
    }
}
