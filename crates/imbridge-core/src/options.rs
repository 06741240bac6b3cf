//! Configuration options for the bridge.

use serde::{Deserialize, Serialize};

/// GLSL header used when none is configured.
pub const DEFAULT_GLSL_VERSION: &str = "#version 330 core";

/// Delta time reported on the first frame, before the clock has a reference point.
pub const DEFAULT_DELTA_TIME: f32 = 1.0 / 60.0;

/// Options applied once when the bridge is initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// `#version` line prepended to both UI shaders.
    pub glsl_version: String,

    /// Delta time used on the first frame.
    pub fallback_delta_time: f32,

    /// Whether the bridge creates platform cursors and drives the cursor shape.
    pub mouse_cursors: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            glsl_version: DEFAULT_GLSL_VERSION.to_string(),
            fallback_delta_time: DEFAULT_DELTA_TIME,
            mouse_cursors: true,
        }
    }
}

impl BridgeOptions {
    /// Sets the GLSL version header.
    #[must_use]
    pub fn with_glsl_version(mut self, version: impl Into<String>) -> Self {
        self.glsl_version = version.into();
        self
    }

    /// Enables or disables cursor shape handling.
    #[must_use]
    pub fn with_mouse_cursors(mut self, enabled: bool) -> Self {
        self.mouse_cursors = enabled;
        self
    }
}
