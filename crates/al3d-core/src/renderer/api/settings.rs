// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Renderer configuration and per-frame statistics.

use crate::math::Color;
use serde::{Deserialize, Deserializer, Serialize};

/// Largest picking id; ids are read back from the 24 RGB bits of one pixel.
pub const MAX_PICK_ID: u32 = 0x00FF_FFFF;

/// Settings the renderer is created with.
///
/// Every field has a default, so a JSON document only needs the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Color the frame is cleared to.
    pub clear_color: Color,
    /// Depth the frame is cleared to.
    pub clear_depth: f32,
    /// Gap between two consecutive picking ids, in `1..=MAX_PICK_ID`.
    ///
    /// Larger strides leave fewer ids: at most `MAX_PICK_ID / stride` meshes can be picked.
    #[serde(deserialize_with = "deserialize_pick_stride")]
    pub pick_id_stride: u32,
}

fn deserialize_pick_stride<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let stride = u32::deserialize(deserializer)?;
    if stride == 0 || stride > MAX_PICK_ID {
        return Err(serde::de::Error::custom(format!(
            "pick_id_stride {stride} is outside 1..={MAX_PICK_ID}"
        )));
    }
    Ok(stride)
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            clear_color: Color::BLACK,
            clear_depth: 1.0,
            pick_id_stride: 100,
        }
    }
}

impl RendererConfig {
    /// Convenience constructor for a viewport size with every other setting at its default.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Width over height, used by cameras that follow the viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// What happened during one call to `Renderer::render`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls issued, including skybox, picking and postprocess passes.
    pub draw_calls: u32,
    /// Meshes drawn in the main pass.
    pub meshes_drawn: u32,
    /// Programs compiled and linked this frame (cache misses).
    pub programs_built: u32,
    /// Whether a pick pass ran.
    pub picked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.clear_color, Color::BLACK);
        assert_eq!(config.pick_id_stride, 100);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RendererConfig::from_json_str(r#"{ "width": 1024, "height": 768 }"#)
            .expect("valid json");
        assert_eq!(config.width, 1024);
        assert_eq!(config.clear_depth, 1.0);
        assert!((config.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn bad_json_is_rejected() {
        assert!(RendererConfig::from_json_str(r#"{ "width": "wide" }"#).is_err());
    }

    #[test]
    fn pick_stride_must_fit_in_rgb() {
        assert!(RendererConfig::from_json_str(r#"{ "pick_id_stride": 0 }"#).is_err());
        assert!(RendererConfig::from_json_str(r#"{ "pick_id_stride": 16777216 }"#).is_err());
        let config = RendererConfig::from_json_str(r#"{ "pick_id_stride": 16777215 }"#)
            .expect("largest stride");
        assert_eq!(config.pick_id_stride, MAX_PICK_ID);
    }
}
