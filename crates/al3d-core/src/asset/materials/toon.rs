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

use crate::asset::Texture;
use crate::math::Color;
use crate::renderer::{TextureData, TextureFilter, TextureOptions, TextureWrap};

/// The quantization bands of a toon material, darkest first.
///
/// The bands become a `levels x 1` RGBA texture sampled with nearest filtering,
/// so a lighting term in `[0, 1]` maps to exactly one band.
#[derive(Debug, Clone, PartialEq)]
pub struct ToonRamp {
    levels: Vec<Color>,
}

impl Default for ToonRamp {
    /// Four gray bands: `0x44`, `0x88`, `0xCC`, `0xFF`.
    fn default() -> Self {
        Self::from_argb(&[0xFF444444, 0xFF888888, 0xFFCCCCCC, 0xFFFFFFFF])
    }
}

impl ToonRamp {
    /// Builds a ramp from `0xAARRGGBB` band colors. An empty list yields the default ramp.
    pub fn from_argb(levels: &[u32]) -> Self {
        if levels.is_empty() {
            return Self::default();
        }
        Self {
            levels: levels.iter().copied().map(Color::from_argb_u32).collect(),
        }
    }

    /// The band colors, darkest first.
    pub fn levels(&self) -> &[Color] {
        &self.levels
    }

    /// The ramp as RGBA8 pixels, one texel per band.
    pub fn to_texture_data(&self) -> TextureData {
        let pixels = self
            .levels
            .iter()
            .flat_map(|c| {
                let argb = c.to_argb_u32();
                [
                    (argb >> 16) as u8,
                    (argb >> 8) as u8,
                    argb as u8,
                    (argb >> 24) as u8,
                ]
            })
            .collect();
        TextureData {
            width: self.levels.len() as u32,
            height: 1,
            pixels,
        }
    }

    /// The ramp as a texture ready for upload.
    pub fn to_texture(&self) -> Texture {
        Texture::from_data(
            self.to_texture_data(),
            TextureOptions {
                filter: TextureFilter::Nearest,
                wrap: TextureWrap::ClampToEdge,
                generate_mipmaps: false,
                flip_y: false,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ramp_has_four_gray_levels() {
        let data = ToonRamp::default().to_texture_data();
        assert_eq!(data.width, 4);
        assert_eq!(data.height, 1);
        assert_eq!(
            data.pixels,
            vec![
                0x44, 0x44, 0x44, 0xFF, 0x88, 0x88, 0x88, 0xFF, 0xCC, 0xCC, 0xCC, 0xFF, 0xFF, 0xFF,
                0xFF, 0xFF
            ]
        );
    }

    #[test]
    fn custom_levels_replace_defaults() {
        let ramp = ToonRamp::from_argb(&[0xFF000000, 0xFFFF0000]);
        assert_eq!(ramp.levels().len(), 2);
        assert_eq!(ramp.to_texture_data().pixels[4..8], [0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(ToonRamp::from_argb(&[]), ToonRamp::default());
    }
}
