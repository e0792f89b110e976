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

//! CPU-side texture payloads and sampling options.

use super::{TextureFilter, TextureWrap};
use serde::{Deserialize, Serialize};

/// Sampling parameters chosen when a texture is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureOptions {
    /// Minification and magnification filter.
    pub filter: TextureFilter,
    /// Addressing mode on both axes.
    pub wrap: TextureWrap,
    /// Whether to build a mip chain after upload.
    pub generate_mipmaps: bool,
    /// Whether rows are flipped vertically on upload.
    pub flip_y: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            filter: TextureFilter::Linear,
            wrap: TextureWrap::Repeat,
            generate_mipmaps: true,
            flip_y: true,
        }
    }
}

/// Tightly packed RGBA8 pixels, row by row starting at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Wraps RGBA8 pixels, returning `None` if the buffer length does not match the size.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single opaque texel of the given color, handy as a placeholder.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// The six faces of a cube map, in `+X, -X, +Y, -Y, +Z, -Z` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeTextureData {
    /// Face payloads in `+X, -X, +Y, -Y, +Z, -Z` order.
    pub faces: [TextureData; 6],
}
