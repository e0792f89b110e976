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

//! Defines the `Color` type used for material, light, fog and clear colors.

use crate::math::vector::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// An RGBA color with normalized `f32` components.
///
/// Colors are authored as packed `0xAARRGGBB` integers (see
/// [`Color::from_argb_u32`]) and uploaded as-is; no gamma conversion happens.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Color {
    /// The red component.
    pub r: f32,
    /// The green component.
    pub g: f32,
    /// The blue component.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `Color` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `Color` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Unpacks a `0xAARRGGBB` integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use al3d_core::math::Color;
    /// let c = Color::from_argb_u32(0x80FF0000);
    /// assert_eq!(c.r, 1.0);
    /// assert_eq!(c.g, 0.0);
    /// assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    /// ```
    pub fn from_argb_u32(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xFF) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0), channel(24))
    }

    /// Packs the color back into `0xAARRGGBB`, rounding each channel.
    pub fn to_argb_u32(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.a) << 24) | (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Returns a copy with a different alpha.
    #[inline]
    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    /// Whether the color is not fully opaque, i.e. needs blending.
    #[inline]
    pub fn is_translucent(&self) -> bool {
        self.a != 1.0
    }

    /// The color as a [`Vec4`] in `(r, g, b, a)` order.
    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    /// The RGB channels as a [`Vec3`].
    #[inline]
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// The color as an array, suitable for clear calls and uniform uploads.
    #[inline]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    /// Opaque white.
    #[inline]
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self::from_argb_u32(argb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_argb_unpacking_order() {
        let c = Color::from_argb_u32(0xFF336699);
        assert!(approx_eq(c.a, 1.0));
        assert!(approx_eq(c.r, 0x33 as f32 / 255.0));
        assert!(approx_eq(c.g, 0x66 as f32 / 255.0));
        assert!(approx_eq(c.b, 0x99 as f32 / 255.0));
    }

    #[test]
    fn test_argb_round_trip() {
        for packed in [0xFFCCCCCC, 0x00000000, 0x7F102030, 0xFFFFFFFF] {
            assert_eq!(Color::from_argb_u32(packed).to_argb_u32(), packed);
        }
    }

    #[test]
    fn test_translucency() {
        assert!(!Color::WHITE.is_translucent());
        assert!(Color::WHITE.with_alpha(0.5).is_translucent());
        assert!(Color::from(0x00FFFFFF).is_translucent());
    }
}
