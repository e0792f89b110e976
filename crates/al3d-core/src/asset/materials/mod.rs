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

//! Defines the material variants and the surface properties they carry.
//!
//! A [`Material`] pairs a variant ([`MaterialKind`]) with the properties every
//! variant shares: diffuse color, interpolation mode, sidedness and optional
//! color / specular / normal maps. The variant, the interpolation mode and the
//! presence of a color map select the shader permutation.

mod shading;
mod toon;

pub use shading::*;
pub use toon::*;

use super::Texture;
use crate::math::Color;

/// Specular parameters of the Phong and Blinn variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Specular {
    /// Specular highlight color.
    pub color: Color,
    /// Highlight exponent, used when no specular map is bound.
    pub shininess: f32,
}

impl Default for Specular {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            shininess: 1.0,
        }
    }
}

/// The lighting model of a material, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialVariant {
    /// See [`MaterialKind::Basic`].
    Basic,
    /// See [`MaterialKind::Lambert`].
    Lambert,
    /// See [`MaterialKind::Phong`].
    Phong,
    /// See [`MaterialKind::Blinn`].
    Blinn,
    /// See [`MaterialKind::Toon`].
    Toon,
}

impl MaterialVariant {
    /// The tag that opens every program key built for this variant.
    pub fn type_tag(self) -> &'static str {
        match self {
            MaterialVariant::Basic => "BasicMaterial",
            MaterialVariant::Lambert => "LambertMaterial",
            MaterialVariant::Phong => "PhongMaterial",
            MaterialVariant::Blinn => "BlinnMaterial",
            MaterialVariant::Toon => "ToonMaterial",
        }
    }

    /// Whether the variant carries a specular term.
    pub fn has_specular(self) -> bool {
        matches!(self, MaterialVariant::Phong | MaterialVariant::Blinn)
    }
}

/// The lighting model of a material.
#[derive(Debug, Clone)]
pub enum MaterialKind {
    /// Unlit: diffuse color or color map only.
    Basic,
    /// Diffuse-only lighting.
    Lambert,
    /// Diffuse plus reflection-vector specular.
    Phong(Specular),
    /// Diffuse plus half-vector specular.
    Blinn(Specular),
    /// Lighting quantized through a ramp texture.
    Toon {
        /// The quantization bands.
        ramp: ToonRamp,
        /// The ramp uploaded as a texture, bound to unit 1.
        ramp_texture: Texture,
    },
}

impl MaterialKind {
    /// The parameter-free variant.
    pub fn variant(&self) -> MaterialVariant {
        match self {
            MaterialKind::Basic => MaterialVariant::Basic,
            MaterialKind::Lambert => MaterialVariant::Lambert,
            MaterialKind::Phong(_) => MaterialVariant::Phong,
            MaterialKind::Blinn(_) => MaterialVariant::Blinn,
            MaterialKind::Toon { .. } => MaterialVariant::Toon,
        }
    }

    /// The tag that opens every program key built for this variant.
    pub fn type_tag(&self) -> &'static str {
        self.variant().type_tag()
    }

    /// The specular parameters of Phong and Blinn materials.
    pub fn specular(&self) -> Option<&Specular> {
        match self {
            MaterialKind::Phong(s) | MaterialKind::Blinn(s) => Some(s),
            _ => None,
        }
    }
}

/// The surface description attached to a mesh.
///
/// # Examples
///
/// ```
/// use al3d_core::asset::{Material, Shading, Sides};
/// use al3d_core::math::Color;
///
/// let glass = Material::phong()
///     .with_diffuse(Color::from_argb_u32(0x8066AAFF))
///     .with_shading(Shading::Phong)
///     .with_sides(Sides::TwoSide);
/// assert!(glass.is_translucent());
/// ```
#[derive(Debug, Clone)]
pub struct Material {
    /// The lighting model.
    pub kind: MaterialKind,
    /// Diffuse color. Its alpha decides whether the mesh is blended.
    pub diffuse: Color,
    /// Where lighting is evaluated. Ignored by [`MaterialKind::Basic`].
    pub shading: Shading,
    /// Which faces are lit. Ignored by [`MaterialKind::Basic`].
    pub sides: Sides,
    /// Color map, sampled with the mesh uvs on texture unit 0.
    pub texture: Option<Texture>,
    /// Specular map on unit 1; its red channel encodes shininess / 255.
    pub specular_map: Option<Texture>,
    /// Tangent-space normal map on unit 2.
    pub normal_map: Option<Texture>,
}

impl Material {
    fn with_kind(kind: MaterialKind, diffuse: Color) -> Self {
        Self {
            kind,
            diffuse,
            shading: Shading::default(),
            sides: Sides::default(),
            texture: None,
            specular_map: None,
            normal_map: None,
        }
    }

    /// An unlit material, light gray (`0xFFCCCCCC`) by default.
    pub fn basic() -> Self {
        Self::with_kind(MaterialKind::Basic, Color::from_argb_u32(0xFFCCCCCC))
    }

    /// A diffuse-only material, white by default.
    pub fn lambert() -> Self {
        Self::with_kind(MaterialKind::Lambert, Color::WHITE)
    }

    /// A Phong material with white specular and shininess 1.
    pub fn phong() -> Self {
        Self::with_kind(MaterialKind::Phong(Specular::default()), Color::WHITE)
    }

    /// A Blinn-Phong material with white specular and shininess 1.
    pub fn blinn() -> Self {
        Self::with_kind(MaterialKind::Blinn(Specular::default()), Color::WHITE)
    }

    /// A toon material with the given ramp.
    pub fn toon(ramp: ToonRamp) -> Self {
        let ramp_texture = ramp.to_texture();
        Self::with_kind(MaterialKind::Toon { ramp, ramp_texture }, Color::WHITE)
    }

    /// Replaces the diffuse color.
    pub fn with_diffuse(mut self, color: Color) -> Self {
        self.diffuse = color;
        self
    }

    /// Replaces the interpolation mode.
    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    /// Replaces the sidedness.
    pub fn with_sides(mut self, sides: Sides) -> Self {
        self.sides = sides;
        self
    }

    /// Replaces the specular parameters of Phong and Blinn materials.
    pub fn with_specular(mut self, color: Color, shininess: f32) -> Self {
        match &mut self.kind {
            MaterialKind::Phong(s) | MaterialKind::Blinn(s) => {
                *s = Specular { color, shininess };
            }
            other => log::warn!(
                "Material: specular ignored on {}",
                other.type_tag()
            ),
        }
        self
    }

    /// Attaches a color map.
    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Attaches a specular map.
    pub fn with_specular_map(mut self, texture: Texture) -> Self {
        self.specular_map = Some(texture);
        self
    }

    /// Attaches a normal map.
    pub fn with_normal_map(mut self, texture: Texture) -> Self {
        self.normal_map = Some(texture);
        self
    }

    /// Whether lights affect this material.
    pub fn is_lit(&self) -> bool {
        !matches!(self.kind, MaterialKind::Basic)
    }

    /// Whether the diffuse alpha requires blending and back-to-front sorting.
    pub fn is_translucent(&self) -> bool {
        self.diffuse.is_translucent()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::basic()
    }
}
