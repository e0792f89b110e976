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

//! The axes a generated program varies along, and the key it is cached under.

use al3d_core::{
    asset::{MaterialVariant, Shading, Sides},
    renderer::{LightCounts, ProgramKey},
    scene::{FogMode, Mesh},
};
use std::fmt::Write;

/// Size of the spot light array every lit program declares.
///
/// Spot lights are uploaded into a fixed array and counted by
/// `uSpotLightCount`, so the spot count is not a permutation axis.
pub const MAX_SPOT_LIGHTS: usize = 4;

/// Everything the shader generator needs to know about a mesh and the lights around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderPermutation {
    /// The lighting model.
    pub variant: MaterialVariant,
    /// Where lighting is evaluated.
    pub shading: Shading,
    /// Whether back faces get their own lighting.
    pub sides: Sides,
    /// Whether a color map is assigned.
    pub has_texture: bool,
    /// Whether a specular map is assigned.
    pub has_specular_map: bool,
    /// Whether a normal map is assigned.
    pub has_normal_map: bool,
    /// The fog formula, if the mesh is fogged.
    pub fog: Option<FogMode>,
    /// Number of ambient lights.
    pub ambient: usize,
    /// Number of directional lights.
    pub directional: usize,
    /// Number of point lights.
    pub point: usize,
}

impl ShaderPermutation {
    /// Describes the program `mesh` needs under lights counted by `counts`.
    ///
    /// `counts.spot` is ignored; see [`MAX_SPOT_LIGHTS`].
    pub fn for_mesh(mesh: &Mesh, counts: LightCounts) -> Self {
        let material = &mesh.material;
        Self {
            variant: material.kind.variant(),
            shading: material.shading,
            sides: material.sides,
            has_texture: material.texture.is_some(),
            has_specular_map: material.specular_map.is_some(),
            has_normal_map: material.normal_map.is_some(),
            fog: mesh.fog().map(|fog| fog.mode()),
            ambient: counts.ambient,
            directional: counts.directional,
            point: counts.point,
        }
    }

    /// An unlit permutation with no maps and no fog.
    pub fn basic() -> Self {
        Self {
            variant: MaterialVariant::Basic,
            shading: Shading::default(),
            sides: Sides::default(),
            has_texture: false,
            has_specular_map: false,
            has_normal_map: false,
            fog: None,
            ambient: 0,
            directional: 0,
            point: 0,
        }
    }

    /// Whether the program accumulates lights at all.
    pub fn is_lit(&self) -> bool {
        self.variant != MaterialVariant::Basic
    }

    /// Whether lighting runs in the fragment stage. Toon always does.
    pub fn lights_per_fragment(&self) -> bool {
        self.variant == MaterialVariant::Toon || self.shading.is_per_fragment()
    }

    /// Whether the vertex stage reads the uv attribute.
    pub fn needs_uv(&self) -> bool {
        self.has_texture || self.has_specular_map || self.has_normal_map
    }

    /// Whether the normal map is actually applied. It needs screen-space
    /// derivatives, which only exist in the fragment stage.
    pub fn applies_normal_map(&self) -> bool {
        self.has_normal_map && self.is_lit() && self.lights_per_fragment()
    }

    /// The cache key.
    ///
    /// It is composed of the material tag, the shading digit (lit variants
    /// only), `TEXTURE`/`NOTEXTURE`, then `AL`, `DL` and `PL` followed by the
    /// ambient, directional and point counts. Sidedness, maps and fog are not
    /// encoded; programs differing only there share a key and are told apart
    /// by the cache.
    ///
    /// # Examples
    ///
    /// ```
    /// use al3d_core::asset::Material;
    /// use al3d_core::renderer::LightCounts;
    /// use al3d_core::scene::{primitives, Mesh};
    /// use al3d_lanes::render_lane::ShaderPermutation;
    ///
    /// let mesh = Mesh::new(primitives::cube(1.0), Material::lambert());
    /// let counts = LightCounts { directional: 1, ..Default::default() };
    /// let key = ShaderPermutation::for_mesh(&mesh, counts).cache_key();
    /// assert_eq!(key.as_str(), "LambertMaterial1NOTEXTUREAL0DL1PL0");
    /// ```
    pub fn cache_key(&self) -> ProgramKey {
        let mut key = String::with_capacity(40);
        key.push_str(self.variant.type_tag());
        if self.is_lit() {
            let _ = write!(key, "{}", self.shading.key_digit());
        }
        key.push_str(if self.has_texture { "TEXTURE" } else { "NOTEXTURE" });
        let _ = write!(
            key,
            "AL{}DL{}PL{}",
            self.ambient, self.directional, self.point
        );
        ProgramKey(key)
    }

    /// A short label for diagnostics.
    pub fn label(&self) -> String {
        let mut label = self.cache_key().0;
        if self.sides == Sides::TwoSide {
            label.push_str("+TWOSIDE");
        }
        if self.has_specular_map {
            label.push_str("+SPECMAP");
        }
        if self.has_normal_map {
            label.push_str("+NORMALMAP");
        }
        if let Some(fog) = self.fog {
            let _ = write!(label, "+FOG{fog:?}");
        }
        label
    }
}
