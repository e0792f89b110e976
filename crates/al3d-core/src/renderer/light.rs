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

//! Defines light types and their classification into per-type buckets.
//!
//! Lights live in the scene graph next to meshes. Once per "needs update" cycle
//! the renderer splits them into four ordered buckets (ambient, directional,
//! point, spot); the bucket sizes select which shader permutation every lit
//! mesh is drawn with.

use crate::math::{Color, MathError, Vec3};
use serde::{Deserialize, Serialize};

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    /// The constant term.
    pub constant: f32,
    /// The term proportional to distance.
    pub linear: f32,
    /// The term proportional to squared distance.
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.1,
            quadratic: 0.01,
        }
    }
}

impl Attenuation {
    /// The attenuation factor at `distance`.
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// The variant-specific part of a light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Constant light added to every lit surface.
    Ambient,
    /// Parallel rays coming from `position` towards the origin.
    Directional {
        /// The direction the light comes from, encoded as a position.
        position: Vec3,
    },
    /// Omni-directional light with distance falloff.
    Point {
        /// World-space position.
        position: Vec3,
        /// Distance falloff.
        attenuation: Attenuation,
    },
    /// A point light restricted to a cone.
    Spot {
        /// World-space position.
        position: Vec3,
        /// Distance falloff.
        attenuation: Attenuation,
        /// The axis of the cone, pointing away from the light.
        direction: Vec3,
        /// Cosine of the cone half-angle. Fragments outside receive nothing.
        cos_cutoff: f32,
        /// Falloff exponent applied to the cosine inside the cone.
        exponent: f32,
    },
}

/// A light source in the scene.
///
/// # Examples
///
/// ```
/// use al3d_core::math::{Color, Vec3};
/// use al3d_core::renderer::light::Light;
///
/// let sun = Light::directional(Vec3::new(1.0, 4.0, 2.0)).with_color(Color::from_argb_u32(0xFFFFEECC));
/// assert_eq!(sun.intensity, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Light color; alpha is ignored.
    pub color: Color,
    /// Multiplier applied to the color.
    pub intensity: f32,
    /// Variant-specific parameters.
    pub kind: LightKind,
}

impl Light {
    /// An ambient light of the given color.
    pub fn ambient(color: Color) -> Self {
        Self {
            color,
            intensity: 1.0,
            kind: LightKind::Ambient,
        }
    }

    /// A white directional light shining from `position`.
    pub fn directional(position: Vec3) -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            kind: LightKind::Directional { position },
        }
    }

    /// A white point light with default attenuation.
    pub fn point(position: Vec3) -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            kind: LightKind::Point {
                position,
                attenuation: Attenuation::default(),
            },
        }
    }

    /// A white spot light with default attenuation.
    ///
    /// The default cutoff cosine is `1.0`, i.e. a zero-width cone; set it with
    /// [`Light::with_cone`].
    pub fn spot(position: Vec3, direction: Vec3) -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            kind: LightKind::Spot {
                position,
                attenuation: Attenuation::default(),
                direction,
                cos_cutoff: 1.0,
                exponent: 1.0,
            },
        }
    }

    /// Replaces the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Replaces the intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Replaces the attenuation of point and spot lights; other kinds are returned unchanged.
    pub fn with_attenuation(mut self, value: Attenuation) -> Self {
        let light_type = self.light_type();
        match &mut self.kind {
            LightKind::Point { attenuation, .. } | LightKind::Spot { attenuation, .. } => {
                *attenuation = value;
            }
            _ => log::warn!("Light: attenuation ignored on a {light_type:?} light"),
        }
        self
    }

    /// Sets the cone of a spot light; other kinds are returned unchanged.
    pub fn with_cone(mut self, cutoff: f32, falloff: f32) -> Self {
        if let LightKind::Spot {
            cos_cutoff,
            exponent,
            ..
        } = &mut self.kind
        {
            *cos_cutoff = cutoff;
            *exponent = falloff;
        }
        self
    }

    /// The bucket this light is classified into.
    pub fn light_type(&self) -> LightType {
        match self.kind {
            LightKind::Ambient => LightType::Ambient,
            LightKind::Directional { .. } => LightType::Directional,
            LightKind::Point { .. } => LightType::Point,
            LightKind::Spot { .. } => LightType::Spot,
        }
    }

    /// The position of directional, point and spot lights.
    pub fn position(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Ambient => None,
            LightKind::Directional { position }
            | LightKind::Point { position, .. }
            | LightKind::Spot { position, .. } => Some(position),
        }
    }

    /// The unit direction the shaders normalize: the encoded position of a
    /// directional light, the cone axis of a spot.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DivisionByZero`] if that vector has zero length.
    pub fn unit_direction(&self) -> Result<Option<Vec3>, MathError> {
        match self.kind {
            LightKind::Directional { position } => position.try_normalize().map(Some),
            LightKind::Spot { direction, .. } => direction.try_normalize().map(Some),
            LightKind::Ambient | LightKind::Point { .. } => Ok(None),
        }
    }
}

/// The four light buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    /// See [`LightKind::Ambient`].
    Ambient,
    /// See [`LightKind::Directional`].
    Directional,
    /// See [`LightKind::Point`].
    Point,
    /// See [`LightKind::Spot`].
    Spot,
}

/// Number of lights in each bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LightCounts {
    /// Ambient lights.
    pub ambient: usize,
    /// Directional lights.
    pub directional: usize,
    /// Point lights.
    pub point: usize,
    /// Spot lights.
    pub spot: usize,
}

impl LightCounts {
    /// Total number of lights.
    pub fn total(&self) -> usize {
        self.ambient + self.directional + self.point + self.spot
    }
}

/// Lights partitioned by type, each bucket keeping the scene order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightBuckets {
    /// Ambient lights.
    pub ambient: Vec<Light>,
    /// Directional lights.
    pub directional: Vec<Light>,
    /// Point lights.
    pub point: Vec<Light>,
    /// Spot lights.
    pub spot: Vec<Light>,
}

impl LightBuckets {
    /// Splits `lights` into buckets, preserving relative order within each one.
    pub fn classify<'a>(lights: impl IntoIterator<Item = &'a Light>) -> Self {
        let mut buckets = Self::default();
        for light in lights {
            let bucket = match light.light_type() {
                LightType::Ambient => &mut buckets.ambient,
                LightType::Directional => &mut buckets.directional,
                LightType::Point => &mut buckets.point,
                LightType::Spot => &mut buckets.spot,
            };
            bucket.push(*light);
        }
        buckets
    }

    /// The size of each bucket.
    pub fn counts(&self) -> LightCounts {
        LightCounts {
            ambient: self.ambient.len(),
            directional: self.directional.len(),
            point: self.point.len(),
            spot: self.spot.len(),
        }
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_directions_are_rejected() {
        assert_eq!(
            Light::directional(Vec3::ZERO).unit_direction(),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            Light::spot(Vec3::Y, Vec3::ZERO).unit_direction(),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            Light::directional(Vec3::new(0.0, 2.0, 0.0)).unit_direction(),
            Ok(Some(Vec3::Y))
        );
        assert_eq!(Light::point(Vec3::ZERO).unit_direction(), Ok(None));
    }

    #[test]
    fn defaults_match_documented_values() {
        let point = Light::point(Vec3::ZERO);
        assert_eq!(point.color, Color::WHITE);
        assert_eq!(point.intensity, 1.0);
        match point.kind {
            LightKind::Point { attenuation, .. } => {
                assert_eq!(attenuation.constant, 1.0);
                assert_eq!(attenuation.linear, 0.1);
                assert_eq!(attenuation.quadratic, 0.01);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn attenuation_factor() {
        let att = Attenuation::default();
        assert_eq!(att.factor(0.0), 1.0);
        assert!((att.factor(10.0) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn classify_preserves_order_within_buckets() {
        let lights = [
            Light::point(Vec3::X),
            Light::ambient(Color::BLACK),
            Light::directional(Vec3::Y),
            Light::point(Vec3::Z),
            Light::spot(Vec3::ONE, -Vec3::Y),
        ];
        let buckets = LightBuckets::classify(&lights);
        assert_eq!(
            buckets.counts(),
            LightCounts {
                ambient: 1,
                directional: 1,
                point: 2,
                spot: 1
            }
        );
        assert_eq!(buckets.point[0].position(), Some(Vec3::X));
        assert_eq!(buckets.point[1].position(), Some(Vec3::Z));
        assert_eq!(buckets.ambient[0].position(), None);
    }

    #[test]
    fn cone_only_applies_to_spots() {
        let spot = Light::spot(Vec3::ZERO, -Vec3::Y).with_cone(0.8, 4.0);
        match spot.kind {
            LightKind::Spot {
                cos_cutoff,
                exponent,
                ..
            } => {
                assert_eq!(cos_cutoff, 0.8);
                assert_eq!(exponent, 4.0);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        let point = Light::point(Vec3::ZERO);
        assert_eq!(point.with_cone(0.8, 4.0), point);
    }
}
