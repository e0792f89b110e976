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

use crate::math::{degrees_to_radians, Mat4, Vec3};

/// Position, orientation and scale of a scene object.
///
/// The orientation is a set of Euler angles in **degrees**. Note the default
/// scale is `(0.5, 0.5, 0.5)`, not one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object3D {
    /// World-space position.
    pub position: Vec3,
    /// Rotation around X, Y and Z, in degrees.
    pub orientation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Vec3::ZERO,
            scale: Vec3::new(0.5, 0.5, 0.5),
        }
    }
}

impl Object3D {
    /// An object at `position` with default orientation and scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// The model matrix: `rotation * scale`, with the position written straight
    /// into the translation column instead of multiplied in.
    pub fn transform(&self) -> Mat4 {
        let mut rotation = Mat4::IDENTITY;
        rotation.rotate(Vec3::new(
            degrees_to_radians(self.orientation.x),
            degrees_to_radians(self.orientation.y),
            degrees_to_radians(self.orientation.z),
        ));
        let mut transform = rotation * Mat4::from_scale(self.scale);
        transform.set_translation(self.position);
        transform
    }

    /// Whether the scale differs from `(1, 1, 1)`, in which case normals need
    /// the inverse-transpose normal matrix.
    pub fn has_non_unit_scale(&self) -> bool {
        self.scale != Vec3::ONE
    }

    /// Adds `delta` degrees to the orientation.
    pub fn rotate_by(&mut self, delta: Vec3) {
        self.orientation = self.orientation + delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_scale_is_half() {
        let object = Object3D::default();
        assert_eq!(object.scale, Vec3::new(0.5, 0.5, 0.5));
        assert!(object.has_non_unit_scale());
    }

    #[test]
    fn transform_patches_translation() {
        let object = Object3D {
            position: Vec3::new(1.0, 2.0, 3.0),
            orientation: Vec3::new(0.0, 90.0, 0.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let m = object.transform();
        assert_eq!(m.translation(), Vec3::new(1.0, 2.0, 3.0));
        // +X rotated 90 degrees around Y lands on -Z, then scaled by 2.
        assert_abs_diff_eq!(
            m.multiply_by_vector(Vec3::X),
            Vec3::new(1.0, 2.0, 1.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn rotate_by_accumulates_degrees() {
        let mut object = Object3D::default();
        object.rotate_by(Vec3::new(0.0, 45.0, 0.0));
        object.rotate_by(Vec3::new(10.0, 45.0, 0.0));
        assert_eq!(object.orientation, Vec3::new(10.0, 90.0, 0.0));
    }
}
