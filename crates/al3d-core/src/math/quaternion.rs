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

//! Provides a Quaternion type for representing 3D rotations.

use super::{degrees_to_radians, radians_to_degrees, Mat4, Vec3, Vec4, EPSILON};
use serde::{Deserialize, Serialize};
use std::ops::{Mul, MulAssign};

/// Represents a 3D rotation using a unit quaternion.
///
/// The components are stored in `(x, y, z, w)` order, where `(x, y, z)` is the
/// vector part and `w` is the scalar part. The default value is the identity
/// rotation `(0, 0, 0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from raw components.
    ///
    /// Note: this does not normalize. Prefer [`Quaternion::from_axis_angle`] or
    /// [`Quaternion::from_euler_degrees`] to build rotations.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion rotating `angle_radians` around `axis`.
    ///
    /// A zero-length axis has no rotation and yields [`Quaternion::IDENTITY`].
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let Ok(normalized_axis) = axis.try_normalize() else {
            return Self::IDENTITY;
        };
        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        Self {
            x: normalized_axis.x * s,
            y: normalized_axis.y * s,
            z: normalized_axis.z * s,
            w: c,
        }
    }

    /// Builds a rotation from Euler angles given in degrees.
    ///
    /// `angles.x` is the pitch (around X), `angles.y` the yaw (around Y) and
    /// `angles.z` the roll (around Z). The result is composed as `qY * qX * qZ`.
    pub fn from_euler_degrees(angles: Vec3) -> Self {
        let q_x = Self::from_axis_angle(Vec3::X, degrees_to_radians(angles.x));
        let q_y = Self::from_axis_angle(Vec3::Y, degrees_to_radians(angles.y));
        let q_z = Self::from_axis_angle(Vec3::Z, degrees_to_radians(angles.z));
        q_y * q_x * q_z
    }

    /// Recovers the `(pitch, yaw, roll)` Euler angles in degrees, inverting
    /// [`Quaternion::from_euler_degrees`].
    ///
    /// At a pitch of exactly +/-90 degrees yaw and roll are not separable; the
    /// returned decomposition is then one of the valid solutions.
    pub fn to_euler_degrees(&self) -> Vec3 {
        let q = self.normalize();
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);

        // Row 1, column 2 of the rotation matrix is -sin(pitch) for Y*X*Z order.
        let m12 = 2.0 * (y * z - w * x);
        let pitch = (-m12).clamp(-1.0, 1.0).asin();

        let m02 = 2.0 * (x * z + w * y);
        let m22 = 1.0 - 2.0 * (x * x + y * y);
        let m10 = 2.0 * (x * y + w * z);
        let m11 = 1.0 - 2.0 * (x * x + z * z);

        Vec3::new(
            radians_to_degrees(pitch),
            radians_to_degrees(m02.atan2(m22)),
            radians_to_degrees(m10.atan2(m11)),
        )
    }

    /// Computes the squared length of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Computes the length of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit-length copy of this quaternion.
    ///
    /// A zero-length quaternion normalizes to [`Quaternion::IDENTITY`].
    #[inline]
    pub fn normalize(&self) -> Self {
        let mag_sqrt = self.magnitude_squared();
        if mag_sqrt > EPSILON * EPSILON {
            let inv_mag = 1.0 / mag_sqrt.sqrt();
            Self::new(
                self.x * inv_mag,
                self.y * inv_mag,
                self.z * inv_mag,
                self.w * inv_mag,
            )
        } else {
            Self::IDENTITY
        }
    }

    /// Negates the vector part.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// The inverse rotation: the conjugate, normalized.
    #[inline]
    pub fn inverse(&self) -> Self {
        self.conjugate().normalize()
    }

    /// Rotates a vector by this quaternion.
    #[inline]
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s = self.w;
        2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
    }

    /// Converts this rotation into an equivalent homogeneous 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        let q = self.normalize();
        let (x2, y2, z2) = (q.x + q.x, q.y + q.y, q.z + q.z);
        let (xx, xy, xz) = (q.x * x2, q.x * y2, q.x * z2);
        let (yy, yz, zz) = (q.y * y2, q.y * z2, q.z * z2);
        let (wx, wy, wz) = (q.w * x2, q.w * y2, q.w * z2);

        Mat4::from_cols(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }
}

impl Default for Quaternion {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product.
    /// Note that quaternion multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate_vec3(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn quat_approx_eq(a: Quaternion, b: Quaternion) -> bool {
        // q and -q encode the same rotation.
        let same = (a.x - b.x).abs() < 1e-4
            && (a.y - b.y).abs() < 1e-4
            && (a.z - b.z).abs() < 1e-4
            && (a.w - b.w).abs() < 1e-4;
        let opposite = (a.x + b.x).abs() < 1e-4
            && (a.y + b.y).abs() < 1e-4
            && (a.z + b.z).abs() < 1e-4
            && (a.w + b.w).abs() < 1e-4;
        same || opposite
    }

    #[test]
    fn test_identity_is_left_and_right_neutral() {
        let q = Quaternion::new(0.1, -0.7, 0.3, 0.5);
        assert_eq!(Quaternion::IDENTITY * q, q);
        assert_eq!(q * Quaternion::IDENTITY, q);
        assert_eq!(Quaternion::default(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_zero_normalizes_to_identity() {
        let zero = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(zero.normalize(), Quaternion::IDENTITY);
        assert_eq!(
            Quaternion::from_axis_angle(Vec3::ZERO, 1.0),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let q = Quaternion::from_euler_degrees(Vec3::new(20.0, 45.0, -10.0));
        let product = q * q.inverse();
        assert!(quat_approx_eq(product, Quaternion::IDENTITY));

        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_abs_diff_eq!(q.inverse() * (q * v), v, epsilon = 1e-4);
    }

    #[test]
    fn test_euler_composition_order() {
        let angles = Vec3::new(30.0, 60.0, 15.0);
        let expected = Quaternion::from_axis_angle(Vec3::Y, degrees_to_radians(60.0))
            * Quaternion::from_axis_angle(Vec3::X, degrees_to_radians(30.0))
            * Quaternion::from_axis_angle(Vec3::Z, degrees_to_radians(15.0));
        assert!(quat_approx_eq(
            Quaternion::from_euler_degrees(angles),
            expected
        ));
    }

    #[test]
    fn test_euler_round_trip() {
        for angles in [
            Vec3::new(10.0, 20.0, 30.0),
            Vec3::new(-45.0, 170.0, -5.0),
            Vec3::new(0.0, -90.0, 60.0),
        ] {
            let back = Quaternion::from_euler_degrees(angles).to_euler_degrees();
            assert_abs_diff_eq!(back, angles, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_to_mat4_matches_vector_rotation() {
        let q = Quaternion::from_euler_degrees(Vec3::new(15.0, -30.0, 70.0));
        let v = Vec3::new(0.5, -1.0, 2.0);
        let by_matrix = (q.to_mat4() * Vec4::from_vec3(v, 1.0)).truncate();
        assert_abs_diff_eq!(by_matrix, q * v, epsilon = 1e-4);
    }

    #[test]
    fn test_rotation_about_y_by_90() {
        let q = Quaternion::from_axis_angle(Vec3::Y, degrees_to_radians(90.0));
        assert_abs_diff_eq!(q * Vec3::X, -Vec3::Z, epsilon = 1e-5);
    }
}
