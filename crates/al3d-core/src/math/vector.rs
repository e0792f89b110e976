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

//! Provides 2D, 3D, and 4D vector types and their associated operations.
//!
//! All vector types are immutable values. Division is only offered through the
//! checked [`try_div`](Vec3::try_div) / [`try_div_scalar`](Vec3::try_div_scalar)
//! methods, which report [`MathError::DivisionByZero`] instead of yielding `inf`.

use serde::{Deserialize, Serialize};

use super::{checked_div, MathError, EPSILON};
use std::ops::{Add, Index, Mul, Neg, Sub};

/// Implements the component-wise behaviour shared by every vector width.
macro_rules! impl_vector_common {
    ($ty:ident { $($field:ident),+ }) => {
        impl $ty {
            /// Calculates the squared length (magnitude) of the vector.
            /// This is faster than `length()` as it avoids a square root.
            #[inline]
            pub fn length_squared(&self) -> f32 {
                self.dot(*self)
            }

            /// Calculates the length (magnitude) of the vector.
            #[inline]
            pub fn length(&self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Calculates the dot product of this vector and another.
            #[inline]
            pub fn dot(&self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            /// Returns a normalized version of the vector with a length of 1.
            ///
            /// A vector shorter than [`EPSILON`] comes back as the zero vector.
            /// Use [`try_normalize`](Self::try_normalize) wherever that input is an error.
            #[inline]
            pub fn normalize(&self) -> Self {
                let len_sq = self.length_squared();
                if len_sq > EPSILON * EPSILON {
                    *self * (1.0 / len_sq.sqrt())
                } else {
                    Self::ZERO
                }
            }

            /// Euclidean distance between the two points described by `self` and `other`.
            #[inline]
            pub fn distance_to(&self, other: Self) -> f32 {
                (*self - other).length()
            }

            /// Clamps each component between the matching components of `min` and `max`.
            #[inline]
            pub fn clamp(&self, min: Self, max: Self) -> Self {
                Self { $($field: super::clamp(self.$field, min.$field, max.$field)),+ }
            }

            /// Rounds each component down.
            #[inline]
            pub fn floor(&self) -> Self {
                Self { $($field: self.$field.floor()),+ }
            }

            /// Rounds each component up.
            #[inline]
            pub fn ceil(&self) -> Self {
                Self { $($field: self.$field.ceil()),+ }
            }

            /// Rounds each component to the nearest integer.
            #[inline]
            pub fn round(&self) -> Self {
                Self { $($field: self.$field.round()),+ }
            }

            /// Divides component-wise by `rhs`.
            ///
            /// # Errors
            ///
            /// Returns [`MathError::DivisionByZero`] if any component of `rhs` is exactly zero.
            #[inline]
            pub fn try_div(&self, rhs: Self) -> Result<Self, MathError> {
                Ok(Self { $($field: checked_div(self.$field, rhs.$field)?),+ })
            }

            /// Divides every component by `scalar`.
            ///
            /// # Errors
            ///
            /// Returns [`MathError::DivisionByZero`] if `scalar` is exactly zero.
            #[inline]
            pub fn try_div_scalar(&self, scalar: f32) -> Result<Self, MathError> {
                if scalar == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                Ok(*self * (1.0 / scalar))
            }

            /// Normalizes the vector, failing on (near) zero length.
            ///
            /// # Errors
            ///
            /// Returns [`MathError::DivisionByZero`] if the length is below [`EPSILON`].
            #[inline]
            pub fn try_normalize(&self) -> Result<Self, MathError> {
                let len = self.length();
                if len <= EPSILON {
                    return Err(MathError::DivisionByZero);
                }
                self.try_div_scalar(len)
            }

            /// Performs a linear interpolation between two vectors.
            /// The interpolation factor `t` is clamped to the `[0.0, 1.0]` range.
            #[inline]
            pub fn lerp(start: Self, end: Self, t: f32) -> Self {
                start + (end - start) * t.clamp(0.0, 1.0)
            }
        }

        impl Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self::Output {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self::Output {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f32) -> Self::Output {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f32 {
            type Output = $ty;
            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                rhs * self
            }
        }

        impl Mul<$ty> for $ty {
            type Output = Self;
            /// Multiplies two vectors component-wise.
            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self::Output {
                Self { $($field: -self.$field),+ }
            }
        }

        impl approx::AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                true $(&& approx::AbsDiffEq::abs_diff_eq(&self.$field, &other.$field, epsilon))+
            }
        }
    };
}

/// Vectors of different widths never compare equal.
macro_rules! impl_mismatched_eq {
    ($($lhs:ident => $rhs:ident),+ $(,)?) => {
        $(
            impl PartialEq<$rhs> for $lhs {
                #[inline]
                fn eq(&self, _other: &$rhs) -> bool {
                    false
                }
            }
        )+
    };
}

// --- Vec2 ---

/// A 2-dimensional vector with `f32` components.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Vec2 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
}

impl Vec2 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Creates a new `Vec2` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl_vector_common!(Vec2 { x, y });

// --- Vec3 ---

/// A 3-dimensional vector with `f32` components.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Vec3 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
}

impl Vec3 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// The unit vector pointing along the positive Z-axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new `Vec3` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Computes the cross product of this vector and another.
    ///
    /// The result is perpendicular to both operands, following the right-hand rule.
    #[inline]
    pub fn cross(&self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Returns the component at `index` (0 = x, 1 = y, 2 = z).
    ///
    /// # Panics
    /// Panics if `index` is greater than 2.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self[index]
    }

    /// Returns the components as an array, in `[x, y, z]` order.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl_vector_common!(Vec3 { x, y, z });

impl Index<usize> for Vec3 {
    type Output = f32;
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Index out of bounds for Vec3"),
        }
    }
}

// --- Vec4 ---

/// A 4-dimensional vector with `f32` components, used for homogeneous coordinates and colors.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Vec4 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
    /// The w component of the vector.
    pub w: f32,
}

impl Vec4 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// The unit vector pointing along the positive W-axis.
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new `Vec4` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a `Vec4` from a `Vec3` and a `w` component.
    #[inline]
    pub fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Drops the `w` component.
    #[inline]
    pub fn truncate(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Returns the component at `index` (0 = x ... 3 = w).
    ///
    /// # Panics
    /// Panics if `index` is greater than 3.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            3 => self.w,
            _ => panic!("Index out of bounds for Vec4"),
        }
    }
}

impl_vector_common!(Vec4 { x, y, z, w });

impl_mismatched_eq!(
    Vec2 => Vec3,
    Vec2 => Vec4,
    Vec3 => Vec2,
    Vec3 => Vec4,
    Vec4 => Vec2,
    Vec4 => Vec3,
);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_add_then_sub_restores_operand() {
        let a = Vec3::new(1.5, -2.25, 8.0);
        let b = Vec3::new(-0.3, 7.1, 2.2);
        assert_abs_diff_eq!((a + b) - b, a);

        let a4 = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b4 = Vec4::new(0.1, 0.2, 0.3, 0.4);
        assert_abs_diff_eq!((a4 + b4) - b4, a4);
    }

    #[test]
    fn test_normalize_yields_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-1.0, 0.001, 5.0),
            Vec3::new(1e3, 2e3, -4e3),
        ] {
            assert!((v.normalize().length() - 1.0).abs() < EPSILON);
        }
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        assert!((Vec2::new(0.0, 9.0).normalize().length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_try_normalize_rejects_zero_length() {
        assert_eq!(Vec3::ZERO.try_normalize(), Err(MathError::DivisionByZero));
        assert_eq!(Vec4::ZERO.try_normalize(), Err(MathError::DivisionByZero));
        assert_eq!(
            Vec2::new(1e-9, 0.0).try_normalize(),
            Err(MathError::DivisionByZero)
        );
        let unit = Vec3::new(0.0, 0.0, -4.0).try_normalize().unwrap();
        assert_abs_diff_eq!(unit, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_cross_and_dot() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);
        assert_eq!(Vec3::new(1.0, 2.0, 3.0).dot(Vec3::new(4.0, -5.0, 6.0)), 12.0);
    }

    #[test]
    fn test_try_div_by_zero_scalar_fails() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.try_div_scalar(0.0), Err(MathError::DivisionByZero));
        assert_eq!(v.try_div_scalar(2.0), Ok(Vec3::new(0.5, 1.0, 1.5)));
    }

    #[test]
    fn test_try_div_by_vector_with_zero_component_fails() {
        let v = Vec2::new(4.0, 4.0);
        assert_eq!(v.try_div(Vec2::new(2.0, 0.0)), Err(MathError::DivisionByZero));
        assert_eq!(v.try_div(Vec2::new(2.0, 4.0)), Ok(Vec2::new(2.0, 1.0)));
        assert!(Vec4::ONE.try_div(Vec4::W).is_err());
    }

    #[test]
    fn test_rounding_and_clamp() {
        let v = Vec3::new(1.4, -1.6, 2.5);
        assert_eq!(v.floor(), Vec3::new(1.0, -2.0, 2.0));
        assert_eq!(v.ceil(), Vec3::new(2.0, -1.0, 3.0));
        assert_eq!(v.round(), Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(v.clamp(Vec3::ZERO, Vec3::ONE), Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_distance_to() {
        assert_eq!(Vec3::ZERO.distance_to(Vec3::new(0.0, 3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_mismatched_widths_compare_unequal() {
        assert!(Vec2::ZERO != Vec3::ZERO);
        assert!(Vec3::ONE != Vec4::ONE);
        assert!(Vec4::ZERO != Vec2::ZERO);
    }

    #[test]
    #[should_panic]
    fn test_vec3_index_out_of_bounds() {
        let _ = Vec3::ONE[3];
    }
}
