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

//! Defines the `Mat3` and `Mat4` types and associated operations.
//!
//! Both types are column-major: `cols[c]` is column `c`, and
//! [`Mat4::to_cols_array`] yields the layout expected by uniform uploads.
//! The `set` entry points take their arguments in row-major reading order and
//! transpose them into storage.

use super::{degrees_to_radians, MathError, Quaternion, Vec3, Vec4, EPSILON};
use std::ops::{Index, IndexMut, Mul};

/// Determinants with a magnitude at or below this value are treated as singular.
///
/// Kept far below [`EPSILON`] so heavily scaled-down transforms stay invertible.
pub const SINGULAR_DETERMINANT_EPSILON: f32 = 1e-12;

fn check_determinant(det: f32) -> Result<f32, MathError> {
    if !det.is_finite() || det.abs() <= SINGULAR_DETERMINANT_EPSILON {
        Err(MathError::SingularMatrix)
    } else {
        Ok(det)
    }
}

// --- Mat3 ---

/// A 3x3 column-major matrix.
///
/// Its main role in the renderer is the normal matrix: the upper-left
/// rotation/scale block of a model-view [`Mat4`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// A 3x3 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec3::ZERO; 3],
    };

    /// Creates a new matrix from three column vectors.
    #[inline]
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Overwrites every element. Arguments are read row by row (`n11, n12, n13, n21, ...`).
    pub fn set(&mut self, row_major: [f32; 9]) -> &mut Self {
        let r = row_major;
        self.cols = [
            Vec3::new(r[0], r[3], r[6]),
            Vec3::new(r[1], r[4], r[7]),
            Vec3::new(r[2], r[5], r[8]),
        ];
        self
    }

    /// Returns a row of the matrix as a `Vec3`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.cols[0].get(index),
            self.cols[1].get(index),
            self.cols[2].get(index),
        )
    }

    /// Creates a `Mat3` from the upper-left 3x3 corner of a [`Mat4`],
    /// discarding translation.
    #[inline]
    pub fn from_mat4(m4: &Mat4) -> Self {
        Self::from_cols(
            m4.cols[0].truncate(),
            m4.cols[1].truncate(),
            m4.cols[2].truncate(),
        )
    }

    /// Computes the determinant of the matrix.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let [c0, c1, c2] = self.cols;
        c0.x * (c1.y * c2.z - c2.y * c1.z) - c1.x * (c0.y * c2.z - c2.y * c0.z)
            + c2.x * (c0.y * c1.z - c1.y * c0.z)
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.get_row(0), self.get_row(1), self.get_row(2))
    }

    /// Computes the inverse of the matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SingularMatrix`] when the determinant is (near) zero.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let [c0, c1, c2] = self.cols;
        let m00 = c1.y * c2.z - c2.y * c1.z;
        let m10 = c2.y * c0.z - c0.y * c2.z;
        let m20 = c0.y * c1.z - c1.y * c0.z;
        let det = check_determinant(c0.x * m00 + c1.x * m10 + c2.x * m20)?;

        let inv_det = 1.0 / det;
        let m01 = c2.x * c1.z - c1.x * c2.z;
        let m11 = c0.x * c2.z - c2.x * c0.z;
        let m21 = c1.x * c0.z - c0.x * c1.z;
        let m02 = c1.x * c2.y - c2.x * c1.y;
        let m12 = c2.x * c0.y - c0.x * c2.y;
        let m22 = c0.x * c1.y - c1.x * c0.y;

        // Rows of the adjugate become columns of the result.
        Ok(Self::from_cols(
            Vec3::new(m00, m10, m20) * inv_det,
            Vec3::new(m01, m11, m21) * inv_det,
            Vec3::new(m02, m12, m22) * inv_det,
        ))
    }

    /// Divides every element by `scalar`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DivisionByZero`] if `scalar` is exactly zero.
    pub fn try_div_scalar(&self, scalar: f32) -> Result<Self, MathError> {
        Ok(Self::from_cols(
            self.cols[0].try_div_scalar(scalar)?,
            self.cols[1].try_div_scalar(scalar)?,
            self.cols[2].try_div_scalar(scalar)?,
        ))
    }

    /// The elements in column-major order.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 9] {
        let [c0, c1, c2] = self.cols;
        [c0.x, c0.y, c0.z, c1.x, c1.y, c1.z, c2.x, c2.y, c2.z]
    }
}

impl Default for Mat3 {
    /// Returns the 3x3 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat3) -> Self::Output {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Self::Output {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

impl Index<usize> for Mat3 {
    type Output = Vec3;
    /// Returns the column at `index`.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

impl approx::AbsDiffEq for Mat3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

// --- Mat4 ---

/// A 4x4 column-major matrix, used for model, view and projection transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::W,
        ],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Overwrites every element. Arguments are read row by row
    /// (`n11, n12, n13, n14, n21, ...`) and stored column-major.
    pub fn set(&mut self, row_major: [f32; 16]) -> &mut Self {
        let r = row_major;
        self.cols = [
            Vec4::new(r[0], r[4], r[8], r[12]),
            Vec4::new(r[1], r[5], r[9], r[13]),
            Vec4::new(r[2], r[6], r[10], r[14]),
            Vec4::new(r[3], r[7], r[11], r[15]),
        ];
        self
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0].get(index),
            self.cols[1].get(index),
            self.cols[2].get(index),
            self.cols[3].get(index),
        )
    }

    /// The elements in column-major order, ready for upload.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, col) in self.cols.iter().enumerate() {
            out[c * 4..c * 4 + 4].copy_from_slice(&[col.x, col.y, col.z, col.w]);
        }
        out
    }

    // --- Constructors ---

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = Vec4::from_vec3(v, 1.0);
        m
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation of `angle` radians around the X axis.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation of `angle` radians around the Y axis.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation of `angle` radians around the Z axis.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation matrix from a quaternion.
    #[inline]
    pub fn from_quat(q: Quaternion) -> Self {
        q.to_mat4()
    }

    // --- In-place builders ---
    //
    // Each of these replaces the whole matrix and returns `self` for chaining.
    // Composing a transform means building separate matrices and multiplying them.

    /// Replaces `self` with a translation matrix.
    pub fn translate(&mut self, v: Vec3) -> &mut Self {
        *self = Self::from_translation(v);
        self
    }

    /// Replaces `self` with a rotation of `angle` radians around X.
    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        *self = Self::from_rotation_x(angle);
        self
    }

    /// Replaces `self` with a rotation of `angle` radians around Y.
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        *self = Self::from_rotation_y(angle);
        self
    }

    /// Replaces `self` with a rotation of `angle` radians around Z.
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        *self = Self::from_rotation_z(angle);
        self
    }

    /// Replaces `self` with `Rz * Ry * Rx` for the given radian angles.
    pub fn rotate(&mut self, angles: Vec3) -> &mut Self {
        *self = Self::from_rotation_z(angles.z)
            * Self::from_rotation_y(angles.y)
            * Self::from_rotation_x(angles.x);
        self
    }

    /// Replaces `self` with a scaling matrix.
    pub fn scale(&mut self, scale: Vec3) -> &mut Self {
        *self = Self::from_scale(scale);
        self
    }

    /// Overwrites the translation column, leaving the rest of the matrix untouched.
    #[inline]
    pub fn set_translation(&mut self, v: Vec3) -> &mut Self {
        self.cols[3] = Vec4::from_vec3(v, self.cols[3].w);
        self
    }

    /// Reads the translation column.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    // --- Projections and views ---

    /// A right-handed perspective projection mapping depth to `[-1, 1]`.
    ///
    /// `fov_y_degrees` is the full vertical field of view.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (degrees_to_radians(fov_y_degrees) * 0.5).tan();
        let range_inv = 1.0 / (near - far);
        Self::from_cols(
            Vec4::new(f / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, (far + near) * range_inv, -1.0),
            Vec4::new(0.0, 0.0, 2.0 * far * near * range_inv, 0.0),
        )
    }

    /// A right-handed orthographic projection mapping depth to `[-1, 1]`.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let w = 1.0 / (right - left);
        let h = 1.0 / (top - bottom);
        let d = 1.0 / (far - near);
        Self::from_cols(
            Vec4::new(2.0 * w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 * d, 0.0),
            Vec4::new(
                -(right + left) * w,
                -(top + bottom) * h,
                -(far + near) * d,
                1.0,
            ),
        )
    }

    /// Builds a right-handed view matrix looking from `eye` towards `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DegenerateBasis`] if `eye` and `target` coincide or
    /// `up` is parallel to the view direction.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self, MathError> {
        let f = (target - eye)
            .try_normalize()
            .map_err(|_| MathError::DegenerateBasis)?;
        let s = f
            .cross(up)
            .try_normalize()
            .map_err(|_| MathError::DegenerateBasis)?;
        let u = s.cross(f);

        Ok(Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        ))
    }

    // --- Algebra ---

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            self.get_row(0),
            self.get_row(1),
            self.get_row(2),
            self.get_row(3),
        )
    }

    /// Computes the determinant of the matrix.
    pub fn determinant(&self) -> f32 {
        let [c0, c1, c2, c3] = self.cols;

        let m00 = c1.y * (c2.z * c3.w - c3.z * c2.w) - c2.y * (c1.z * c3.w - c3.z * c1.w)
            + c3.y * (c1.z * c2.w - c2.z * c1.w);
        let m01 = c0.y * (c2.z * c3.w - c3.z * c2.w) - c2.y * (c0.z * c3.w - c3.z * c0.w)
            + c3.y * (c0.z * c2.w - c2.z * c0.w);
        let m02 = c0.y * (c1.z * c3.w - c3.z * c1.w) - c1.y * (c0.z * c3.w - c3.z * c0.w)
            + c3.y * (c0.z * c1.w - c1.z * c0.w);
        let m03 = c0.y * (c1.z * c2.w - c2.z * c1.w) - c1.y * (c0.z * c2.w - c2.z * c0.w)
            + c2.y * (c0.z * c1.w - c1.z * c0.w);

        c0.x * m00 - c1.x * m01 + c2.x * m02 - c3.x * m03
    }

    /// Computes the general inverse by cofactor expansion.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SingularMatrix`] when the determinant is (near) zero,
    /// the same policy as [`Mat3::inverse`].
    pub fn inverse(&self) -> Result<Self, MathError> {
        let [c0, c1, c2, c3] = self.cols;

        // 2x2 sub-determinants shared between cofactors.
        let s0 = c0.x * c1.y - c1.x * c0.y;
        let s1 = c0.x * c1.z - c1.x * c0.z;
        let s2 = c0.x * c1.w - c1.x * c0.w;
        let s3 = c0.y * c1.z - c1.y * c0.z;
        let s4 = c0.y * c1.w - c1.y * c0.w;
        let s5 = c0.z * c1.w - c1.z * c0.w;

        let t5 = c2.z * c3.w - c3.z * c2.w;
        let t4 = c2.y * c3.w - c3.y * c2.w;
        let t3 = c2.y * c3.z - c3.y * c2.z;
        let t2 = c2.x * c3.w - c3.x * c2.w;
        let t1 = c2.x * c3.z - c3.x * c2.z;
        let t0 = c2.x * c3.y - c3.x * c2.y;

        let det = check_determinant(
            s0 * t5 - s1 * t4 + s2 * t3 + s3 * t2 - s4 * t1 + s5 * t0,
        )?;
        let inv = 1.0 / det;

        Ok(Self::from_cols(
            Vec4::new(
                (c1.y * t5 - c1.z * t4 + c1.w * t3) * inv,
                (-c0.y * t5 + c0.z * t4 - c0.w * t3) * inv,
                (c3.y * s5 - c3.z * s4 + c3.w * s3) * inv,
                (-c2.y * s5 + c2.z * s4 - c2.w * s3) * inv,
            ),
            Vec4::new(
                (-c1.x * t5 + c1.z * t2 - c1.w * t1) * inv,
                (c0.x * t5 - c0.z * t2 + c0.w * t1) * inv,
                (-c3.x * s5 + c3.z * s2 - c3.w * s1) * inv,
                (c2.x * s5 - c2.z * s2 + c2.w * s1) * inv,
            ),
            Vec4::new(
                (c1.x * t4 - c1.y * t2 + c1.w * t0) * inv,
                (-c0.x * t4 + c0.y * t2 - c0.w * t0) * inv,
                (c3.x * s4 - c3.y * s2 + c3.w * s0) * inv,
                (-c2.x * s4 + c2.y * s2 - c2.w * s0) * inv,
            ),
            Vec4::new(
                (-c1.x * t3 + c1.y * t1 - c1.z * t0) * inv,
                (c0.x * t3 - c0.y * t1 + c0.z * t0) * inv,
                (-c3.x * s3 + c3.y * s1 - c3.z * s0) * inv,
                (c2.x * s3 - c2.y * s1 + c2.z * s0) * inv,
            ),
        ))
    }

    /// The matrix used to carry normals into view space.
    ///
    /// With `non_unit_scale` set, this is the inverse-transpose of the upper 3x3
    /// block (required under non-uniform scale). Otherwise the upper 3x3 block is
    /// returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SingularMatrix`] if the inverse-transpose is requested
    /// for a block with no inverse.
    pub fn normal_matrix(&self, non_unit_scale: bool) -> Result<Mat3, MathError> {
        let upper = Mat3::from_mat4(self);
        if non_unit_scale {
            Ok(upper.inverse()?.transpose())
        } else {
            Ok(upper)
        }
    }

    /// Applies the affine part of the matrix to a point (`w = 1`), without a perspective divide.
    #[inline]
    pub fn multiply_by_vector(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 1.0)).truncate()
    }

    /// Applies the full 4x4 transform to a point, then divides by the resulting `w`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DivisionByZero`] if the homogeneous `w` is exactly zero.
    pub fn transform_point(&self, v: Vec3) -> Result<Vec3, MathError> {
        let clip = *self * Vec4::from_vec3(v, 1.0);
        clip.truncate().try_div_scalar(clip.w)
    }

    /// Divides every element by `scalar`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DivisionByZero`] if `scalar` is exactly zero.
    pub fn try_div_scalar(&self, scalar: f32) -> Result<Self, MathError> {
        Ok(Self::from_cols(
            self.cols[0].try_div_scalar(scalar)?,
            self.cols[1].try_div_scalar(scalar)?,
            self.cols[2].try_div_scalar(scalar)?,
            self.cols[3].try_div_scalar(scalar)?,
        ))
    }
}

// --- Operators Overloading ---

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// `self * rhs`: `rhs` is applied first when transforming column vectors.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl approx::AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

// --- Tests ---
