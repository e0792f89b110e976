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

use crate::math::{Color, Mat3, Mat4, Vec2, Vec3, Vec4};

/// A value uploaded to a uniform location.
///
/// Matrices are carried column-major, the layout the context uploads without transposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    /// `int` or `sampler*` (texture unit index).
    Int(i32),
    /// `float`.
    Float(f32),
    /// `vec2`.
    Vec2([f32; 2]),
    /// `vec3`.
    Vec3([f32; 3]),
    /// `vec4`.
    Vec4([f32; 4]),
    /// `mat3`, column-major.
    Mat3([f32; 9]),
    /// `mat4`, column-major.
    Mat4([f32; 16]),
    /// `float[]`.
    FloatArray(&'a [f32]),
}

impl From<f32> for UniformValue<'_> {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<i32> for UniformValue<'_> {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<Vec2> for UniformValue<'_> {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2([v.x, v.y])
    }
}

impl From<Vec3> for UniformValue<'_> {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v.to_array())
    }
}

impl From<Vec4> for UniformValue<'_> {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4([v.x, v.y, v.z, v.w])
    }
}

impl From<Color> for UniformValue<'_> {
    fn from(c: Color) -> Self {
        UniformValue::Vec4(c.to_array())
    }
}

impl From<Mat3> for UniformValue<'_> {
    fn from(m: Mat3) -> Self {
        UniformValue::Mat3(m.to_cols_array())
    }
}

impl From<Mat4> for UniformValue<'_> {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m.to_cols_array())
    }
}

impl<'a> From<&'a [f32]> for UniformValue<'a> {
    fn from(values: &'a [f32]) -> Self {
        UniformValue::FloatArray(values)
    }
}
