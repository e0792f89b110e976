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

use al3d_core::math::Color;
use al3d_core::renderer::{
    AttribLocation, BufferId, BufferTarget, DepthFunc, FramebufferId, IndexFormat, PrimitiveMode,
    ProgramId, ShaderId, ShaderStage, TextureId, TextureTarget, UniformLocation, UniformValue,
};

/// An owned copy of a [`UniformValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedValue {
    /// `int` or sampler unit.
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
    FloatArray(Vec<f32>),
}

impl From<UniformValue<'_>> for RecordedValue {
    fn from(value: UniformValue<'_>) -> Self {
        match value {
            UniformValue::Int(v) => RecordedValue::Int(v),
            UniformValue::Float(v) => RecordedValue::Float(v),
            UniformValue::Vec2(v) => RecordedValue::Vec2(v),
            UniformValue::Vec3(v) => RecordedValue::Vec3(v),
            UniformValue::Vec4(v) => RecordedValue::Vec4(v),
            UniformValue::Mat3(v) => RecordedValue::Mat3(v),
            UniformValue::Mat4(v) => RecordedValue::Mat4(v),
            UniformValue::FloatArray(v) => RecordedValue::FloatArray(v.to_vec()),
        }
    }
}

/// One call made on a [`HeadlessContext`](super::HeadlessContext), in order.
///
/// Variants mirror the `GraphicsContext` methods of the same name.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CompileShader {
        label: String,
        stage: ShaderStage,
        shader: ShaderId,
    },
    LinkProgram {
        label: String,
        program: ProgramId,
    },
    UseProgram(ProgramId),
    CreateBuffer {
        buffer: BufferId,
        target: BufferTarget,
        bytes: usize,
    },
    BindVertexAttribute {
        location: AttribLocation,
        buffer: BufferId,
        components: u32,
    },
    BindIndexBuffer(BufferId),
    CreateTexture {
        texture: TextureId,
        width: u32,
        height: u32,
    },
    CreateCubeTexture(TextureId),
    UpdateTexture(TextureId),
    BindTexture {
        unit: u32,
        target: TextureTarget,
        texture: TextureId,
    },
    CreateRenderTarget(FramebufferId),
    BindFramebuffer(Option<FramebufferId>),
    Viewport {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    Clear {
        color: Color,
        depth: f32,
    },
    SetBlending(bool),
    SetDepthTest(bool),
    SetDepthFunc(DepthFunc),
    SetUniform {
        location: UniformLocation,
        value: RecordedValue,
    },
    DrawArrays {
        mode: PrimitiveMode,
        first: u32,
        count: u32,
    },
    DrawElements {
        mode: PrimitiveMode,
        count: u32,
        format: IndexFormat,
    },
    ReadPixel {
        x: u32,
        y: u32,
    },
}

/// A draw call together with the state it ran under.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// The program in use.
    pub program: ProgramId,
    /// The label the program was linked under.
    pub label: String,
    /// Primitive assembly mode.
    pub mode: PrimitiveMode,
    /// Vertices (arrays) or indices (elements) consumed.
    pub count: u32,
    /// Whether the draw went through the index buffer.
    pub indexed: bool,
    /// The bound framebuffer, `None` for the default surface.
    pub framebuffer: Option<FramebufferId>,
    /// Whether depth testing was enabled.
    pub depth_test: bool,
    /// The depth comparison in effect.
    pub depth_func: DepthFunc,
    /// Whether blending was enabled.
    pub blending: bool,
}
