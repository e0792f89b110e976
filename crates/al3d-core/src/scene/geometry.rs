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

//! Vertex streams and the GPU buffers they are uploaded into.

use crate::math::{Vec2, Vec3};
use crate::renderer::{
    AttribLocation, BufferId, BufferTarget, GraphicsContext, IndexFormat, PrimitiveMode,
    ResourceError,
};

/// CPU-side vertex streams of a mesh.
///
/// An empty index list means the mesh is drawn with `draw_arrays`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions in model space.
    pub vertices: Vec<Vec3>,
    /// Triangle-list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Per-vertex normals.
    pub normals: Option<Vec<Vec3>>,
    /// Per-vertex texture coordinates.
    pub uvs: Option<Vec<Vec2>>,
}

impl Geometry {
    /// Whether the geometry is drawn through an index buffer.
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// The number of vertices a default draw will issue.
    pub fn draw_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len()
        } else {
            self.vertices.len()
        }
    }
}

/// Attribute locations a draw binds its streams to. `None` skips the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeSlots {
    /// Location of `aPosition`.
    pub position: Option<AttribLocation>,
    /// Location of `aNormal`.
    pub normal: Option<AttribLocation>,
    /// Location of `aUV`.
    pub uv: Option<AttribLocation>,
}

/// An uploaded index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBuffer {
    /// The buffer handle.
    pub id: BufferId,
    /// Number of indices.
    pub count: u32,
    /// Width of each index.
    pub format: IndexFormat,
}

/// Handles of the buffers backing one set of vertex streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryBuffers {
    /// Position stream, three floats per vertex.
    pub position: BufferId,
    /// Normal stream, if the geometry has one.
    pub normal: Option<BufferId>,
    /// UV stream, if the geometry has one.
    pub uv: Option<BufferId>,
    /// Index buffer, if the geometry is indexed.
    pub index: Option<IndexBuffer>,
    /// Number of vertices in the position stream.
    pub vertex_count: u32,
}

impl GeometryBuffers {
    /// Uploads the given streams.
    ///
    /// Indices are packed as `u16` when every index fits, `u32` otherwise.
    pub fn upload(
        ctx: &mut dyn GraphicsContext,
        positions: &[Vec3],
        normals: Option<&[Vec3]>,
        uvs: Option<&[Vec2]>,
        indices: &[u32],
    ) -> Result<Self, ResourceError> {
        let position = ctx.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(positions))?;
        let normal = normals
            .map(|n| ctx.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(n)))
            .transpose()?;
        let uv = uvs
            .map(|u| ctx.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(u)))
            .transpose()?;

        let index = if indices.is_empty() {
            None
        } else {
            let format = index_format_for(indices);
            let id = match format {
                IndexFormat::Uint16 => {
                    let narrow: Vec<u16> = indices.iter().map(|&i| i as u16).collect();
                    ctx.create_buffer(BufferTarget::Index, bytemuck::cast_slice(&narrow))?
                }
                IndexFormat::Uint32 => {
                    ctx.create_buffer(BufferTarget::Index, bytemuck::cast_slice(indices))?
                }
            };
            Some(IndexBuffer {
                id,
                count: indices.len() as u32,
                format,
            })
        };

        Ok(Self {
            position,
            normal,
            uv,
            index,
            vertex_count: positions.len() as u32,
        })
    }

    /// Binds every stream that both exists and has a slot.
    pub fn bind(
        &self,
        ctx: &mut dyn GraphicsContext,
        slots: &AttributeSlots,
    ) -> Result<(), ResourceError> {
        if let Some(location) = slots.position {
            ctx.bind_vertex_attribute(location, self.position, 3)?;
        }
        if let (Some(location), Some(buffer)) = (slots.normal, self.normal) {
            ctx.bind_vertex_attribute(location, buffer, 3)?;
        }
        if let (Some(location), Some(buffer)) = (slots.uv, self.uv) {
            ctx.bind_vertex_attribute(location, buffer, 2)?;
        }
        Ok(())
    }

    /// Issues an indexed draw when an index buffer exists, an array draw otherwise.
    pub fn draw(&self, ctx: &mut dyn GraphicsContext, mode: PrimitiveMode) -> Result<(), ResourceError> {
        match self.index {
            Some(index) => {
                ctx.bind_index_buffer(index.id)?;
                ctx.draw_elements(mode, index.count, index.format)
            }
            None => ctx.draw_arrays(mode, 0, self.vertex_count),
        }
    }
}

/// The narrowest index format able to address every index in `indices`.
pub fn index_format_for(indices: &[u32]) -> IndexFormat {
    match indices.iter().max() {
        Some(&max) if max > u16::MAX as u32 => IndexFormat::Uint32,
        _ => IndexFormat::Uint16,
    }
}

/// One sub-range of a composite primitive, with its own streams.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPart {
    /// How the part's vertices are assembled.
    pub mode: PrimitiveMode,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, same length as `positions`.
    pub normals: Vec<Vec3>,
    /// Per-vertex uvs, same length as `positions`.
    pub uvs: Vec<Vec2>,
    buffers: Option<GeometryBuffers>,
}

impl DrawPart {
    /// A part drawn with `mode` from the given streams.
    pub fn new(mode: PrimitiveMode, positions: Vec<Vec3>, normals: Vec<Vec3>, uvs: Vec<Vec2>) -> Self {
        Self {
            mode,
            positions,
            normals,
            uvs,
            buffers: None,
        }
    }

    /// The uploaded buffers, once [`DrawStrategy::ensure_buffers`] ran.
    pub fn buffers(&self) -> Option<&GeometryBuffers> {
        self.buffers.as_ref()
    }
}

/// A custom draw routine replacing the default single indexed or array draw.
///
/// Each part binds its own streams and is drawn with `draw_arrays`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawStrategy {
    /// The parts, drawn in order.
    pub parts: Vec<DrawPart>,
}

impl DrawStrategy {
    /// Uploads every part that has no buffers yet.
    pub fn ensure_buffers(&mut self, ctx: &mut dyn GraphicsContext) -> Result<(), ResourceError> {
        for part in &mut self.parts {
            if part.buffers.is_none() {
                part.buffers = Some(GeometryBuffers::upload(
                    ctx,
                    &part.positions,
                    Some(&part.normals),
                    Some(&part.uvs),
                    &[],
                )?);
            }
        }
        Ok(())
    }

    /// Binds and draws every uploaded part. Returns the number of draw calls.
    pub fn draw(
        &self,
        ctx: &mut dyn GraphicsContext,
        slots: &AttributeSlots,
    ) -> Result<u32, ResourceError> {
        let mut draws = 0;
        for part in &self.parts {
            let Some(buffers) = &part.buffers else {
                continue;
            };
            buffers.bind(ctx, slots)?;
            ctx.draw_arrays(part.mode, 0, buffers.vertex_count)?;
            draws += 1;
        }
        Ok(draws)
    }

    /// Total number of vertices across all parts.
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.positions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_format_widens_past_u16() {
        assert_eq!(index_format_for(&[]), IndexFormat::Uint16);
        assert_eq!(index_format_for(&[0, 1, 65535]), IndexFormat::Uint16);
        assert_eq!(index_format_for(&[0, 65536]), IndexFormat::Uint32);
    }

    #[test]
    fn draw_count_follows_indices() {
        let mut geometry = Geometry {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            ..Default::default()
        };
        assert!(!geometry.is_indexed());
        assert_eq!(geometry.draw_count(), 3);
        geometry.indices = vec![0, 1, 2, 2, 1, 0];
        assert_eq!(geometry.draw_count(), 6);
    }
}
