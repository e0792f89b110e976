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

use super::fog::Fog;
use super::geometry::{AttributeSlots, DrawStrategy, Geometry, GeometryBuffers};
use super::object3d::Object3D;
use crate::asset::Material;
use crate::renderer::{GraphicsContext, PrimitiveMode, ProgramHandle, ResourceError};
use std::fmt;

/// A callback run when the picker resolves a click on a mesh.
pub type ClickHandler = Box<dyn FnMut() + 'static>;

/// A drawable object: geometry, a material and a transform.
pub struct Mesh {
    /// Placement in the world.
    pub object: Object3D,
    /// Vertex streams used by the default draw.
    pub geometry: Geometry,
    /// Surface description; selects the shader permutation.
    pub material: Material,
    /// Whether the picker renders this mesh. Defaults to `true`.
    pub pickable: bool,
    /// Custom multi-part draw replacing the default one.
    pub draw_strategy: Option<DrawStrategy>,
    pub(crate) fog: Option<Fog>,
    program: Option<ProgramHandle>,
    buffers: Option<GeometryBuffers>,
    click_handler: Option<ClickHandler>,
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("object", &self.object)
            .field("vertices", &self.geometry.vertices.len())
            .field("indices", &self.geometry.indices.len())
            .field("material", &self.material.kind.type_tag())
            .field("pickable", &self.pickable)
            .field("program", &self.program)
            .field("has_click_handler", &self.click_handler.is_some())
            .finish()
    }
}

impl Mesh {
    /// A mesh at the origin with the default transform.
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            object: Object3D::default(),
            geometry,
            material,
            pickable: true,
            draw_strategy: None,
            fog: None,
            program: None,
            buffers: None,
            click_handler: None,
        }
    }

    /// A mesh drawn entirely through `strategy`.
    pub fn with_strategy(strategy: DrawStrategy, material: Material) -> Self {
        let mut mesh = Self::new(Geometry::default(), material);
        mesh.draw_strategy = Some(strategy);
        mesh
    }

    /// Moves the mesh.
    pub fn at(mut self, position: crate::math::Vec3) -> Self {
        self.object.position = position;
        self
    }

    /// The fog propagated from the scene, if any.
    pub fn fog(&self) -> Option<&Fog> {
        self.fog.as_ref()
    }

    /// The program assigned by the renderer.
    pub fn program(&self) -> Option<&ProgramHandle> {
        self.program.as_ref()
    }

    /// Assigns the program this mesh is drawn with.
    pub fn set_program(&mut self, handle: ProgramHandle) {
        self.program = Some(handle);
    }

    /// Drops the assigned program so the next update regenerates it.
    pub fn invalidate_program(&mut self) {
        self.program = None;
    }

    /// Registers the callback run when this mesh is picked.
    pub fn on_click(&mut self, handler: impl FnMut() + 'static) {
        self.click_handler = Some(Box::new(handler));
    }

    /// Runs the click callback. Returns whether one was registered.
    pub fn fire_click(&mut self) -> bool {
        match self.click_handler.as_mut() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Uploads vertex streams that have no GPU buffers yet.
    pub fn ensure_buffers(&mut self, ctx: &mut dyn GraphicsContext) -> Result<(), ResourceError> {
        if let Some(strategy) = &mut self.draw_strategy {
            return strategy.ensure_buffers(ctx);
        }
        if self.buffers.is_none() && !self.geometry.vertices.is_empty() {
            self.buffers = Some(GeometryBuffers::upload(
                ctx,
                &self.geometry.vertices,
                self.geometry.normals.as_deref(),
                self.geometry.uvs.as_deref(),
                &self.geometry.indices,
            )?);
        }
        Ok(())
    }

    /// The default buffers, once uploaded.
    pub fn buffers(&self) -> Option<&GeometryBuffers> {
        self.buffers.as_ref()
    }

    /// Binds the streams to `slots` and draws. Returns the number of draw calls.
    ///
    /// A mesh with a draw strategy dispatches to it; otherwise the default
    /// buffers are drawn indexed or as arrays.
    pub fn draw(&self, ctx: &mut dyn GraphicsContext, slots: &AttributeSlots) -> Result<u32, ResourceError> {
        if let Some(strategy) = &self.draw_strategy {
            return strategy.draw(ctx, slots);
        }
        let Some(buffers) = &self.buffers else {
            log::warn!("Mesh: draw requested before buffers were uploaded");
            return Ok(0);
        };
        buffers.bind(ctx, slots)?;
        buffers.draw(ctx, PrimitiveMode::Triangles)?;
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ProgramKey;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn new_mesh_is_pickable_without_program() {
        let mesh = Mesh::new(Geometry::default(), Material::default());
        assert!(mesh.pickable);
        assert!(mesh.program().is_none());
        assert!(mesh.fog().is_none());
    }

    #[test]
    fn click_handler_fires_each_time() {
        let hits = Rc::new(Cell::new(0));
        let mut mesh = Mesh::new(Geometry::default(), Material::default());
        assert!(!mesh.fire_click());

        let counter = Rc::clone(&hits);
        mesh.on_click(move || counter.set(counter.get() + 1));
        assert!(mesh.fire_click());
        assert!(mesh.fire_click());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn program_assignment_round_trip() {
        let mut mesh = Mesh::new(Geometry::default(), Material::lambert());
        mesh.set_program(ProgramHandle {
            key: ProgramKey::from("LambertMaterial1NOTEXTUREAL0DL1PL0"),
            slot: 0,
        });
        assert_eq!(
            mesh.program().map(|handle| handle.key.as_str()),
            Some("LambertMaterial1NOTEXTUREAL0DL1PL0")
        );
        mesh.invalidate_program();
        assert!(mesh.program().is_none());
    }
}
