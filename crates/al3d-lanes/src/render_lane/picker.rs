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

//! Color-coded mouse picking.
//!
//! An armed pick renders every mesh into an offscreen target with a flat
//! program whose color is the mesh's pick id, then reads back the pixel under
//! the cursor. Pick ids grow by a fixed stride in draw order. Meshes with
//! `pickable == false` are drawn with id `0`: they still hide what lies
//! behind them, but never match. Ids past [`MAX_PICK_ID`] do not fit in a
//! pixel, so meshes beyond that point are drawn with id `0` as well.

use super::generator::ShaderSource;
use super::program_cache::{build_program, require_attrib, require_uniform};
use super::shaders::{PICKER_FRAG, PICKER_VERT};
use ahash::AHashMap;
use al3d_core::math::{Color, Mat4};
use al3d_core::renderer::{
    AttribLocation, FramebufferId, GraphicsContext, ProgramId, RenderError, RenderTarget,
    UniformLocation, UniformValue, MAX_PICK_ID,
};
use al3d_core::scene::{AttributeSlots, Mesh, NodeId, Scene, SceneNode};

/// A callback receiving every resolved pick, replacing per-mesh click handlers.
pub type PickCallback = Box<dyn FnMut(NodeId, &mut Mesh) + 'static>;

#[derive(Debug, Clone, Copy)]
struct PickProgram {
    id: ProgramId,
    position: AttribLocation,
    mvp: UniformLocation,
    code: UniformLocation,
}

/// What a pick pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickOutcome {
    /// Draw calls issued by the pass.
    pub draw_calls: u32,
    /// The mesh under the cursor, if any.
    pub hit: Option<NodeId>,
}

/// The one-shot picker owned by the renderer.
pub struct Picker {
    stride: u32,
    pending: Option<(u32, u32)>,
    program: Option<PickProgram>,
    target: Option<RenderTarget>,
    callback: Option<PickCallback>,
    last_hit: Option<NodeId>,
}

impl std::fmt::Debug for Picker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picker")
            .field("stride", &self.stride)
            .field("pending", &self.pending)
            .field("has_callback", &self.callback.is_some())
            .field("last_hit", &self.last_hit)
            .finish()
    }
}

impl Picker {
    /// A picker assigning ids `stride`, `2 * stride`, ...
    ///
    /// `stride` is clamped to `1..=MAX_PICK_ID`.
    pub fn new(stride: u32) -> Self {
        let clamped = stride.clamp(1, MAX_PICK_ID);
        if clamped != stride {
            log::warn!("Picker: id stride {stride} clamped to {clamped}");
        }
        Self {
            stride: clamped,
            pending: None,
            program: None,
            target: None,
            callback: None,
            last_hit: None,
        }
    }

    /// Arms a pick at window coordinates `(x, y)`, `y` measured from the top.
    /// It runs during the next render only.
    pub fn pick(&mut self, x: u32, y: u32) {
        self.pending = Some((x, y));
    }

    /// Whether the next render will run a pick pass.
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Routes every resolved pick to `callback` instead of the mesh's click handler.
    pub fn on_pick(&mut self, callback: impl FnMut(NodeId, &mut Mesh) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Goes back to per-mesh click handlers.
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// The mesh hit by the most recent pick.
    pub fn last_hit(&self) -> Option<NodeId> {
        self.last_hit
    }

    /// The RGBA color encoding `id` as `0xRRGGBB`.
    pub fn encode(id: u32) -> Color {
        Color::new(
            ((id >> 16) & 0xFF) as f32 / 255.0,
            ((id >> 8) & 0xFF) as f32 / 255.0,
            (id & 0xFF) as f32 / 255.0,
            1.0,
        )
    }

    /// The id encoded by a read-back pixel.
    pub fn decode(pixel: [u8; 4]) -> u32 {
        (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32
    }

    fn program(&mut self, ctx: &mut dyn GraphicsContext) -> Result<PickProgram, RenderError> {
        if let Some(program) = self.program {
            return Ok(program);
        }
        let label = "picker";
        let source = ShaderSource {
            vertex: PICKER_VERT.to_owned(),
            fragment: PICKER_FRAG.to_owned(),
        };
        let id = build_program(ctx, label, &source)?;
        let program = PickProgram {
            id,
            position: require_attrib(ctx, id, label, "aPosition")?,
            mvp: require_uniform(ctx, id, label, "uMVP")?,
            code: require_uniform(ctx, id, label, "uCode")?,
        };
        self.program = Some(program);
        Ok(program)
    }

    fn target(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        width: u32,
        height: u32,
    ) -> Result<RenderTarget, RenderError> {
        match self.target {
            Some(target) if target.width == width && target.height == height => Ok(target),
            _ => {
                let target = ctx.create_render_target(width, height)?;
                self.target = Some(target);
                Ok(target)
            }
        }
    }

    /// Runs the armed pick, if any, then rebinds `restore`.
    ///
    /// `order` lists node indices in draw order; `view_projection` is the
    /// camera's. The callback or click handler of the hit mesh runs before
    /// this returns.
    pub(crate) fn run(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        scene: &mut Scene,
        order: &[usize],
        view_projection: Mat4,
        (width, height): (u32, u32),
        restore: Option<FramebufferId>,
    ) -> Result<Option<PickOutcome>, RenderError> {
        let Some((x, y)) = self.pending.take() else {
            return Ok(None);
        };
        let program = self.program(ctx)?;
        let target = self.target(ctx, width, height)?;

        ctx.bind_framebuffer(Some(target.framebuffer))?;
        ctx.viewport(0, 0, width, height);
        ctx.clear(Color::TRANSPARENT, 1.0);
        ctx.set_blending(false);
        ctx.set_depth_test(true);
        ctx.use_program(program.id)?;

        let slots = AttributeSlots {
            position: Some(program.position),
            ..AttributeSlots::default()
        };
        let mut ids = AHashMap::new();
        let mut next_id: u32 = 0;
        let mut exhausted = false;
        let mut outcome = PickOutcome::default();
        for &index in order {
            let (node_id, node) = &mut scene.nodes_mut()[index];
            let SceneNode::Mesh(mesh) = node else {
                continue;
            };
            let free = next_id
                .checked_add(self.stride)
                .filter(|&id| id <= MAX_PICK_ID);
            let code = match free {
                Some(id) if mesh.pickable => {
                    next_id = id;
                    ids.insert(id, *node_id);
                    id
                }
                None if mesh.pickable => {
                    if !exhausted {
                        log::warn!(
                            "Picker: ran out of ids after {} meshes, the rest cannot be picked",
                            ids.len()
                        );
                        exhausted = true;
                    }
                    0
                }
                _ => 0,
            };
            mesh.ensure_buffers(ctx)?;
            let mvp = view_projection * mesh.object.transform();
            ctx.set_uniform(program.mvp, mvp.into())?;
            ctx.set_uniform(program.code, UniformValue::from(Self::encode(code)))?;
            outcome.draw_calls += mesh.draw(ctx, &slots)?;
        }

        if x < width && y < height {
            let pixel = ctx.read_pixel(x, height - 1 - y)?;
            let id = Self::decode(pixel);
            outcome.hit = ids.get(&id).copied();
            log::debug!(
                "Picker: pixel ({x}, {y}) holds id {id}, mesh {:?}",
                outcome.hit
            );
        } else {
            log::warn!("Picker: ({x}, {y}) lies outside the {width}x{height} viewport");
        }
        ctx.bind_framebuffer(restore)?;
        ctx.set_blending(true);

        self.last_hit = outcome.hit;
        if let Some(hit) = outcome.hit {
            if let Some(mesh) = scene.mesh_mut(hit) {
                match self.callback.as_mut() {
                    Some(callback) => callback(hit, mesh),
                    None => {
                        mesh.fire_click();
                    }
                }
            }
        }
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_rgb() {
        for id in [0, 100, 200, 65_500, 0x00AB_CDEF] {
            let color = Picker::encode(id);
            let pixel = [
                (color.r * 255.0).round() as u8,
                (color.g * 255.0).round() as u8,
                (color.b * 255.0).round() as u8,
                255,
            ];
            assert_eq!(Picker::decode(pixel), id);
        }
    }

    #[test]
    fn pick_is_one_shot() {
        let mut picker = Picker::new(100);
        assert!(!picker.is_armed());
        picker.pick(3, 4);
        assert!(picker.is_armed());
        assert_eq!(picker.pending.take(), Some((3, 4)));
        assert!(!picker.is_armed());
    }

    #[test]
    fn stride_is_clamped_to_the_id_range() {
        assert_eq!(Picker::new(0).stride, 1);
        assert_eq!(Picker::new(MAX_PICK_ID).stride, MAX_PICK_ID);
        assert_eq!(Picker::new(0x0100_0000).stride, MAX_PICK_ID);
        assert_eq!(Picker::new(u32::MAX).stride, MAX_PICK_ID);
    }

    #[test]
    fn the_largest_id_survives_encoding() {
        let color = Picker::encode(MAX_PICK_ID);
        let pixel = [
            (color.r * 255.0).round() as u8,
            (color.g * 255.0).round() as u8,
            (color.b * 255.0).round() as u8,
            255,
        ];
        assert_eq!(Picker::decode(pixel), MAX_PICK_ID);
    }
}
