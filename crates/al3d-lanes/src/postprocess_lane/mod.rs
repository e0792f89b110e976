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

//! Postprocess lane - full-screen effects applied to the finished frame.
//!
//! While an effect is registered the renderer draws the scene into an
//! offscreen target, then [`PostProcessPass::finish`] draws a full-screen quad
//! into the default framebuffer with the effect's fragment stage sampling that
//! target.

mod color;
mod kernel;
pub mod shaders;

pub use color::*;
pub use kernel::*;

use crate::render_lane::{build_program, require_attrib, ShaderSource};
use al3d_core::renderer::{
    AttribLocation, BufferId, BufferTarget, FramebufferId, GraphicsContext, PrimitiveMode,
    ProgramId, RenderError, RenderTarget, ResourceError, TextureTarget, UniformValue,
};
use std::fmt::Debug;

/// Two clip-space triangles covering the viewport.
#[rustfmt::skip]
const QUAD: [f32; 12] = [
    -1.0, -1.0,   1.0, -1.0,   -1.0, 1.0,
    -1.0,  1.0,   1.0, -1.0,    1.0, 1.0,
];

/// A full-screen effect.
///
/// The fragment stage receives the frame on texture unit 0 as `uSampler` and
/// the interpolated `vUV`.
pub trait PostEffect: Debug {
    /// A name for logs and diagnostics.
    fn label(&self) -> &str;

    /// The effect's fragment stage.
    fn fragment_source(&self) -> &str;

    /// Sets the effect's own uniforms. Runs with `program` bound, right before the draw.
    fn process(
        &self,
        _ctx: &mut dyn GraphicsContext,
        _program: ProgramId,
        _target: &RenderTarget,
    ) -> Result<(), ResourceError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct PassProgram {
    id: ProgramId,
    position: AttribLocation,
}

/// A registered effect together with the GPU objects it draws with.
#[derive(Debug)]
pub struct PostProcessPass {
    effect: Box<dyn PostEffect>,
    program: Option<PassProgram>,
    target: Option<RenderTarget>,
    quad: Option<BufferId>,
}

impl PostProcessPass {
    /// Wraps `effect`. GPU objects are created on first use.
    pub fn new(effect: Box<dyn PostEffect>) -> Self {
        Self {
            effect,
            program: None,
            target: None,
            quad: None,
        }
    }

    /// The wrapped effect.
    pub fn effect(&self) -> &dyn PostEffect {
        self.effect.as_ref()
    }

    /// The offscreen target, once created.
    pub fn target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }

    /// Binds an offscreen target of `width` x `height`, recreating it on resize.
    pub fn begin(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        width: u32,
        height: u32,
    ) -> Result<FramebufferId, RenderError> {
        let target = match self.target {
            Some(target) if target.width == width && target.height == height => target,
            _ => {
                let target = ctx.create_render_target(width, height)?;
                log::debug!(
                    "PostProcessPass: '{}' renders into a {width}x{height} target",
                    self.effect.label()
                );
                self.target = Some(target);
                target
            }
        };
        ctx.bind_framebuffer(Some(target.framebuffer))?;
        Ok(target.framebuffer)
    }

    fn program(&mut self, ctx: &mut dyn GraphicsContext) -> Result<PassProgram, RenderError> {
        if let Some(program) = self.program {
            return Ok(program);
        }
        let label = self.effect.label().to_owned();
        let source = ShaderSource {
            vertex: shaders::FULLSCREEN_VERT.to_owned(),
            fragment: self.effect.fragment_source().to_owned(),
        };
        let id = build_program(ctx, &label, &source)?;
        let program = PassProgram {
            id,
            position: require_attrib(ctx, id, &label, "aPosition")?,
        };
        self.program = Some(program);
        Ok(program)
    }

    /// Draws the effect over the default framebuffer. Returns the draw calls issued.
    ///
    /// Does nothing if [`begin`](Self::begin) never ran.
    pub fn finish(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        width: u32,
        height: u32,
    ) -> Result<u32, RenderError> {
        let Some(target) = self.target else {
            return Ok(0);
        };
        ctx.bind_framebuffer(None)?;
        ctx.viewport(0, 0, width, height);
        ctx.set_depth_test(false);

        let program = self.program(ctx)?;
        let quad = match self.quad {
            Some(quad) => quad,
            None => {
                let quad = ctx.create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(&QUAD))?;
                self.quad = Some(quad);
                quad
            }
        };

        ctx.use_program(program.id)?;
        ctx.bind_texture(0, TextureTarget::Texture2D, target.color)?;
        if let Some(sampler) = ctx.uniform_location(program.id, "uSampler") {
            ctx.set_uniform(sampler, UniformValue::Int(0))?;
        }
        ctx.bind_vertex_attribute(program.position, quad, 2)?;
        self.effect.process(ctx, program.id, &target)?;
        ctx.draw_arrays(PrimitiveMode::Triangles, 0, 6)?;
        ctx.set_depth_test(true);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_clip_space() {
        assert_eq!(QUAD.len(), 12);
        assert!(QUAD.iter().all(|c| c.abs() == 1.0));
    }

    #[test]
    fn pass_starts_without_gpu_objects() {
        let pass = PostProcessPass::new(Box::new(ColorEffect::Sepia));
        assert_eq!(pass.effect().label(), "Sepia");
        assert!(pass.target().is_none());
    }
}
