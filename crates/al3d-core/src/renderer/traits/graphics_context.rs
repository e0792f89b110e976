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

use crate::math::Color;
use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The immediate-mode graphics capability the renderer drives.
///
/// A context owns every object it hands out a handle for. There is no destroy
/// path: handles live as long as the context. All calls come from the thread
/// running the render loop, so methods take `&mut self` and no locking is implied.
pub trait GraphicsContext: Debug {
    /// Compiles one shader stage.
    /// ## Arguments
    /// * `label` - A name used in diagnostics, usually the program key.
    /// * `stage` - The stage the source is written for.
    /// * `source` - The complete GLSL source.
    /// ## Returns
    /// The ID of the compiled stage.
    /// ## Errors
    /// * `ResourceError::Shader(ShaderError::CompilationError)` - With the compiler's diagnostic.
    fn compile_shader(
        &mut self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderId, ResourceError>;

    /// Links a vertex and a fragment stage into a program.
    /// ## Arguments
    /// * `label` - A name used in diagnostics.
    /// * `vertex` - A stage previously compiled as [`ShaderStage::Vertex`].
    /// * `fragment` - A stage previously compiled as [`ShaderStage::Fragment`].
    /// ## Errors
    /// * `ResourceError::Shader(ShaderError::LinkError)` - With the linker's diagnostic.
    /// * `ResourceError::InvalidHandle` - If either stage ID is unknown.
    fn link_program(
        &mut self,
        label: &str,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> Result<ProgramId, ResourceError>;

    /// Makes `program` the target of subsequent uniform uploads and draws.
    fn use_program(&mut self, program: ProgramId) -> Result<(), ResourceError>;

    /// Looks up an active vertex attribute. Returns `None` if the program does not declare it.
    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation>;

    /// Looks up an active uniform, including struct members and array elements
    /// such as `pointLights[1].color`. Returns `None` if the program does not declare it.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Creates a buffer and fills it with `data`.
    fn create_buffer(&mut self, target: BufferTarget, data: &[u8])
        -> Result<BufferId, ResourceError>;

    /// Feeds `buffer` to the attribute at `location`, reading `components` floats per vertex.
    fn bind_vertex_attribute(
        &mut self,
        location: AttribLocation,
        buffer: BufferId,
        components: u32,
    ) -> Result<(), ResourceError>;

    /// Binds the index buffer used by [`draw_elements`](Self::draw_elements).
    fn bind_index_buffer(&mut self, buffer: BufferId) -> Result<(), ResourceError>;

    /// Creates and uploads a 2D texture.
    fn create_texture(
        &mut self,
        data: &TextureData,
        options: &TextureOptions,
    ) -> Result<TextureId, ResourceError>;

    /// Creates and uploads a cube map.
    fn create_cube_texture(
        &mut self,
        data: &CubeTextureData,
        options: &TextureOptions,
    ) -> Result<TextureId, ResourceError>;

    /// Replaces the pixels of an existing 2D texture (e.g. with a new video frame).
    fn update_texture(&mut self, texture: TextureId, data: &TextureData)
        -> Result<(), ResourceError>;

    /// Binds `texture` to texture unit `unit`.
    fn bind_texture(
        &mut self,
        unit: u32,
        target: TextureTarget,
        texture: TextureId,
    ) -> Result<(), ResourceError>;

    /// Creates an offscreen color + depth target of the given size.
    fn create_render_target(&mut self, width: u32, height: u32)
        -> Result<RenderTarget, ResourceError>;

    /// Redirects rendering to `framebuffer`, or back to the default surface with `None`.
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>)
        -> Result<(), ResourceError>;

    /// Sets the viewport rectangle in pixels.
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Clears color and depth of the bound framebuffer.
    fn clear(&mut self, color: Color, depth: f32);

    /// Enables or disables `src-alpha, one-minus-src-alpha` blending.
    fn set_blending(&mut self, enabled: bool);

    /// Enables or disables depth testing.
    fn set_depth_test(&mut self, enabled: bool);

    /// Sets the depth comparison. Contexts start with [`DepthFunc::Less`].
    fn set_depth_func(&mut self, func: DepthFunc);

    /// Uploads a value to a uniform of the current program.
    fn set_uniform(
        &mut self,
        location: UniformLocation,
        value: UniformValue<'_>,
    ) -> Result<(), ResourceError>;

    /// Draws `count` vertices starting at `first` from the bound attributes.
    fn draw_arrays(
        &mut self,
        mode: PrimitiveMode,
        first: u32,
        count: u32,
    ) -> Result<(), ResourceError>;

    /// Draws `count` indices from the bound index buffer.
    fn draw_elements(
        &mut self,
        mode: PrimitiveMode,
        count: u32,
        format: IndexFormat,
    ) -> Result<(), ResourceError>;

    /// Reads back one RGBA8 pixel from the bound framebuffer.
    ///
    /// `y` is measured from the bottom row. This call stalls until the GPU
    /// has finished every pending command.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the pixel lies outside the framebuffer.
    fn read_pixel(&mut self, x: u32, y: u32) -> Result<[u8; 4], ResourceError>;
}
