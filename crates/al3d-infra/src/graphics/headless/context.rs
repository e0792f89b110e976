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

use super::command::{Command, DrawRecord, RecordedValue};
use super::glsl::{self, StageInterface};
use ahash::AHashMap;
use al3d_core::math::Color;
use al3d_core::renderer::{
    AttribLocation, BufferId, BufferTarget, CubeTextureData, DepthFunc, FramebufferId,
    GraphicsContext, IndexFormat, PrimitiveMode, ProgramId, RenderTarget, ResourceError,
    ShaderError, ShaderId, ShaderStage, TextureData, TextureId, TextureOptions, TextureTarget,
    UniformLocation, UniformValue,
};
use std::fmt;

#[derive(Debug)]
struct CompiledStage {
    stage: ShaderStage,
    source: String,
    interface: StageInterface,
}

#[derive(Debug)]
struct LinkedProgram {
    label: String,
    vertex_source: String,
    fragment_source: String,
    attributes: AHashMap<String, AttribLocation>,
    uniforms: AHashMap<String, UniformLocation>,
    uniform_count: u32,
    values: AHashMap<UniformLocation, RecordedValue>,
}

#[derive(Debug)]
struct BufferEntry {
    target: BufferTarget,
    bytes: usize,
}

#[derive(Debug)]
struct TextureEntry {
    target: TextureTarget,
    width: u32,
    height: u32,
}

/// A color attachment kept in memory so picks can be read back.
struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Surface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    fn fill(&mut self, rgba: [u8; 4]) {
        self.pixels.fill(rgba);
    }

    fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

fn to_rgba8(rgba: [f32; 4]) -> [u8; 4] {
    rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn index_size(format: IndexFormat) -> usize {
    match format {
        IndexFormat::Uint16 => 2,
        IndexFormat::Uint32 => 4,
    }
}

/// A [`GraphicsContext`] that runs without a GPU.
///
/// Every call is validated and recorded. Shader sources go through a
/// declaration scan instead of a driver, so generated programs are checked for
/// structure and their uniforms resolve exactly as declared. There is no
/// rasterizer: a draw covers its whole target, and when the program carries a
/// `uCode` uniform (the pick pass) the target is filled with that color so
/// pixel readback resolves to the last mesh drawn.
pub struct HeadlessContext {
    stages: Vec<CompiledStage>,
    programs: Vec<LinkedProgram>,
    buffers: Vec<BufferEntry>,
    textures: Vec<TextureEntry>,
    surface: Surface,
    targets: Vec<Surface>,
    current_program: Option<ProgramId>,
    framebuffer: Option<FramebufferId>,
    index_buffer: Option<BufferId>,
    bound_textures: AHashMap<u32, (TextureTarget, TextureId)>,
    viewport: (i32, i32, u32, u32),
    blending: bool,
    depth_test: bool,
    depth_func: DepthFunc,
    commands: Vec<Command>,
    draws: Vec<DrawRecord>,
    failures: Vec<ShaderError>,
    rejected: Vec<String>,
}

impl fmt::Debug for HeadlessContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessContext")
            .field("surface", &(self.surface.width, self.surface.height))
            .field("programs", &self.programs.len())
            .field("buffers", &self.buffers.len())
            .field("textures", &self.textures.len())
            .field("targets", &self.targets.len())
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl HeadlessContext {
    /// A context whose default surface is `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        log::debug!("HeadlessContext: created with a {width}x{height} surface");
        Self {
            stages: Vec::new(),
            programs: Vec::new(),
            buffers: Vec::new(),
            textures: Vec::new(),
            surface: Surface::new(width, height),
            targets: Vec::new(),
            current_program: None,
            framebuffer: None,
            index_buffer: None,
            bound_textures: AHashMap::new(),
            viewport: (0, 0, width, height),
            blending: false,
            depth_test: false,
            depth_func: DepthFunc::Less,
            commands: Vec::new(),
            draws: Vec::new(),
            failures: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Every call made so far, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Every draw made so far, with the state it ran under.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Forgets recorded commands and draws. Objects stay alive.
    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }

    /// Compile and link failures reported so far.
    pub fn shader_failures(&self) -> &[ShaderError] {
        &self.failures
    }

    /// Makes every later compile of a source containing `pattern` fail.
    pub fn reject_sources_containing(&mut self, pattern: impl Into<String>) {
        self.rejected.push(pattern.into());
    }

    /// Lifts every rejection set by [`reject_sources_containing`](Self::reject_sources_containing).
    pub fn accept_all_sources(&mut self) {
        self.rejected.clear();
    }

    /// Number of linked programs.
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// The label `program` was linked under.
    pub fn program_label(&self, program: ProgramId) -> Option<&str> {
        self.programs.get(program.0).map(|p| p.label.as_str())
    }

    /// The vertex and fragment sources of `program`.
    pub fn program_sources(&self, program: ProgramId) -> Option<(&str, &str)> {
        self.programs
            .get(program.0)
            .map(|p| (p.vertex_source.as_str(), p.fragment_source.as_str()))
    }

    /// The last value uploaded to uniform `name` of `program`.
    pub fn uniform_value(&self, program: ProgramId, name: &str) -> Option<&RecordedValue> {
        let linked = self.programs.get(program.0)?;
        let location = linked.uniforms.get(name)?;
        linked.values.get(location)
    }

    /// The program in use.
    pub fn current_program(&self) -> Option<ProgramId> {
        self.current_program
    }

    /// The bound framebuffer, `None` for the default surface.
    pub fn bound_framebuffer(&self) -> Option<FramebufferId> {
        self.framebuffer
    }

    /// The texture bound to `unit`.
    pub fn bound_texture(&self, unit: u32) -> Option<(TextureTarget, TextureId)> {
        self.bound_textures.get(&unit).copied()
    }

    /// The viewport as `(x, y, width, height)`.
    pub fn viewport_rect(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    /// Whether blending is enabled.
    pub fn blending(&self) -> bool {
        self.blending
    }

    /// Whether depth testing is enabled.
    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// The current depth comparison.
    pub fn depth_func(&self) -> DepthFunc {
        self.depth_func
    }

    /// Number of textures created, render target attachments included.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of buffers created.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    fn bound_surface(&mut self) -> &mut Surface {
        match self.framebuffer {
            Some(id) => &mut self.targets[id.0],
            None => &mut self.surface,
        }
    }

    fn program_in_use(&self) -> Result<(ProgramId, &LinkedProgram), ResourceError> {
        let id = self
            .current_program
            .ok_or_else(|| ResourceError::BackendError("no program in use".to_owned()))?;
        let program = self.programs.get(id.0).ok_or(ResourceError::InvalidHandle)?;
        Ok((id, program))
    }

    fn fail(&mut self, error: ShaderError) -> ResourceError {
        log::debug!("HeadlessContext: {error}");
        self.failures.push(error.clone());
        ResourceError::Shader(error)
    }

    fn record_draw(
        &mut self,
        mode: PrimitiveMode,
        count: u32,
        indexed: bool,
    ) -> Result<(), ResourceError> {
        let (program, linked) = self.program_in_use()?;
        let label = linked.label.clone();
        let code = linked
            .uniforms
            .get("uCode")
            .and_then(|location| linked.values.get(location))
            .and_then(|value| match value {
                RecordedValue::Vec4(rgba) => Some(to_rgba8(*rgba)),
                _ => None,
            });
        if let Some(rgba) = code {
            self.bound_surface().fill(rgba);
        }
        self.draws.push(DrawRecord {
            program,
            label,
            mode,
            count,
            indexed,
            framebuffer: self.framebuffer,
            depth_test: self.depth_test,
            depth_func: self.depth_func,
            blending: self.blending,
        });
        Ok(())
    }

    /// Checks that the stages agree and assigns locations.
    fn link(
        label: &str,
        vertex: &CompiledStage,
        fragment: &CompiledStage,
    ) -> Result<LinkedProgram, String> {
        if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
            return Err("stages attached in the wrong slots".to_owned());
        }
        for varying in &fragment.interface.varyings {
            let written = vertex
                .interface
                .varyings
                .iter()
                .any(|v| v.name == varying.name && v.ty == varying.ty);
            if !written {
                return Err(format!(
                    "varying '{} {}' is not written by the vertex stage",
                    varying.ty, varying.name
                ));
            }
        }

        let mut uniforms = AHashMap::new();
        let mut declared: AHashMap<&str, &str> = AHashMap::new();
        let mut next = 0u32;
        let stages = [&vertex.interface, &fragment.interface];
        for interface in stages {
            for uniform in &interface.uniforms {
                if let Some(ty) = declared.get(uniform.name.as_str()) {
                    if *ty != uniform.ty {
                        return Err(format!(
                            "uniform '{}' declared as '{ty}' and '{}'",
                            uniform.name, uniform.ty
                        ));
                    }
                    continue;
                }
                declared.insert(&uniform.name, &uniform.ty);
                for aliases in glsl::uniform_names(uniform, &interface.structs) {
                    for alias in aliases {
                        uniforms.insert(alias, UniformLocation(next));
                    }
                    next += 1;
                }
            }
        }

        let attributes = vertex
            .interface
            .attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), AttribLocation(i as u32)))
            .collect();

        Ok(LinkedProgram {
            label: label.to_owned(),
            vertex_source: vertex.source.clone(),
            fragment_source: fragment.source.clone(),
            attributes,
            uniforms,
            uniform_count: next,
            values: AHashMap::new(),
        })
    }
}

impl GraphicsContext for HeadlessContext {
    fn compile_shader(
        &mut self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderId, ResourceError> {
        let scanned = match self.rejected.iter().find(|p| source.contains(p.as_str())) {
            Some(pattern) => Err(format!("source rejected (contains '{pattern}')")),
            None => glsl::scan(stage, source),
        };
        let interface = scanned.map_err(|details| {
            self.fail(ShaderError::CompilationError {
                label: label.to_owned(),
                stage,
                details,
            })
        })?;

        let shader = ShaderId(self.stages.len());
        self.stages.push(CompiledStage {
            stage,
            source: source.to_owned(),
            interface,
        });
        self.commands.push(Command::CompileShader {
            label: label.to_owned(),
            stage,
            shader,
        });
        Ok(shader)
    }

    fn link_program(
        &mut self,
        label: &str,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> Result<ProgramId, ResourceError> {
        let (Some(vs), Some(fs)) = (self.stages.get(vertex.0), self.stages.get(fragment.0)) else {
            return Err(ResourceError::InvalidHandle);
        };
        let linked = Self::link(label, vs, fs).map_err(|details| {
            self.fail(ShaderError::LinkError {
                label: label.to_owned(),
                details,
            })
        })?;

        let program = ProgramId(self.programs.len());
        log::debug!(
            "HeadlessContext: linked '{label}' as {program:?} ({} uniform slots)",
            linked.uniform_count
        );
        self.programs.push(linked);
        self.commands.push(Command::LinkProgram {
            label: label.to_owned(),
            program,
        });
        Ok(program)
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), ResourceError> {
        if program.0 >= self.programs.len() {
            return Err(ResourceError::InvalidHandle);
        }
        self.current_program = Some(program);
        self.commands.push(Command::UseProgram(program));
        Ok(())
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        self.programs.get(program.0)?.attributes.get(name).copied()
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs.get(program.0)?.uniforms.get(name).copied()
    }

    fn create_buffer(
        &mut self,
        target: BufferTarget,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if data.is_empty() {
            return Err(ResourceError::BackendError("empty buffer".to_owned()));
        }
        let buffer = BufferId(self.buffers.len());
        self.buffers.push(BufferEntry {
            target,
            bytes: data.len(),
        });
        self.commands.push(Command::CreateBuffer {
            buffer,
            target,
            bytes: data.len(),
        });
        Ok(buffer)
    }

    fn bind_vertex_attribute(
        &mut self,
        location: AttribLocation,
        buffer: BufferId,
        components: u32,
    ) -> Result<(), ResourceError> {
        let entry = self.buffers.get(buffer.0).ok_or(ResourceError::InvalidHandle)?;
        if entry.target != BufferTarget::Vertex {
            return Err(ResourceError::BackendError(format!(
                "{buffer:?} is not a vertex buffer"
            )));
        }
        if !(1..=4).contains(&components) {
            return Err(ResourceError::BackendError(format!(
                "{components} components per vertex"
            )));
        }
        self.commands.push(Command::BindVertexAttribute {
            location,
            buffer,
            components,
        });
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) -> Result<(), ResourceError> {
        let entry = self.buffers.get(buffer.0).ok_or(ResourceError::InvalidHandle)?;
        if entry.target != BufferTarget::Index {
            return Err(ResourceError::BackendError(format!(
                "{buffer:?} is not an index buffer"
            )));
        }
        self.index_buffer = Some(buffer);
        self.commands.push(Command::BindIndexBuffer(buffer));
        Ok(())
    }

    fn create_texture(
        &mut self,
        data: &TextureData,
        _options: &TextureOptions,
    ) -> Result<TextureId, ResourceError> {
        let texture = TextureId(self.textures.len());
        self.textures.push(TextureEntry {
            target: TextureTarget::Texture2D,
            width: data.width,
            height: data.height,
        });
        self.commands.push(Command::CreateTexture {
            texture,
            width: data.width,
            height: data.height,
        });
        Ok(texture)
    }

    fn create_cube_texture(
        &mut self,
        data: &CubeTextureData,
        _options: &TextureOptions,
    ) -> Result<TextureId, ResourceError> {
        let size = data.faces[0].width;
        if data.faces.iter().any(|f| f.width != size || f.height != size) {
            return Err(ResourceError::BackendError(
                "cube faces must be square and share one size".to_owned(),
            ));
        }
        let texture = TextureId(self.textures.len());
        self.textures.push(TextureEntry {
            target: TextureTarget::CubeMap,
            width: size,
            height: size,
        });
        self.commands.push(Command::CreateCubeTexture(texture));
        Ok(texture)
    }

    fn update_texture(
        &mut self,
        texture: TextureId,
        data: &TextureData,
    ) -> Result<(), ResourceError> {
        let entry = self
            .textures
            .get_mut(texture.0)
            .ok_or(ResourceError::InvalidHandle)?;
        if entry.target != TextureTarget::Texture2D {
            return Err(ResourceError::InvalidHandle);
        }
        entry.width = data.width;
        entry.height = data.height;
        self.commands.push(Command::UpdateTexture(texture));
        Ok(())
    }

    fn bind_texture(
        &mut self,
        unit: u32,
        target: TextureTarget,
        texture: TextureId,
    ) -> Result<(), ResourceError> {
        let entry = self.textures.get(texture.0).ok_or(ResourceError::InvalidHandle)?;
        if entry.target != target {
            return Err(ResourceError::BackendError(format!(
                "{texture:?} bound as {target:?} but created as {:?}",
                entry.target
            )));
        }
        self.bound_textures.insert(unit, (target, texture));
        self.commands.push(Command::BindTexture {
            unit,
            target,
            texture,
        });
        Ok(())
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RenderTarget, ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::BackendError(format!(
                "render target of {width}x{height}"
            )));
        }
        let color = TextureId(self.textures.len());
        self.textures.push(TextureEntry {
            target: TextureTarget::Texture2D,
            width,
            height,
        });
        let framebuffer = FramebufferId(self.targets.len());
        self.targets.push(Surface::new(width, height));
        self.commands.push(Command::CreateRenderTarget(framebuffer));
        Ok(RenderTarget {
            framebuffer,
            color,
            width,
            height,
        })
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) -> Result<(), ResourceError> {
        if let Some(id) = framebuffer {
            if id.0 >= self.targets.len() {
                return Err(ResourceError::InvalidHandle);
            }
        }
        self.framebuffer = framebuffer;
        self.commands.push(Command::BindFramebuffer(framebuffer));
        Ok(())
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
        self.commands.push(Command::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear(&mut self, color: Color, depth: f32) {
        let rgba = to_rgba8(color.to_array());
        self.bound_surface().fill(rgba);
        self.commands.push(Command::Clear { color, depth });
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
        self.commands.push(Command::SetBlending(enabled));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
        self.commands.push(Command::SetDepthTest(enabled));
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.depth_func = func;
        self.commands.push(Command::SetDepthFunc(func));
    }

    fn set_uniform(
        &mut self,
        location: UniformLocation,
        value: UniformValue<'_>,
    ) -> Result<(), ResourceError> {
        let (id, linked) = self.program_in_use()?;
        if location.0 >= linked.uniform_count {
            return Err(ResourceError::InvalidHandle);
        }
        let value = RecordedValue::from(value);
        self.programs[id.0].values.insert(location, value.clone());
        self.commands.push(Command::SetUniform { location, value });
        Ok(())
    }

    fn draw_arrays(
        &mut self,
        mode: PrimitiveMode,
        first: u32,
        count: u32,
    ) -> Result<(), ResourceError> {
        self.record_draw(mode, count, false)?;
        self.commands.push(Command::DrawArrays { mode, first, count });
        Ok(())
    }

    fn draw_elements(
        &mut self,
        mode: PrimitiveMode,
        count: u32,
        format: IndexFormat,
    ) -> Result<(), ResourceError> {
        let buffer = self
            .index_buffer
            .ok_or_else(|| ResourceError::BackendError("no index buffer bound".to_owned()))?;
        let available = self.buffers[buffer.0].bytes;
        if count as usize * index_size(format) > available {
            return Err(ResourceError::OutOfBounds);
        }
        self.record_draw(mode, count, true)?;
        self.commands
            .push(Command::DrawElements { mode, count, format });
        Ok(())
    }

    fn read_pixel(&mut self, x: u32, y: u32) -> Result<[u8; 4], ResourceError> {
        self.commands.push(Command::ReadPixel { x, y });
        self.bound_surface()
            .get(x, y)
            .ok_or(ResourceError::OutOfBounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERT: &str = "\
attribute vec3 aPosition;
uniform mat4 uMVP;
varying vec2 vUV;
void main() {
    vUV = aPosition.xy;
    gl_Position = uMVP * vec4(aPosition, 1.0);
}
";
    const FRAG: &str = "\
precision mediump float;
uniform vec4 uCode;
uniform float uKernel[9];
varying vec2 vUV;
void main() {
    gl_FragColor = uCode * uKernel[0];
}
";

    fn linked(ctx: &mut HeadlessContext) -> ProgramId {
        let vs = ctx.compile_shader("test", ShaderStage::Vertex, VERT).unwrap();
        let fs = ctx.compile_shader("test", ShaderStage::Fragment, FRAG).unwrap();
        ctx.link_program("test", vs, fs).unwrap()
    }

    #[test]
    fn locations_resolve_declared_names_only() {
        let mut ctx = HeadlessContext::new(4, 4);
        let program = linked(&mut ctx);
        assert_eq!(ctx.attrib_location(program, "aPosition"), Some(AttribLocation(0)));
        assert!(ctx.attrib_location(program, "aNormal").is_none());
        assert!(ctx.uniform_location(program, "uMVP").is_some());
        assert_eq!(
            ctx.uniform_location(program, "uKernel"),
            ctx.uniform_location(program, "uKernel[0]")
        );
        assert!(ctx.uniform_location(program, "uKernel[9]").is_none());
        assert!(ctx.uniform_location(program, "uMissing").is_none());
    }

    #[test]
    fn link_rejects_unwritten_varyings() {
        let mut ctx = HeadlessContext::new(4, 4);
        let vs = ctx
            .compile_shader(
                "bad",
                ShaderStage::Vertex,
                "attribute vec3 aPosition;\nvoid main() { gl_Position = vec4(aPosition, 1.0); }",
            )
            .unwrap();
        let fs = ctx.compile_shader("bad", ShaderStage::Fragment, FRAG).unwrap();
        let err = ctx.link_program("bad", vs, fs).unwrap_err();
        assert!(matches!(err, ResourceError::Shader(ShaderError::LinkError { .. })));
        assert_eq!(ctx.shader_failures().len(), 1);
    }

    #[test]
    fn rejected_sources_fail_to_compile() {
        let mut ctx = HeadlessContext::new(4, 4);
        ctx.reject_sources_containing("uKernel");
        let err = ctx
            .compile_shader("k", ShaderStage::Fragment, FRAG)
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Shader(ShaderError::CompilationError {
                stage: ShaderStage::Fragment,
                ..
            })
        ));
        ctx.accept_all_sources();
        assert!(ctx.compile_shader("k", ShaderStage::Fragment, FRAG).is_ok());
    }

    #[test]
    fn pick_code_fills_the_bound_target() {
        let mut ctx = HeadlessContext::new(4, 4);
        let program = linked(&mut ctx);
        let target = ctx.create_render_target(4, 4).unwrap();
        ctx.bind_framebuffer(Some(target.framebuffer)).unwrap();
        ctx.clear(Color::TRANSPARENT, 1.0);
        assert_eq!(ctx.read_pixel(1, 1).unwrap(), [0, 0, 0, 0]);

        ctx.use_program(program).unwrap();
        let code = ctx.uniform_location(program, "uCode").unwrap();
        ctx.set_uniform(code, UniformValue::Vec4([0.0, 0.0, 100.0 / 255.0, 1.0]))
            .unwrap();
        ctx.draw_arrays(PrimitiveMode::Triangles, 0, 3).unwrap();
        assert_eq!(ctx.read_pixel(1, 1).unwrap(), [0, 0, 100, 255]);
        assert_eq!(ctx.read_pixel(4, 0), Err(ResourceError::OutOfBounds));

        ctx.bind_framebuffer(None).unwrap();
        assert_eq!(ctx.read_pixel(1, 1).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn draws_need_a_program_and_enough_indices() {
        let mut ctx = HeadlessContext::new(4, 4);
        assert!(ctx.draw_arrays(PrimitiveMode::Triangles, 0, 3).is_err());

        let program = linked(&mut ctx);
        ctx.use_program(program).unwrap();
        let indices = ctx.create_buffer(BufferTarget::Index, &[0u8; 12]).unwrap();
        ctx.bind_index_buffer(indices).unwrap();
        assert!(ctx
            .draw_elements(PrimitiveMode::Triangles, 6, IndexFormat::Uint16)
            .is_ok());
        assert_eq!(
            ctx.draw_elements(PrimitiveMode::Triangles, 7, IndexFormat::Uint16),
            Err(ResourceError::OutOfBounds)
        );
        assert_eq!(ctx.draws().len(), 1);
        assert!(ctx.draws()[0].indexed);
    }

    #[test]
    fn uniform_values_are_kept_per_program() {
        let mut ctx = HeadlessContext::new(4, 4);
        let program = linked(&mut ctx);
        ctx.use_program(program).unwrap();
        let kernel = ctx.uniform_location(program, "uKernel").unwrap();
        let weights = [1.0f32; 9];
        ctx.set_uniform(kernel, UniformValue::FloatArray(&weights))
            .unwrap();
        assert_eq!(
            ctx.uniform_value(program, "uKernel[0]"),
            Some(&RecordedValue::FloatArray(weights.to_vec()))
        );
        assert_eq!(
            ctx.set_uniform(UniformLocation(99), UniformValue::Int(0)),
            Err(ResourceError::InvalidHandle)
        );
    }
}
