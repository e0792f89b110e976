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

//! The forward render loop.
//!
//! A frame goes through these steps:
//!
//! 1. Bind the postprocess target if an effect is registered, then clear.
//! 2. If the scene changed, propagate fog, reclassify lights and assign programs.
//! 3. Order nodes: non-meshes, opaque meshes, then translucent meshes furthest first.
//! 4. Run the pick pass if one is armed.
//! 5. Draw in order; depth testing stops at the first translucent mesh.
//! 6. Run the postprocess effect into the default framebuffer.

use super::generator::ShaderSource;
use super::picker::Picker;
use super::permutation::{ShaderPermutation, MAX_SPOT_LIGHTS};
use super::program_cache::{
    build_program, require_attrib, require_uniform, CompiledProgram, ProgramCache,
    ProgramLocations,
};
use super::shaders::{SKYBOX_FRAG, SKYBOX_VERT};
use super::RenderLane;
use crate::postprocess_lane::{PostEffect, PostProcessPass};
use al3d_core::asset::{MaterialKind, Texture};
use al3d_core::math::{Mat3, Mat4, Vec3};
use al3d_core::renderer::{
    AttribLocation, Attenuation, DepthFunc, FrameStats, GraphicsContext, LightBuckets, LightKind,
    PrimitiveMode, ProgramId, RenderError, RendererConfig, ResourceError, TextureData, TextureId,
    TextureOptions, TextureTarget, UniformLocation, UniformValue,
};
use al3d_core::scene::{AttributeSlots, Camera, Fog, Mesh, Scene, SceneNode, SkyBox};

const COLOR_UNIT: u32 = 0;
const SPECULAR_MAP_UNIT: u32 = 1;
const TOON_RAMP_UNIT: u32 = 3;
const NORMAL_MAP_UNIT: u32 = 2;

/// Node indices in the order a frame draws them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawOrder {
    /// Indices into [`Scene::nodes`].
    pub indices: Vec<usize>,
    /// Position in `indices` of the first translucent mesh; depth testing is
    /// switched off there.
    pub opaque_end: usize,
}

/// Orders the scene for drawing without reordering it.
///
/// Non-mesh nodes come first, then opaque meshes in scene order, then
/// translucent meshes sorted by descending distance from `eye`.
pub fn draw_order(scene: &Scene, eye: Vec3) -> DrawOrder {
    let mut others = Vec::new();
    let mut opaque = Vec::new();
    let mut translucent = Vec::new();
    for (index, (_, node)) in scene.nodes().iter().enumerate() {
        match node {
            SceneNode::Mesh(mesh) if mesh.material.is_translucent() => {
                translucent.push((index, mesh.object.position.distance_to(eye)));
            }
            SceneNode::Mesh(_) => opaque.push(index),
            _ => others.push(index),
        }
    }
    translucent.sort_by(|a, b| b.1.total_cmp(&a.1));

    let opaque_end = others.len() + opaque.len();
    let mut indices = others;
    indices.extend(opaque);
    indices.extend(translucent.into_iter().map(|(index, _)| index));
    DrawOrder {
        indices,
        opaque_end,
    }
}

#[derive(Debug, Clone, Copy)]
struct SkyboxProgram {
    id: ProgramId,
    position: AttribLocation,
    mvp: UniformLocation,
    sampler: Option<UniformLocation>,
}

/// Renders scenes through a [`GraphicsContext`] it owns.
///
/// # Examples
///
/// ```ignore
/// let mut renderer = Renderer::new(HeadlessContext::new(800, 600), RendererConfig::default());
/// let stats = renderer.render(&mut scene, &camera)?;
/// ```
#[derive(Debug)]
pub struct Renderer<C: GraphicsContext> {
    ctx: C,
    config: RendererConfig,
    programs: ProgramCache,
    buckets: LightBuckets,
    picker: Picker,
    postprocess: Option<PostProcessPass>,
    skybox_program: Option<SkyboxProgram>,
    placeholder: Option<TextureId>,
}

impl<C: GraphicsContext> Renderer<C> {
    /// Creates a renderer drawing into `ctx` with the viewport and clear values of `config`.
    pub fn new(mut ctx: C, config: RendererConfig) -> Self {
        ctx.viewport(0, 0, config.width, config.height);
        log::info!(
            "Renderer: created with a {}x{} viewport",
            config.width,
            config.height
        );
        Self {
            picker: Picker::new(config.pick_id_stride),
            ctx,
            config,
            programs: ProgramCache::new(),
            buckets: LightBuckets::default(),
            postprocess: None,
            skybox_program: None,
            placeholder: None,
        }
    }

    /// The graphics context.
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// The graphics context, mutably.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// The active configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Changes the viewport size used from the next frame on.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
    }

    /// The program cache.
    pub fn programs(&self) -> &ProgramCache {
        &self.programs
    }

    /// The lights as classified by the last update.
    pub fn light_buckets(&self) -> &LightBuckets {
        &self.buckets
    }

    /// The picker.
    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// The picker, to arm a pick or register a callback.
    pub fn picker_mut(&mut self) -> &mut Picker {
        &mut self.picker
    }

    /// Registers a postprocess effect, replacing the current one.
    pub fn add_effect(&mut self, effect: impl PostEffect + 'static) {
        log::info!("Renderer: postprocess effect '{}' registered", effect.label());
        self.postprocess = Some(PostProcessPass::new(Box::new(effect)));
    }

    /// Removes the postprocess effect; frames go straight to the default framebuffer.
    pub fn clear_effects(&mut self) {
        self.postprocess = None;
    }

    /// The registered postprocess effect.
    pub fn effect(&self) -> Option<&dyn PostEffect> {
        self.postprocess.as_ref().map(PostProcessPass::effect)
    }

    /// Renders one frame of `scene` seen from `camera`.
    ///
    /// # Errors
    ///
    /// Shader compile, link and location errors, context errors, and
    /// singular normal matrices. A failed update leaves the scene flagged so the
    /// next frame tries again.
    pub fn render(&mut self, scene: &mut Scene, camera: &Camera) -> Result<FrameStats, RenderError> {
        let mut stats = FrameStats::default();
        let (width, height) = (self.config.width, self.config.height);

        let main_target = match self.postprocess.as_mut() {
            Some(pass) => Some(pass.begin(&mut self.ctx, width, height)?),
            None => {
                self.ctx.bind_framebuffer(None)?;
                None
            }
        };
        self.ctx.viewport(0, 0, width, height);
        self.ctx.clear(self.config.clear_color, self.config.clear_depth);

        if scene.needs_update() {
            self.update(scene, &mut stats)?;
            scene.clear_needs_update();
        }

        let order = draw_order(scene, camera.position());
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        if let Some(outcome) = self.picker.run(
            &mut self.ctx,
            scene,
            &order.indices,
            projection * view,
            (width, height),
            main_target,
        )? {
            stats.draw_calls += outcome.draw_calls;
            stats.picked = true;
            self.ctx.viewport(0, 0, width, height);
        }

        self.ctx.set_blending(true);
        self.ctx.set_depth_test(true);
        for (position, &index) in order.indices.iter().enumerate() {
            if position == order.opaque_end {
                self.ctx.set_depth_test(false);
            }
            match &mut scene.nodes_mut()[index].1 {
                SceneNode::SkyBox(skybox) => {
                    stats.draw_calls += self.draw_skybox(skybox, camera, &view, &projection)?;
                }
                SceneNode::Mesh(mesh) => {
                    let draws = self.draw_mesh(mesh, &view, &projection, &mut stats)?;
                    if draws > 0 {
                        stats.meshes_drawn += 1;
                    }
                    stats.draw_calls += draws;
                }
                SceneNode::Light(_) => {}
            }
        }
        self.ctx.set_depth_test(true);

        if let Some(pass) = self.postprocess.as_mut() {
            stats.draw_calls += pass.finish(&mut self.ctx, width, height)?;
        }

        log::debug!(
            "Renderer: frame done, {} draw calls, {} meshes, {} programs built",
            stats.draw_calls,
            stats.meshes_drawn,
            stats.programs_built
        );
        Ok(stats)
    }

    fn update(&mut self, scene: &mut Scene, stats: &mut FrameStats) -> Result<(), RenderError> {
        scene.propagate_fog();
        for light in scene.lights() {
            light.unit_direction()?;
        }
        self.buckets = LightBuckets::classify(scene.lights());
        let counts = self.buckets.counts();
        log::debug!("Renderer: light set reclassified ({counts:?})");
        if counts.spot > MAX_SPOT_LIGHTS {
            log::warn!(
                "Renderer: {} spot lights in the scene, only the first {MAX_SPOT_LIGHTS} are used",
                counts.spot
            );
        }

        for (_, node) in scene.nodes_mut() {
            if let SceneNode::Mesh(mesh) = node {
                let permutation = ShaderPermutation::for_mesh(mesh, counts);
                let (handle, built) = self.programs.get_or_build(&mut self.ctx, &permutation)?;
                if built {
                    stats.programs_built += 1;
                }
                mesh.set_program(handle);
            }
        }
        Ok(())
    }

    /// A 1x1 white texture bound in place of maps whose pixels have not arrived.
    fn placeholder(&mut self) -> Result<TextureId, ResourceError> {
        if let Some(id) = self.placeholder {
            return Ok(id);
        }
        let id = self.ctx.create_texture(
            &TextureData::solid([255, 255, 255, 255]),
            &TextureOptions::default(),
        )?;
        self.placeholder = Some(id);
        Ok(id)
    }

    fn draw_mesh(
        &mut self,
        mesh: &mut Mesh,
        view: &Mat4,
        projection: &Mat4,
        stats: &mut FrameStats,
    ) -> Result<u32, RenderError> {
        // Material edits between updates (a map assigned, sides flipped) only
        // show up here.
        let permutation = ShaderPermutation::for_mesh(mesh, self.buckets.counts());
        let stale = mesh
            .program()
            .and_then(|handle| self.programs.get(handle))
            .map_or(true, |program| program.permutation != permutation);
        if stale {
            let (handle, built) = self.programs.get_or_build(&mut self.ctx, &permutation)?;
            if built {
                stats.programs_built += 1;
            }
            mesh.set_program(handle);
        }

        let material = &mesh.material;
        let waiting = [&material.texture, &material.specular_map, &material.normal_map]
            .into_iter()
            .flatten()
            .any(|texture| !texture.is_ready());
        let placeholder = if waiting {
            Some(self.placeholder()?)
        } else {
            None
        };

        let Some(program) = mesh.program().and_then(|handle| self.programs.get(handle)) else {
            log::warn!(
                "Renderer: {} mesh skipped, its program could not be resolved",
                mesh.material.kind.type_tag()
            );
            return Ok(0);
        };
        let ctx: &mut dyn GraphicsContext = &mut self.ctx;

        ctx.use_program(program.id)?;
        mesh.ensure_buffers(ctx)?;
        bind_material_textures(ctx, mesh, program, placeholder)?;

        let locations = &program.locations;
        let model_view = *view * mesh.object.transform();
        let mvp = *projection * model_view;
        set(ctx, locations, "uMVP", mvp.into())?;
        set(ctx, locations, "uViewModel", model_view.into())?;
        if locations.uniform("uNormalMatrix").is_some() {
            let normal_matrix = model_view.normal_matrix(mesh.object.has_non_unit_scale())?;
            set(ctx, locations, "uNormalMatrix", normal_matrix.into())?;
        }

        upload_material(ctx, locations, mesh)?;
        if program.permutation.is_lit() {
            upload_lights(ctx, locations, &self.buckets, view)?;
        }
        if let Some(fog) = mesh.fog() {
            upload_fog(ctx, locations, fog)?;
        }

        Ok(mesh.draw(ctx, &locations.attributes)?)
    }

    fn skybox_program(&mut self) -> Result<SkyboxProgram, RenderError> {
        if let Some(program) = self.skybox_program {
            return Ok(program);
        }
        let label = "skybox";
        let source = ShaderSource {
            vertex: SKYBOX_VERT.to_owned(),
            fragment: SKYBOX_FRAG.to_owned(),
        };
        let ctx: &mut dyn GraphicsContext = &mut self.ctx;
        let id = build_program(ctx, label, &source)?;
        let program = SkyboxProgram {
            id,
            position: require_attrib(ctx, id, label, "aPosition")?,
            mvp: require_uniform(ctx, id, label, "uMVP")?,
            sampler: ctx.uniform_location(id, "uSkybox"),
        };
        self.skybox_program = Some(program);
        Ok(program)
    }

    fn draw_skybox(
        &mut self,
        skybox: &mut SkyBox,
        camera: &Camera,
        view: &Mat4,
        projection: &Mat4,
    ) -> Result<u32, RenderError> {
        let program = self.skybox_program()?;
        let ctx: &mut dyn GraphicsContext = &mut self.ctx;
        let Some(texture) = skybox.texture.ensure_uploaded(ctx)? else {
            return Ok(0);
        };
        let buffers = skybox.ensure_buffers(ctx)?;

        // The vertex stage writes z = w, so the box sits on the far plane and
        // only passes where nothing nearer was drawn.
        ctx.set_depth_test(true);
        ctx.set_depth_func(DepthFunc::LessEqual);
        ctx.use_program(program.id)?;
        ctx.bind_texture(COLOR_UNIT, TextureTarget::CubeMap, texture)?;
        if let Some(sampler) = program.sampler {
            ctx.set_uniform(sampler, UniformValue::Int(COLOR_UNIT as i32))?;
        }
        let mvp = *projection * *view * skybox.transform_around(camera.position());
        ctx.set_uniform(program.mvp, mvp.into())?;
        let slots = AttributeSlots {
            position: Some(program.position),
            ..AttributeSlots::default()
        };
        buffers.bind(ctx, &slots)?;
        buffers.draw(ctx, PrimitiveMode::Triangles)?;
        ctx.set_depth_func(DepthFunc::Less);
        Ok(1)
    }
}

impl<C: GraphicsContext> RenderLane for Renderer<C> {
    fn strategy_name(&self) -> &'static str {
        "Forward"
    }

    fn render(&mut self, scene: &mut Scene, camera: &Camera) -> Result<FrameStats, RenderError> {
        Renderer::render(self, scene, camera)
    }
}

/// Uploads `value` if the program exposes `name`.
fn set(
    ctx: &mut dyn GraphicsContext,
    locations: &ProgramLocations,
    name: &str,
    value: UniformValue<'_>,
) -> Result<(), ResourceError> {
    match locations.uniform(name) {
        Some(location) => ctx.set_uniform(location, value),
        None => Ok(()),
    }
}

fn bind_map(
    ctx: &mut dyn GraphicsContext,
    locations: &ProgramLocations,
    texture: &Texture,
    unit: u32,
    sampler: &str,
    placeholder: Option<TextureId>,
) -> Result<(), ResourceError> {
    let Some(id) = texture.ensure_uploaded(ctx)?.or(placeholder) else {
        return Ok(());
    };
    ctx.bind_texture(unit, TextureTarget::Texture2D, id)?;
    set(ctx, locations, sampler, UniformValue::Int(unit as i32))
}

/// Binds every map the material carries. The program declares a sampler for
/// each of them, so none is left pointing at a stale unit.
fn bind_material_textures(
    ctx: &mut dyn GraphicsContext,
    mesh: &Mesh,
    program: &CompiledProgram,
    placeholder: Option<TextureId>,
) -> Result<(), ResourceError> {
    let locations = &program.locations;
    let material = &mesh.material;
    let maps = [
        (material.texture.as_ref(), COLOR_UNIT, "uSampler"),
        (material.specular_map.as_ref(), SPECULAR_MAP_UNIT, "uSpecularMapSampler"),
        (material.normal_map.as_ref(), NORMAL_MAP_UNIT, "uNormalMapSampler"),
    ];
    for (texture, unit, sampler) in maps {
        if let Some(texture) = texture {
            bind_map(ctx, locations, texture, unit, sampler, placeholder)?;
        }
    }
    if let MaterialKind::Toon { ramp_texture, .. } = &material.kind {
        bind_map(ctx, locations, ramp_texture, TOON_RAMP_UNIT, "uSamplerToon", None)?;
    }
    Ok(())
}

fn upload_material(
    ctx: &mut dyn GraphicsContext,
    locations: &ProgramLocations,
    mesh: &Mesh,
) -> Result<(), ResourceError> {
    let material = &mesh.material;
    match &material.kind {
        MaterialKind::Basic | MaterialKind::Toon { .. } => {
            set(ctx, locations, "uBaseColor", material.diffuse.into())
        }
        MaterialKind::Lambert => set(
            ctx,
            locations,
            "material.diffuseColor",
            material.diffuse.into(),
        ),
        MaterialKind::Phong(specular) | MaterialKind::Blinn(specular) => {
            set(
                ctx,
                locations,
                "material.diffuseColor",
                material.diffuse.into(),
            )?;
            set(
                ctx,
                locations,
                "material.specularColor",
                specular.color.into(),
            )?;
            set(
                ctx,
                locations,
                "material.shininess",
                specular.shininess.into(),
            )
        }
    }
}

/// Uploads every bucket with positions and directions moved into view space.
fn upload_lights(
    ctx: &mut dyn GraphicsContext,
    locations: &ProgramLocations,
    buckets: &LightBuckets,
    view: &Mat4,
) -> Result<(), ResourceError> {
    let rotation = Mat3::from_mat4(view);
    for (i, light) in buckets.ambient.iter().enumerate() {
        let prefix = format!("ambientLights[{i}]");
        set(ctx, locations, &format!("{prefix}.color"), light.color.into())?;
        set(ctx, locations, &format!("{prefix}.intensity"), light.intensity.into())?;
    }
    for (i, light) in buckets.directional.iter().enumerate() {
        let prefix = format!("directionalLights[{i}]");
        set(ctx, locations, &format!("{prefix}.color"), light.color.into())?;
        set(ctx, locations, &format!("{prefix}.intensity"), light.intensity.into())?;
        if let LightKind::Directional { position } = light.kind {
            let direction = rotation * position;
            set(ctx, locations, &format!("{prefix}.position"), direction.into())?;
        }
    }
    for (i, light) in buckets.point.iter().enumerate() {
        let prefix = format!("pointLights[{i}]");
        set(ctx, locations, &format!("{prefix}.color"), light.color.into())?;
        set(ctx, locations, &format!("{prefix}.intensity"), light.intensity.into())?;
        if let LightKind::Point {
            position,
            attenuation,
        } = light.kind
        {
            let position = view.multiply_by_vector(position);
            set(ctx, locations, &format!("{prefix}.position"), position.into())?;
            upload_attenuation(ctx, locations, &prefix, &attenuation)?;
        }
    }

    let spots = &buckets.spot[..buckets.spot.len().min(MAX_SPOT_LIGHTS)];
    for (i, light) in spots.iter().enumerate() {
        let prefix = format!("spotLights[{i}]");
        set(ctx, locations, &format!("{prefix}.color"), light.color.into())?;
        set(ctx, locations, &format!("{prefix}.intensity"), light.intensity.into())?;
        if let LightKind::Spot {
            position,
            attenuation,
            direction,
            cos_cutoff,
            exponent,
        } = light.kind
        {
            let position = view.multiply_by_vector(position);
            set(ctx, locations, &format!("{prefix}.position"), position.into())?;
            upload_attenuation(ctx, locations, &prefix, &attenuation)?;
            let direction = rotation * direction;
            set(ctx, locations, &format!("{prefix}.coneDirection"), direction.into())?;
            set(ctx, locations, &format!("{prefix}.spotCosCutOff"), cos_cutoff.into())?;
            set(ctx, locations, &format!("{prefix}.spotExponent"), exponent.into())?;
        }
    }
    set(ctx, locations, "uSpotLightCount", UniformValue::Int(spots.len() as i32))
}

fn upload_attenuation(
    ctx: &mut dyn GraphicsContext,
    locations: &ProgramLocations,
    prefix: &str,
    attenuation: &Attenuation,
) -> Result<(), ResourceError> {
    let constant = format!("{prefix}.constantAttenuation");
    let linear = format!("{prefix}.linearAttenuation");
    let quadratic = format!("{prefix}.quadraticAttenuation");
    set(ctx, locations, &constant, attenuation.constant.into())?;
    set(ctx, locations, &linear, attenuation.linear.into())?;
    set(ctx, locations, &quadratic, attenuation.quadratic.into())
}

fn upload_fog(
    ctx: &mut dyn GraphicsContext,
    locations: &ProgramLocations,
    fog: &Fog,
) -> Result<(), ResourceError> {
    set(ctx, locations, "uFogColor", fog.color().into())?;
    match *fog {
        Fog::Linear { start, end, .. } => {
            set(ctx, locations, "uStartFog", start.into())?;
            set(ctx, locations, "uEndFog", end.into())
        }
        Fog::Exp { density, .. } | Fog::Exp2 { density, .. } => {
            set(ctx, locations, "uFogDensity", density.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use al3d_core::asset::Material;
    use al3d_core::math::Color;
    use al3d_core::renderer::Light;
    use al3d_core::scene::Geometry;

    fn translucent_at(z: f32) -> Mesh {
        Mesh::new(
            Geometry::default(),
            Material::lambert().with_diffuse(Color::WHITE.with_alpha(0.5)),
        )
        .at(Vec3::new(0.0, 0.0, z))
    }

    #[test]
    fn translucent_meshes_go_last_furthest_first() {
        let mut scene = Scene::new();
        scene.add(translucent_at(-2.0));
        scene.add(Mesh::new(Geometry::default(), Material::lambert()));
        scene.add(translucent_at(-8.0));
        scene.add(Light::directional(Vec3::Y));
        scene.add(translucent_at(-5.0));

        let order = draw_order(&scene, Vec3::ZERO);
        assert_eq!(order.indices, vec![3, 1, 2, 4, 0]);
        assert_eq!(order.opaque_end, 2);
    }

    #[test]
    fn order_follows_the_eye() {
        let mut scene = Scene::new();
        scene.add(translucent_at(-2.0));
        scene.add(translucent_at(2.0));
        assert_eq!(draw_order(&scene, Vec3::new(0.0, 0.0, 10.0)).indices, vec![0, 1]);
        assert_eq!(draw_order(&scene, Vec3::new(0.0, 0.0, -10.0)).indices, vec![1, 0]);
    }

    #[test]
    fn all_opaque_never_reaches_the_switch() {
        let mut scene = Scene::new();
        scene.add(Mesh::new(Geometry::default(), Material::basic()));
        let order = draw_order(&scene, Vec3::ZERO);
        assert_eq!(order.opaque_end, order.indices.len());
    }
}
