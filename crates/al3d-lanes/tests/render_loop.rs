use al3d_core::asset::{CubeTexture, Material, Shading, Sides, Texture};
use al3d_core::math::{Color, MathError, Vec3};
use al3d_core::renderer::{
    CubeTextureData, DepthFunc, Light, RenderError, RendererConfig, ResourceError, ShaderError,
    TextureData, TextureOptions, TextureTarget,
};
use al3d_core::scene::{Camera, Fog, Mesh, Scene, SkyBox};
use al3d_infra::graphics::headless::RecordedValue;
use al3d_infra::HeadlessContext;
use al3d_lanes::render_lane::{RenderLane, Renderer};
use approx::assert_relative_eq;

fn renderer() -> Renderer<HeadlessContext> {
    Renderer::new(HeadlessContext::new(64, 64), RendererConfig::with_size(64, 64))
}

fn camera() -> Camera {
    let mut camera = Camera::default();
    camera
        .look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y)
        .unwrap();
    camera
}

fn mesh_labels(renderer: &Renderer<HeadlessContext>) -> Vec<String> {
    renderer
        .context()
        .draws()
        .iter()
        .map(|draw| draw.label.clone())
        .collect()
}

#[test]
fn lambert_cube_with_one_directional_light() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::lambert()));
    scene.add(Light::directional(Vec3::new(1.0, 1.0, 1.0)));

    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.programs_built, 1);
    assert_eq!(stats.meshes_drawn, 1);
    assert_eq!(stats.draw_calls, 1);
    assert!(!scene.needs_update());

    let ctx = renderer.context();
    let draw = &ctx.draws()[0];
    assert_eq!(draw.label, "LambertMaterial1NOTEXTUREAL0DL1PL0");
    assert!(draw.indexed);
    assert_eq!(draw.count, 36);
    assert!(draw.depth_test);

    let (vertex, fragment) = ctx.program_sources(draw.program).unwrap();
    assert_eq!(vertex.matches("fColor += calculeDirectionalLight(").count(), 1);
    assert!(!fragment.contains("calculeDirectionalLight"));

    // The camera only translates, so the direction reaches the shader unchanged.
    match ctx.uniform_value(draw.program, "directionalLights[0].position") {
        Some(RecordedValue::Vec3([x, y, z])) => {
            assert_relative_eq!(*x, 1.0);
            assert_relative_eq!(*y, 1.0);
            assert_relative_eq!(*z, 1.0);
        }
        other => panic!("unexpected light position {other:?}"),
    }
}

#[test]
fn unchanged_scenes_reuse_their_programs() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::phong()));
    scene.add(Mesh::sphere(1.0, Material::phong()));
    scene.add(Light::point(Vec3::new(0.0, 2.0, 0.0)));

    let first = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(first.programs_built, 1);
    let second = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(second.programs_built, 0);
    assert_eq!(second.meshes_drawn, 2);
    assert_eq!(renderer.programs().len(), 1);
    assert_eq!(renderer.context().program_count(), 1);
}

#[test]
fn spot_light_count_does_not_split_programs() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::lambert().with_shading(Shading::Phong)));
    scene.add(Light::spot(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0)));
    renderer.render(&mut scene, &camera()).unwrap();

    scene.add(Light::spot(Vec3::new(2.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0)));
    scene.add(Light::spot(Vec3::new(-2.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0)));
    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.programs_built, 0);
    assert_eq!(renderer.programs().len(), 1);

    let ctx = renderer.context();
    let program = ctx.draws().last().unwrap().program;
    assert_eq!(
        ctx.uniform_value(program, "uSpotLightCount"),
        Some(&RecordedValue::Int(3))
    );
}

#[test]
fn more_directional_lights_regenerate_the_program() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    let cube = scene.add(Mesh::cube(1.0, Material::lambert()));
    scene.add(Light::directional(Vec3::Y));
    renderer.render(&mut scene, &camera()).unwrap();

    scene.add(Light::directional(Vec3::X));
    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.programs_built, 1);
    assert_eq!(renderer.programs().len(), 2);
    let key = scene.mesh(cube).and_then(|mesh| mesh.program()).unwrap();
    assert_eq!(key.key.as_str(), "LambertMaterial1NOTEXTUREAL0DL2PL0");
}

#[test]
fn translucent_meshes_draw_last_without_depth_test() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    let glass = Color::WHITE.with_alpha(0.5);
    scene.add(Mesh::cube(1.0, Material::lambert().with_diffuse(glass)).at(Vec3::new(0.0, 0.0, 2.0)));
    scene.add(Mesh::cube(1.0, Material::phong()));
    scene.add(Mesh::cube(1.0, Material::basic().with_diffuse(glass)).at(Vec3::new(0.0, 0.0, -3.0)));
    scene.add(Light::directional(Vec3::Y));

    renderer.render(&mut scene, &camera()).unwrap();
    let draws = renderer.context().draws();
    let order: Vec<(&str, bool)> = draws
        .iter()
        .map(|draw| (draw.label.split("Material").next().unwrap_or(""), draw.depth_test))
        .collect();
    // Opaque first, then the glass furthest from the eye (z = -3), then the nearest.
    assert_eq!(order, [("Phong", true), ("Basic", false), ("Lambert", false)]);
    assert!(draws.iter().all(|draw| draw.blending));
    assert!(renderer.context().depth_test());
}

#[test]
fn compile_failures_are_reported_and_retried() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::lambert()));
    scene.add(Light::directional(Vec3::Y));
    renderer
        .context_mut()
        .reject_sources_containing("calculeDirectionalLight");

    let err = renderer.render(&mut scene, &camera()).unwrap_err();
    assert!(matches!(
        err,
        RenderError::ResourceError(ResourceError::Shader(ShaderError::CompilationError { .. }))
    ));
    assert!(scene.needs_update());
    assert!(renderer.programs().is_empty());

    renderer.context_mut().accept_all_sources();
    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.programs_built, 1);
    assert!(!scene.needs_update());
}

#[test]
fn fog_is_propagated_on_update() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::basic()));
    scene.set_fog(Some(Fog::exp2()));
    renderer.render(&mut scene, &camera()).unwrap();

    let ctx = renderer.context();
    let draw = &ctx.draws()[0];
    assert!(draw.label.ends_with("+FOGExp2"));
    assert_eq!(
        ctx.uniform_value(draw.program, "uFogDensity"),
        Some(&RecordedValue::Float(1.0))
    );
    let (_, fragment) = ctx.program_sources(draw.program).unwrap();
    assert!(fragment.contains("calculeExp2FogFactor"));
}

#[test]
fn material_edits_between_updates_rebuild_the_program() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    let cube = scene.add(Mesh::cube(1.0, Material::basic()));
    renderer.render(&mut scene, &camera()).unwrap();

    let texture = Texture::from_data(TextureData::solid([255, 0, 0, 255]), TextureOptions::default());
    if let Some(mesh) = scene.mesh_mut(cube) {
        mesh.material.texture = Some(texture);
    }
    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.programs_built, 1);
    let draw = renderer.context().draws().last().unwrap();
    assert!(draw.label.starts_with("BasicMaterialTEXTURE"));
    assert!(renderer.context().bound_texture(0).is_some());
}

#[test]
fn pending_textures_bind_a_placeholder() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    let waiting = Texture::new(TextureOptions::default());
    scene.add(Mesh::cube(1.0, Material::basic().with_texture(waiting)));

    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.meshes_drawn, 1);
    let ctx = renderer.context();
    assert_eq!(ctx.texture_count(), 1);
    assert!(matches!(ctx.bound_texture(0), Some((TextureTarget::Texture2D, _))));
    let program = ctx.draws()[0].program;
    assert_eq!(ctx.uniform_value(program, "uSampler"), Some(&RecordedValue::Int(0)));
}

#[test]
fn skybox_draws_first_behind_everything() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::basic()));
    let faces = std::array::from_fn(|_| TextureData::solid([0, 0, 255, 255]));
    scene.add(SkyBox::new(CubeTexture::from_data(CubeTextureData { faces })));

    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.meshes_drawn, 1);
    let draws = renderer.context().draws();
    assert_eq!(draws[0].label, "skybox");
    assert!(draws[0].depth_test);
    assert_eq!(draws[0].depth_func, DepthFunc::LessEqual);
    assert!(draws[1].depth_test);
    assert_eq!(draws[1].depth_func, DepthFunc::Less);
    assert_eq!(renderer.context().depth_func(), DepthFunc::Less);
}

#[test]
fn render_lane_trait_drives_frames() {
    let mut lane: Box<dyn RenderLane> = Box::new(renderer());
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::basic()));
    assert_eq!(lane.strategy_name(), "Forward");
    let stats = lane.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.meshes_drawn, 1);
}

#[test]
fn toon_and_two_sided_materials_link() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::sphere(1.0, Material::toon(Default::default())));
    scene.add(Mesh::plane(2.0, Material::blinn().with_sides(Sides::TwoSide)));
    scene.add(Light::ambient(Color::from_argb_u32(0xFF333333)));
    scene.add(Light::point(Vec3::new(1.0, 1.0, 1.0)));

    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.programs_built, 2);
    assert!(renderer.context().shader_failures().is_empty());
    let labels = mesh_labels(&renderer);
    assert!(labels.iter().any(|l| l.starts_with("ToonMaterial")));
    assert!(labels.iter().any(|l| l.ends_with("+TWOSIDE")));
}

#[test]
fn zero_length_light_directions_fail_the_update() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::lambert()));
    scene.add(Light::spot(Vec3::new(0.0, 3.0, 0.0), Vec3::ZERO));

    let err = renderer.render(&mut scene, &camera()).unwrap_err();
    assert_eq!(err, RenderError::Math(MathError::DivisionByZero));
    assert!(scene.needs_update());
    assert!(renderer.context().draws().is_empty());
}

#[test]
fn lambert_specular_maps_get_their_own_unit() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    let map = Texture::from_data(TextureData::solid([40, 0, 0, 255]), TextureOptions::default());
    scene.add(Mesh::cube(1.0, Material::lambert().with_specular_map(map)));
    scene.add(Mesh::sphere(1.0, Material::toon(Default::default())));
    scene.add(Light::directional(Vec3::new(0.0, 1.0, 0.0)));

    renderer.render(&mut scene, &camera()).unwrap();
    let ctx = renderer.context();
    assert!(ctx.shader_failures().is_empty());
    let draws = ctx.draws();
    let lambert = draws.iter().find(|d| d.label.contains("+SPECMAP")).unwrap();
    assert_eq!(
        ctx.uniform_value(lambert.program, "uSpecularMapSampler"),
        Some(&RecordedValue::Int(1))
    );
    let toon = draws.iter().find(|d| d.label.starts_with("ToonMaterial")).unwrap();
    assert_eq!(
        ctx.uniform_value(toon.program, "uSamplerToon"),
        Some(&RecordedValue::Int(3))
    );
}

#[test]
fn meshes_sharing_a_texture_upload_it_once() {
    let mut renderer = renderer();
    let mut scene = Scene::new();
    let shared = Texture::from_data(TextureData::solid([9, 9, 9, 255]), TextureOptions::default());
    scene.add(Mesh::cube(1.0, Material::basic().with_texture(shared.clone())));
    scene.add(Mesh::plane(2.0, Material::basic().with_texture(shared.clone())));

    let stats = renderer.render(&mut scene, &camera()).unwrap();
    assert_eq!(stats.meshes_drawn, 2);
    assert_eq!(renderer.context().texture_count(), 1);
    assert!(shared.is_ready());
}
