use al3d_core::asset::Material;
use al3d_core::math::Vec3;
use al3d_core::renderer::RendererConfig;
use al3d_core::scene::{Camera, Mesh, Scene};
use al3d_infra::graphics::headless::RecordedValue;
use al3d_infra::HeadlessContext;
use al3d_lanes::postprocess_lane::{ColorEffect, KernelEffect};
use al3d_lanes::render_lane::Renderer;
use approx::assert_relative_eq;

fn setup() -> (Renderer<HeadlessContext>, Scene, Camera) {
    let renderer = Renderer::new(HeadlessContext::new(64, 64), RendererConfig::with_size(64, 64));
    let mut scene = Scene::new();
    scene.add(Mesh::cube(1.0, Material::basic()));
    let mut camera = Camera::default();
    camera
        .look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y)
        .unwrap();
    (renderer, scene, camera)
}

#[test]
fn color_effects_draw_a_fullscreen_quad_last() {
    let (mut renderer, mut scene, camera) = setup();
    renderer.add_effect(ColorEffect::Sepia);

    let stats = renderer.render(&mut scene, &camera).unwrap();
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.meshes_drawn, 1);

    let ctx = renderer.context();
    let draws = ctx.draws();
    let scene_draw = &draws[0];
    assert!(scene_draw.framebuffer.is_some());
    assert!(scene_draw.indexed);

    let quad = draws.last().unwrap();
    assert_eq!(quad.label, "Sepia");
    assert_eq!(quad.framebuffer, None);
    assert_eq!(quad.count, 6);
    assert!(!quad.indexed);
    assert!(!quad.depth_test);
    assert_eq!(
        ctx.uniform_value(quad.program, "uSampler"),
        Some(&RecordedValue::Int(0))
    );
    assert_eq!(ctx.bound_framebuffer(), None);
    assert!(ctx.depth_test());
}

#[test]
fn kernel_effects_upload_normalized_weights_and_size() {
    let (mut renderer, mut scene, camera) = setup();
    renderer.add_effect(KernelEffect::gaussian_blur());
    renderer.render(&mut scene, &camera).unwrap();

    let ctx = renderer.context();
    let quad = ctx.draws().last().unwrap();
    assert_eq!(quad.label, "GaussianBlur");
    match ctx.uniform_value(quad.program, "uKernel") {
        Some(RecordedValue::FloatArray(weights)) => {
            assert_eq!(weights.len(), 9);
            assert_relative_eq!(weights.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(weights[4], 0.25);
        }
        other => panic!("unexpected kernel {other:?}"),
    }
    assert_eq!(
        ctx.uniform_value(quad.program, "uTextureSize"),
        Some(&RecordedValue::Vec2([64.0, 64.0]))
    );
}

#[test]
fn effects_replace_each_other_and_can_be_cleared() {
    let (mut renderer, mut scene, camera) = setup();
    renderer.add_effect(ColorEffect::Negative);
    renderer.add_effect(KernelEffect::edge_detection());
    assert_eq!(renderer.effect().map(|e| e.label()), Some("EdgeDetection"));

    renderer.render(&mut scene, &camera).unwrap();
    let labels: Vec<&str> = renderer
        .context()
        .draws()
        .iter()
        .map(|draw| draw.label.as_str())
        .collect();
    assert!(!labels.contains(&"Negative"));
    assert_eq!(labels.last(), Some(&"EdgeDetection"));

    renderer.clear_effects();
    assert!(renderer.effect().is_none());
    renderer.context_mut().clear_log();
    let stats = renderer.render(&mut scene, &camera).unwrap();
    assert_eq!(stats.draw_calls, 1);
    assert!(renderer
        .context()
        .draws()
        .iter()
        .all(|draw| draw.framebuffer.is_none()));
}

#[test]
fn effects_follow_resizes() {
    let (mut renderer, mut scene, camera) = setup();
    renderer.add_effect(KernelEffect::sharpen());
    renderer.render(&mut scene, &camera).unwrap();

    renderer.resize(32, 16);
    renderer.render(&mut scene, &camera).unwrap();
    let ctx = renderer.context();
    let quad = ctx.draws().last().unwrap();
    assert_eq!(
        ctx.uniform_value(quad.program, "uTextureSize"),
        Some(&RecordedValue::Vec2([32.0, 16.0]))
    );
    assert_eq!(ctx.viewport_rect(), (0, 0, 32, 16));
}
