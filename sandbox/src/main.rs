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

//! Renders a small lit scene against the headless context and logs what happened.
//!
//! Run with `RUST_LOG=debug` to see every program build and frame. An image
//! path given as the first argument textures the crate and the floor through
//! one shared cache entry.

use al3d_core::asset::{Material, Shading, Texture};
use al3d_core::math::{Color, Vec3};
use al3d_core::renderer::{Light, RendererConfig, TextureData, TextureOptions};
use al3d_core::scene::{Camera, Fog, Mesh, NodeId, Scene};
use al3d_infra::{logging, HeadlessContext};
use al3d_io::{parse_mesh_json, TextureCache};
use al3d_lanes::postprocess_lane::{ColorEffect, KernelEffect};
use al3d_lanes::render_lane::{RenderLane, Renderer};
use std::cell::Cell;
use std::rc::Rc;

const PYRAMID: &str = r#"{
    "vertices": [0, 1, 0, -1, -1, 1, 1, -1, 1, 1, -1, -1, -1, -1, -1],
    "faces": [0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1, 1, 3, 2, 1, 4, 3]
}"#;

/// Builds the demo scene and returns it with the sphere, which spins between frames.
fn build_scene(
    clicks: &Rc<Cell<u32>>,
    cache: &mut TextureCache,
) -> anyhow::Result<(Scene, NodeId)> {
    let mut scene = Scene::new();

    let image = std::env::args().nth(1);
    let checker = match &image {
        Some(path) => cache.load(path, TextureOptions::default()),
        None => Texture::from_data(
            TextureData::solid([200, 120, 40, 255]),
            TextureOptions::default(),
        ),
    };
    let floor = match &image {
        Some(path) => {
            Material::lambert().with_texture(cache.load(path, TextureOptions::default()))
        }
        None => Material::lambert(),
    };
    let mut crate_box = Mesh::cube(2.0, Material::phong().with_texture(checker))
        .at(Vec3::new(-2.0, 0.0, 0.0));
    let counter = Rc::clone(clicks);
    crate_box.on_click(move || {
        counter.set(counter.get() + 1);
        log::info!("sandbox: crate clicked");
    });
    scene.add(crate_box);

    let sphere = scene.add(
        Mesh::sphere(1.0, Material::blinn().with_shading(Shading::Phong))
            .at(Vec3::new(2.0, 0.0, 0.0)),
    );
    scene.add(Mesh::plane(10.0, floor).at(Vec3::new(0.0, -1.5, 0.0)));
    scene.add(Mesh::new(
        parse_mesh_json(PYRAMID.as_bytes())?,
        Material::toon(Default::default()),
    ));
    scene.add(
        Mesh::cube(1.0, Material::basic().with_diffuse(Color::WHITE.with_alpha(0.4)))
            .at(Vec3::new(0.0, 0.0, 3.0)),
    );

    scene.add(Light::ambient(Color::from_argb_u32(0xFF202020)));
    scene.add(Light::directional(Vec3::new(1.0, 1.0, 1.0)));
    scene.add(Light::point(Vec3::new(0.0, 3.0, 2.0)).with_intensity(0.8));
    scene.add(Light::spot(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0)));
    scene.set_fog(Some(Fog::linear()));
    Ok((scene, sphere))
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = RendererConfig::with_size(320, 240);
    let context = HeadlessContext::new(config.width, config.height);
    let mut renderer = Renderer::new(context, config);

    let clicks = Rc::new(Cell::new(0));
    let mut cache = TextureCache::new()?;
    let (mut scene, sphere) = build_scene(&clicks, &mut cache)?;
    log::info!("sandbox: {} cached texture(s)", cache.len());
    let mut camera = Camera::default();
    camera.look_at(Vec3::new(0.0, 3.0, 12.0), Vec3::ZERO, Vec3::Y)?;

    log::info!("sandbox: rendering with the {} lane", renderer.strategy_name());
    for frame in 0..3 {
        if frame == 1 {
            renderer.picker_mut().pick(160, 120);
            cache.wait_all();
        }
        let stats = renderer.render(&mut scene, &camera)?;
        log::info!("sandbox: frame {frame} {stats:?}");
        if let Some(mesh) = scene.mesh_mut(sphere) {
            mesh.object.rotate_by(Vec3::new(0.0, 30.0, 0.0));
        }
    }
    log::info!(
        "sandbox: pick hit {:?}, {} click(s), {} program(s) cached",
        renderer.picker().last_hit(),
        clicks.get(),
        renderer.programs().len()
    );

    renderer.add_effect(ColorEffect::Sepia);
    let stats = renderer.render(&mut scene, &camera)?;
    log::info!("sandbox: sepia frame {stats:?}");

    renderer.add_effect(KernelEffect::edge_detection());
    let stats = renderer.render(&mut scene, &camera)?;
    log::info!("sandbox: edge detection frame {stats:?}");

    renderer.clear_effects();
    scene.add(Light::directional(Vec3::new(-1.0, 0.5, 0.0)));
    let stats = renderer.render(&mut scene, &camera)?;
    log::info!(
        "sandbox: second directional light rebuilt {} program(s)",
        stats.programs_built
    );

    let failures = renderer.context().shader_failures();
    if !failures.is_empty() {
        anyhow::bail!("{} shader failure(s), first: {}", failures.len(), failures[0]);
    }
    Ok(())
}
