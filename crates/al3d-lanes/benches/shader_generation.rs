use al3d_core::asset::{Material, Shading};
use al3d_core::renderer::{LightCounts, RendererConfig};
use al3d_core::scene::Mesh;
use al3d_infra::HeadlessContext;
use al3d_lanes::render_lane::{generate, ProgramCache, ShaderPermutation};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_generation(c: &mut Criterion) {
    let counts = LightCounts {
        ambient: 1,
        directional: 2,
        point: 3,
        spot: 1,
    };
    let meshes = [
        Mesh::cube(1.0, Material::basic()),
        Mesh::cube(1.0, Material::lambert()),
        Mesh::sphere(1.0, Material::phong().with_shading(Shading::Phong)),
        Mesh::sphere(1.0, Material::blinn()),
        Mesh::plane(1.0, Material::toon(Default::default())),
    ];
    let permutations: Vec<ShaderPermutation> = meshes
        .iter()
        .map(|mesh| ShaderPermutation::for_mesh(mesh, counts))
        .collect();

    let mut group = c.benchmark_group("Shader Permutations");

    group.bench_function("Key derivation", |b| {
        b.iter(|| {
            for mesh in &meshes {
                black_box(ShaderPermutation::for_mesh(black_box(mesh), counts));
            }
        });
    });

    group.bench_function("Source generation", |b| {
        b.iter(|| {
            for permutation in &permutations {
                black_box(generate(black_box(permutation)));
            }
        });
    });

    // Every lookup after the first frame is a hit, so this is the steady state.
    group.bench_function("Cache hits (headless)", |b| {
        let config = RendererConfig::default();
        let mut ctx = HeadlessContext::new(config.width, config.height);
        let mut cache = ProgramCache::default();
        for permutation in &permutations {
            let _ = cache.get_or_build(&mut ctx, permutation);
        }
        b.iter(|| {
            for permutation in &permutations {
                let _ = black_box(cache.get_or_build(&mut ctx, permutation));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
