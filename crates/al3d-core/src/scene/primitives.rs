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

//! Builders for the stock shapes.
//!
//! Cubes, planes and spheres are plain indexed [`Geometry`]. Circles, cylinders
//! and cones are [`DrawStrategy`] parts: fans for the caps, a triangle list for
//! the side, each part with its own normal and uv streams.

use super::geometry::{DrawPart, DrawStrategy, Geometry};
use super::mesh::Mesh;
use crate::asset::Material;
use crate::math::{Vec2, Vec3, PI, TAU};
use crate::renderer::PrimitiveMode;

const SPHERE_LATITUDES: u32 = 50;
const SPHERE_LONGITUDES: u32 = 50;
const ROUND_POLYGONS: usize = 50;
const CIRCLE_RESOLUTION: usize = 20;

/// An axis-aligned cube centred on the origin: 24 vertices, 36 indices.
pub fn cube(size: f32) -> Geometry {
    let n = size / 2.0;
    #[rustfmt::skip]
    let corners: [[f32; 3]; 24] = [
        // front
        [-n, -n,  n], [ n, -n,  n], [ n,  n,  n], [-n,  n,  n],
        // back
        [-n, -n, -n], [-n,  n, -n], [ n,  n, -n], [ n, -n, -n],
        // top
        [-n,  n, -n], [-n,  n,  n], [ n,  n,  n], [ n,  n, -n],
        // bottom
        [-n, -n, -n], [ n, -n, -n], [ n, -n,  n], [-n, -n,  n],
        // right
        [ n, -n, -n], [ n,  n, -n], [ n,  n,  n], [ n, -n,  n],
        // left
        [-n, -n, -n], [-n, -n,  n], [-n,  n,  n], [-n,  n, -n],
    ];
    let face_normals = [
        Vec3::Z,
        -Vec3::Z,
        Vec3::Y,
        -Vec3::Y,
        Vec3::X,
        -Vec3::X,
    ];
    #[rustfmt::skip]
    let face_uvs: [[[f32; 2]; 4]; 6] = [
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
        [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]],
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    ];

    let vertices = corners.iter().map(|&[x, y, z]| Vec3::new(x, y, z)).collect();
    let normals = face_normals
        .iter()
        .flat_map(|&normal| [normal; 4])
        .collect();
    let uvs = face_uvs
        .iter()
        .flatten()
        .map(|&[u, v]| Vec2::new(u, v))
        .collect();
    let indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect();

    Geometry {
        vertices,
        indices,
        normals: Some(normals),
        uvs: Some(uvs),
    }
}

/// A square in the XY plane facing `+Z`.
pub fn plane(size: f32) -> Geometry {
    let n = size / 2.0;
    Geometry {
        vertices: vec![
            Vec3::new(-n, -n, 0.0),
            Vec3::new(n, -n, 0.0),
            Vec3::new(n, n, 0.0),
            Vec3::new(-n, n, 0.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
        normals: Some(vec![Vec3::Z; 4]),
        uvs: Some(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]),
    }
}

/// A latitude/longitude sphere of 50 x 50 bands.
pub fn sphere(radius: f32) -> Geometry {
    let (lats, longs) = (SPHERE_LATITUDES, SPHERE_LONGITUDES);
    let capacity = ((lats + 1) * (longs + 1)) as usize;
    let mut vertices = Vec::with_capacity(capacity);
    let mut normals = Vec::with_capacity(capacity);
    let mut uvs = Vec::with_capacity(capacity);

    for lat in 0..=lats {
        let theta = lat as f32 * PI / lats as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for long in 0..=longs {
            let phi = long as f32 * TAU / longs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let normal = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            vertices.push(normal * radius);
            normals.push(normal);
            uvs.push(Vec2::new(
                1.0 - long as f32 / longs as f32,
                1.0 - lat as f32 / lats as f32,
            ));
        }
    }

    let mut indices = Vec::with_capacity((lats * longs * 6) as usize);
    for lat in 0..lats {
        for long in 0..longs {
            let first = lat * (longs + 1) + long;
            let second = first + longs + 1;
            indices.extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    Geometry {
        vertices,
        indices,
        normals: Some(normals),
        uvs: Some(uvs),
    }
}

/// Points on a horizontal ring at height `y`; the first point is repeated at the end.
fn ring(segments: usize, y: f32, radius: f32) -> Vec<Vec3> {
    let step = TAU / segments as f32;
    (0..=segments)
        .map(|i| {
            let (sin, cos) = (step * i as f32).sin_cos();
            Vec3::new(radius * cos, y, radius * sin)
        })
        .collect()
}

/// Texture coordinates mapping a ring onto the unit disc of the texture.
fn disc_uvs(segments: usize) -> Vec<Vec2> {
    let step = TAU / segments as f32;
    std::iter::once(Vec2::new(0.5, 0.5))
        .chain((0..=segments).map(|i| {
            let (sin, cos) = (step * i as f32).sin_cos();
            Vec2::new(0.5 * cos + 0.5, 0.5 * sin + 0.5)
        }))
        .collect()
}

/// A triangle fan closing `rim` around `centre`.
fn cap(centre: Vec3, rim: &[Vec3], normal: Vec3) -> DrawPart {
    let positions: Vec<Vec3> = std::iter::once(centre).chain(rim.iter().copied()).collect();
    let normals = vec![normal; positions.len()];
    DrawPart::new(
        PrimitiveMode::TriangleFan,
        positions,
        normals,
        disc_uvs(rim.len() - 1),
    )
}

/// The side wall between two rings, as a triangle list.
///
/// `slope` is the outward tilt of the wall normal (0 for a cylinder).
fn side(bottom: &[Vec3], top: &[Vec3], slope: f32) -> DrawPart {
    let segments = bottom.len() - 1;
    let mut positions = Vec::with_capacity(segments * 6);
    let mut normals = Vec::with_capacity(segments * 6);
    let mut uvs = Vec::with_capacity(segments * 6);

    let wall_normal = |i: usize| {
        let angle = TAU * i as f32 / segments as f32;
        Vec3::new(angle.cos(), slope, angle.sin()).normalize()
    };
    let u = |i: usize| 1.0 - i as f32 / segments as f32;

    for i in 0..segments {
        let j = i + 1;
        for (index, v, ring) in [
            (i, 0.0, bottom),
            (j, 0.0, bottom),
            (i, 1.0, top),
            (i, 1.0, top),
            (j, 0.0, bottom),
            (j, 1.0, top),
        ] {
            positions.push(ring[index]);
            normals.push(wall_normal(index));
            uvs.push(Vec2::new(u(index), v));
        }
    }

    DrawPart::new(PrimitiveMode::Triangles, positions, normals, uvs)
}

/// A flat disc in the XZ plane, drawn as one fan facing `-Y`.
pub fn circle(radius: f32, resolution: usize) -> DrawStrategy {
    let segments = resolution.max(3);
    DrawStrategy {
        parts: vec![cap(Vec3::ZERO, &ring(segments, 0.0, radius), -Vec3::Y)],
    }
}

/// An upright cylinder centred on the origin: bottom cap, side, top cap.
pub fn cylinder(radius: f32, height: f32) -> DrawStrategy {
    let half = height / 2.0;
    let bottom = ring(ROUND_POLYGONS, -half, radius);
    let top = ring(ROUND_POLYGONS, half, radius);
    DrawStrategy {
        parts: vec![
            cap(Vec3::new(0.0, -half, 0.0), &bottom, -Vec3::Y),
            side(&bottom, &top, 0.0),
            cap(Vec3::new(0.0, half, 0.0), &top, Vec3::Y),
        ],
    }
}

/// An upright cone centred on the origin, apex at `+Y`.
///
/// The top cap collapses onto the apex; it is kept so the part layout matches
/// the cylinder's.
pub fn cone(radius: f32, height: f32) -> DrawStrategy {
    let half = height / 2.0;
    let bottom = ring(ROUND_POLYGONS, -half, radius);
    let apex = ring(ROUND_POLYGONS, half, 0.0);
    let slope = if height == 0.0 { 0.0 } else { radius / height };
    DrawStrategy {
        parts: vec![
            cap(Vec3::new(0.0, -half, 0.0), &bottom, -Vec3::Y),
            side(&bottom, &apex, slope),
            cap(Vec3::new(0.0, half, 0.0), &apex, Vec3::Y),
        ],
    }
}

impl Mesh {
    /// A cube mesh. See [`cube`].
    pub fn cube(size: f32, material: Material) -> Self {
        Self::new(cube(size), material)
    }

    /// A plane mesh. See [`plane`].
    pub fn plane(size: f32, material: Material) -> Self {
        Self::new(plane(size), material)
    }

    /// A sphere mesh. See [`sphere`].
    pub fn sphere(radius: f32, material: Material) -> Self {
        Self::new(sphere(radius), material)
    }

    /// A disc mesh with the default resolution of 20. See [`circle`].
    pub fn circle(radius: f32, material: Material) -> Self {
        Self::with_strategy(circle(radius, CIRCLE_RESOLUTION), material)
    }

    /// A cylinder mesh. See [`cylinder`].
    pub fn cylinder(radius: f32, height: f32, material: Material) -> Self {
        Self::with_strategy(cylinder(radius, height), material)
    }

    /// A cone mesh. See [`cone`].
    pub fn cone(radius: f32, height: f32, material: Material) -> Self {
        Self::with_strategy(cone(radius, height), material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cube_has_twelve_triangles() {
        let cube = cube(1.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.normals.as_ref().map(Vec::len), Some(24));
        assert_eq!(cube.uvs.as_ref().map(Vec::len), Some(24));
        assert!(cube.indices.iter().all(|&i| i < 24));
        assert_eq!(cube.vertices[2], Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn cube_normals_point_out_of_their_face() {
        let cube = cube(2.0);
        let normals = cube.normals.expect("cube has normals");
        for (vertex, normal) in cube.vertices.iter().zip(&normals) {
            assert_abs_diff_eq!(vertex.dot(*normal), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let sphere = sphere(2.0);
        assert_eq!(sphere.vertices.len(), 51 * 51);
        assert_eq!(sphere.indices.len(), 50 * 50 * 6);
        for v in sphere.vertices.iter().step_by(97) {
            assert_abs_diff_eq!(v.length(), 2.0, epsilon = 1e-4);
        }
        let max = sphere.indices.iter().copied().max().unwrap_or(0);
        assert!(max < sphere.vertices.len() as u32);
    }

    #[test]
    fn cylinder_has_caps_and_side() {
        let strategy = cylinder(1.0, 2.0);
        assert_eq!(strategy.parts.len(), 3);
        let [bottom, wall, top] = &strategy.parts[..] else {
            panic!("three parts expected");
        };
        assert_eq!(bottom.mode, PrimitiveMode::TriangleFan);
        assert_eq!(wall.mode, PrimitiveMode::Triangles);
        assert_eq!(top.mode, PrimitiveMode::TriangleFan);
        assert_eq!(wall.positions.len(), ROUND_POLYGONS * 6);
        assert!(bottom.normals.iter().all(|&n| n == -Vec3::Y));
        assert!(top.normals.iter().all(|&n| n == Vec3::Y));
        for part in &strategy.parts {
            assert_eq!(part.positions.len(), part.normals.len());
            assert_eq!(part.positions.len(), part.uvs.len());
        }
        // Side normals are horizontal for a cylinder.
        assert!(wall.normals.iter().all(|n| n.y.abs() < 1e-6));
    }

    #[test]
    fn cone_wall_normals_tilt_upwards() {
        let strategy = cone(1.0, 1.0);
        assert!(strategy.parts[1].normals.iter().all(|n| n.y > 0.0));
    }

    #[test]
    fn circle_fan_starts_at_centre() {
        let strategy = circle(1.0, 20);
        let fan = &strategy.parts[0];
        assert_eq!(fan.positions[0], Vec3::ZERO);
        assert_eq!(fan.uvs[0], Vec2::new(0.5, 0.5));
        assert_eq!(fan.positions.len(), 22);
        assert_abs_diff_eq!(fan.positions[1], fan.positions[21], epsilon = 1e-5);
    }
}
