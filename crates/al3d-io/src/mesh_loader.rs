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

//! JSON model loading.
//!
//! A model is one object of flat arrays:
//!
//! ```json
//! { "vertices": [x, y, z, ...], "normals": [x, y, z, ...], "faces": [i, j, k, ...], "uvs": [u, v, ...] }
//! ```
//!
//! Only `vertices` is required. `faces` indexes triangles; without it the
//! vertices are drawn as a plain triangle list.

use crate::error::LoadError;
use al3d_core::asset::AssetLoader;
use al3d_core::math::{Vec2, Vec3};
use al3d_core::scene::Geometry;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct MeshJson {
    vertices: Vec<f32>,
    #[serde(default)]
    normals: Vec<f32>,
    #[serde(default)]
    faces: Vec<u32>,
    #[serde(default)]
    uvs: Vec<f32>,
}

fn vec3s(values: &[f32]) -> Vec<Vec3> {
    values
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect()
}

impl MeshJson {
    fn into_geometry(self) -> Result<Geometry, LoadError> {
        if self.vertices.is_empty() {
            return Err(LoadError::InvalidMesh("no vertices".to_owned()));
        }
        if self.vertices.len() % 3 != 0 {
            return Err(LoadError::InvalidMesh(format!(
                "{} vertex components is not a multiple of 3",
                self.vertices.len()
            )));
        }
        let vertex_count = self.vertices.len() / 3;

        if !self.normals.is_empty() && self.normals.len() != self.vertices.len() {
            return Err(LoadError::InvalidMesh(format!(
                "{} normal components for {vertex_count} vertices",
                self.normals.len()
            )));
        }
        if !self.uvs.is_empty() && self.uvs.len() != vertex_count * 2 {
            return Err(LoadError::InvalidMesh(format!(
                "{} uv components for {vertex_count} vertices",
                self.uvs.len()
            )));
        }
        if self.faces.len() % 3 != 0 {
            return Err(LoadError::InvalidMesh(format!(
                "{} face indices is not a multiple of 3",
                self.faces.len()
            )));
        }
        if let Some(index) = self.faces.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(LoadError::InvalidMesh(format!(
                "face index {index} out of range for {vertex_count} vertices"
            )));
        }

        Ok(Geometry {
            vertices: vec3s(&self.vertices),
            indices: self.faces,
            normals: (!self.normals.is_empty()).then(|| vec3s(&self.normals)),
            uvs: (!self.uvs.is_empty()).then(|| {
                self.uvs
                    .chunks_exact(2)
                    .map(|c| Vec2::new(c[0], c[1]))
                    .collect()
            }),
        })
    }
}

/// Parses and validates a JSON model.
///
/// # Errors
///
/// [`LoadError::Json`] for malformed JSON, [`LoadError::InvalidMesh`] when the
/// stream lengths disagree or a face indexes past the last vertex.
pub fn parse_mesh_json(bytes: &[u8]) -> Result<Geometry, LoadError> {
    let json: MeshJson = serde_json::from_slice(bytes)?;
    json.into_geometry()
}

/// Reads and parses a JSON model from disk.
pub fn load_mesh_file(path: impl AsRef<Path>) -> Result<Geometry, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let geometry = parse_mesh_json(&bytes)?;
    log::debug!(
        "mesh_loader: loaded {} ({} vertices, {} indices)",
        path.display(),
        geometry.vertices.len(),
        geometry.indices.len()
    );
    Ok(geometry)
}

/// An [`AssetLoader`] for JSON models.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMeshLoader;

impl AssetLoader<Geometry> for JsonMeshLoader {
    fn load(&self, bytes: &[u8]) -> Result<Geometry, Box<dyn std::error::Error + Send + Sync>> {
        Ok(parse_mesh_json(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE: &str = r#"{
        "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
        "normals": [0, 0, 1, 0, 0, 1, 0, 0, 1],
        "faces": [0, 1, 2],
        "uvs": [0, 0, 1, 0, 0, 1]
    }"#;

    #[test]
    fn parses_all_streams() {
        let geometry = parse_mesh_json(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(geometry.vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(geometry.indices, vec![0, 1, 2]);
        assert_eq!(geometry.normals.as_ref().map(Vec::len), Some(3));
        assert_eq!(geometry.uvs.as_ref().map(|uvs| uvs[2]), Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn optional_streams_may_be_missing() {
        let geometry = parse_mesh_json(br#"{"vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0]}"#).unwrap();
        assert!(!geometry.is_indexed());
        assert!(geometry.normals.is_none());
        assert!(geometry.uvs.is_none());
        assert_eq!(geometry.draw_count(), 3);
    }

    #[test]
    fn rejects_inconsistent_streams() {
        let cases = [
            r#"{"vertices": []}"#,
            r#"{"vertices": [0, 0]}"#,
            r#"{"vertices": [0, 0, 0], "normals": [0, 1]}"#,
            r#"{"vertices": [0, 0, 0], "uvs": [0, 0, 1]}"#,
            r#"{"vertices": [0, 0, 0], "faces": [0, 0]}"#,
            r#"{"vertices": [0, 0, 0], "faces": [0, 0, 1]}"#,
        ];
        for case in cases {
            assert!(
                matches!(parse_mesh_json(case.as_bytes()), Err(LoadError::InvalidMesh(_))),
                "{case}"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            parse_mesh_json(b"{\"vertices\": [0, 0,"),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(parse_mesh_json(b"{}"), Err(LoadError::Json(_))));
    }

    #[test]
    fn loads_from_disk_and_through_the_trait() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TRIANGLE.as_bytes()).unwrap();
        let geometry = load_mesh_file(file.path()).unwrap();
        assert_eq!(geometry.vertices.len(), 3);

        let via_trait = JsonMeshLoader.load(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(via_trait, geometry);

        assert!(matches!(
            load_mesh_file(file.path().with_extension("missing")),
            Err(LoadError::Io(_))
        ));
    }
}
