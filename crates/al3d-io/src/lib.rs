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

//! # AL3D IO
//!
//! Getting assets from bytes into the engine's CPU-side types.
//!
//! - [`mesh_loader`]: JSON models (`{vertices, normals, faces, uvs}`) into a [`Geometry`].
//! - [`texture_loader`]: encoded images into RGBA8 [`TextureData`].
//! - [`streamer`]: a background thread decoding textures while frames keep rendering.
//! - [`texture_cache`]: one shared texture per path, fed by the streamer.
//!
//! [`Geometry`]: al3d_core::scene::Geometry
//! [`TextureData`]: al3d_core::renderer::TextureData

#![warn(missing_docs)]

mod error;
pub mod mesh_loader;
pub mod streamer;
pub mod texture_cache;
pub mod texture_loader;

pub use error::LoadError;
pub use mesh_loader::{load_mesh_file, parse_mesh_json, JsonMeshLoader};
pub use streamer::{StreamId, Streamed, TextureSource, TextureStreamer};
pub use texture_cache::TextureCache;
pub use texture_loader::{decode_cube_faces, decode_image, load_image_file, ImageTextureLoader};
