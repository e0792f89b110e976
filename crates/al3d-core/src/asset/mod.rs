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

//! Provides the surface descriptions meshes are drawn with.
//!
//! - [`Material`] and its variants, which select the shader permutation.
//! - [`Texture`] and [`CubeTexture`], slots whose pixels may be decoded after
//!   the material is created and are uploaded lazily by the renderer.
//! - [`AssetLoader`], the contract implemented by decoders in `al3d-io`.

mod materials;
mod texture;

pub use materials::*;
pub use texture::*;

/// A trait for types that can decode raw bytes into a specific asset type.
///
/// Loaders are stateless and may run on a background thread, hence the
/// `Send + Sync` bounds on both the loader and its error.
pub trait AssetLoader<A> {
    /// Decodes `bytes` into an asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid encoding of `A`.
    fn load(&self, bytes: &[u8]) -> Result<A, Box<dyn std::error::Error + Send + Sync>>;
}
