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

//! Opaque handles to objects owned by a [`GraphicsContext`](crate::renderer::GraphicsContext).
//!
//! Handles are only meaningful to the context that issued them.

use std::fmt;

/// A compiled shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub usize);

/// A linked vertex + fragment program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);

/// A vertex or index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// A 2D texture or cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An offscreen framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub usize);

/// The resolved location of a vertex attribute inside a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

/// The resolved location of a uniform inside a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// The cache key of a generated program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramKey(pub String);

impl ProgramKey {
    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProgramKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Identifies one compiled program: its cache key plus the slot among the
/// programs filed under that key.
///
/// Several programs share a key when they differ only on axes the key does not
/// encode (sidedness, fog, specular or normal maps).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramHandle {
    /// The permutation key.
    pub key: ProgramKey,
    /// Index of the program within its key's bucket.
    pub slot: usize,
}

/// The pair of handles produced by [`create_render_target`](crate::renderer::GraphicsContext::create_render_target).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    /// The framebuffer to bind for offscreen rendering.
    pub framebuffer: FramebufferId,
    /// The color attachment, sampleable as a 2D texture.
    pub color: TextureId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}
