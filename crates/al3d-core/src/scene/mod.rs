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

//! The scene graph: what gets drawn, from where, under which lights.
//!
//! A [`Scene`] is a flat, ordered list of [`SceneNode`]s (meshes, lights and a
//! skybox). Meshes carry an [`Object3D`] transform, [`Geometry`] or a custom
//! [`DrawStrategy`], and a material. A [`Camera`] supplies the view and
//! projection. Stock shapes live in [`primitives`].

mod camera;
mod fog;
mod geometry;
mod mesh;
mod object3d;
pub mod primitives;
#[allow(clippy::module_inception)]
mod scene;
mod skybox;

pub use self::camera::{Camera, Projection, Viewport};
pub use self::fog::{Fog, FogMode};
pub use self::geometry::{
    index_format_for, AttributeSlots, DrawPart, DrawStrategy, Geometry, GeometryBuffers,
    IndexBuffer,
};
pub use self::mesh::{ClickHandler, Mesh};
pub use self::object3d::Object3D;
pub use self::scene::{NodeId, Scene, SceneNode};
pub use self::skybox::SkyBox;
