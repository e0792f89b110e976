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

//! # AL3D Lanes
//!
//! The hot paths of the engine. The render lane turns a [`Scene`] into draw
//! calls: it derives a shader permutation per mesh, generates and caches GLSL
//! programs, orders the meshes and dispatches them through a
//! [`GraphicsContext`]. The postprocess lane holds full-screen effects applied
//! to the frame afterwards.
//!
//! [`Scene`]: al3d_core::scene::Scene
//! [`GraphicsContext`]: al3d_core::renderer::GraphicsContext

#![warn(missing_docs)]

pub mod postprocess_lane;
pub mod render_lane;
