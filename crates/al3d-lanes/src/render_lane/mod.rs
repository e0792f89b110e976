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

//! Rendering lane - hot path for graphics operations

use al3d_core::renderer::{FrameStats, RenderError};
use al3d_core::scene::{Camera, Scene};

mod generator;
mod permutation;
mod picker;
mod program_cache;
mod renderer;
pub mod shaders;

pub use generator::{generate, uniform_names, ShaderSource};
pub use permutation::{ShaderPermutation, MAX_SPOT_LIGHTS};
pub use picker::{PickCallback, PickOutcome, Picker};
pub use program_cache::{
    build_program, require_attrib, require_uniform, CompiledProgram, ProgramCache,
    ProgramLocations,
};
pub use renderer::{draw_order, DrawOrder, Renderer};

/// A strategy that turns a scene into a frame.
///
/// The application loop drives frames through this trait so it does not
/// depend on a concrete renderer or on the context it draws into.
pub trait RenderLane {
    /// A human-readable identifier for this rendering strategy, e.g. `"Forward"`.
    fn strategy_name(&self) -> &'static str;

    /// Renders one frame of `scene` seen from `camera`.
    ///
    /// # Errors
    ///
    /// Whatever the strategy's shader builds or context calls report.
    fn render(&mut self, scene: &mut Scene, camera: &Camera) -> Result<FrameStats, RenderError>;
}
