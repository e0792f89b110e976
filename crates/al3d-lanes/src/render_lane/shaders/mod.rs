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

//! Fixed GLSL programs of the render lane.
//!
//! Material programs are generated (see [`generate`](super::generate)); the
//! programs here never vary and are embedded at compile time.
//!
//! - [`PICKER_VERT`] / [`PICKER_FRAG`] - flat color-coded ids for the pick pass
//! - [`SKYBOX_VERT`] / [`SKYBOX_FRAG`] - cube-mapped environment at maximum depth

/// Pick pass vertex stage: `aPosition`, `uMVP`.
pub const PICKER_VERT: &str = include_str!("picker.vert");

/// Pick pass fragment stage: writes `uCode`.
pub const PICKER_FRAG: &str = include_str!("picker.frag");

/// Skybox vertex stage. Emits `xyww` so the box lands on the far plane.
pub const SKYBOX_VERT: &str = include_str!("skybox.vert");

/// Skybox fragment stage sampling `uSkybox`.
pub const SKYBOX_FRAG: &str = include_str!("skybox.frag");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_have_entry_points() {
        for source in [PICKER_VERT, PICKER_FRAG, SKYBOX_VERT, SKYBOX_FRAG] {
            assert!(source.contains("void main()"));
        }
    }

    #[test]
    fn picker_writes_the_code() {
        assert!(PICKER_FRAG.contains("uniform vec4 uCode;"));
        assert!(PICKER_VERT.contains("uniform mat4 uMVP;"));
    }

    #[test]
    fn skybox_sits_on_far_plane() {
        assert!(SKYBOX_VERT.contains("position.xyww"));
        assert!(SKYBOX_FRAG.contains("samplerCube"));
    }
}
