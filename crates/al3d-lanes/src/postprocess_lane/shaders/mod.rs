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

//! Embedded sources of the full-screen pass and the built-in effects.
//!
//! Every fragment stage samples the offscreen color target through `uSampler`
//! at `vUV`.

/// Full-screen quad vertex stage; `aPosition` holds clip-space `xy`.
pub const FULLSCREEN_VERT: &str = include_str!("fullscreen.vert");

/// Sepia tone.
pub const SEPIA_FRAG: &str = include_str!("sepia.frag");

/// Luma-weighted grey.
pub const GREYSCALE_FRAG: &str = include_str!("greyscale.frag");

/// Inverted colors.
pub const NEGATIVE_FRAG: &str = include_str!("negative.frag");

/// 3x3 convolution driven by `uKernel[9]` and `uTextureSize`.
pub const KERNEL_FRAG: &str = include_str!("kernel.frag");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_effect_samples_the_frame() {
        for source in [SEPIA_FRAG, GREYSCALE_FRAG, NEGATIVE_FRAG, KERNEL_FRAG] {
            assert!(source.contains("uniform sampler2D uSampler;"));
            assert!(source.contains("varying vec2 vUV;"));
        }
        assert!(FULLSCREEN_VERT.contains("varying vec2 vUV;"));
    }
}
