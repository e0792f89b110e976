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

use super::shaders::{GREYSCALE_FRAG, NEGATIVE_FRAG, SEPIA_FRAG};
use super::PostEffect;

/// Per-pixel color transforms with no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorEffect {
    /// Warm brown tint.
    Sepia,
    /// Luma-weighted grey.
    GreyScale,
    /// Inverted RGB.
    Negative,
}

impl PostEffect for ColorEffect {
    fn label(&self) -> &str {
        match self {
            ColorEffect::Sepia => "Sepia",
            ColorEffect::GreyScale => "GreyScale",
            ColorEffect::Negative => "Negative",
        }
    }

    fn fragment_source(&self) -> &str {
        match self {
            ColorEffect::Sepia => SEPIA_FRAG,
            ColorEffect::GreyScale => GREYSCALE_FRAG,
            ColorEffect::Negative => NEGATIVE_FRAG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_effect_has_its_own_source() {
        let sources = [
            ColorEffect::Sepia.fragment_source(),
            ColorEffect::GreyScale.fragment_source(),
            ColorEffect::Negative.fragment_source(),
        ];
        assert_ne!(sources[0], sources[1]);
        assert_ne!(sources[1], sources[2]);
        assert!(ColorEffect::Negative
            .fragment_source()
            .contains("1.0 - color.rgb"));
    }
}
